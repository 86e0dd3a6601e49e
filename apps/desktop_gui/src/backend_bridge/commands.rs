//! Backend commands queued from UI to backend worker.

use client_core::EvaluationRequest;

#[derive(Debug, Clone, PartialEq)]
pub enum BackendCommand {
    Evaluate(EvaluationRequest),
    FetchStats,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::Evaluate(_) => "evaluate",
            BackendCommand::FetchStats => "fetch_stats",
        }
    }
}
