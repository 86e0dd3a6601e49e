//! Backend-to-UI events for the calculator window.

use client_core::EvalFailure;
use shared::protocol::StatsResponse;

#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    Info(String),
    /// Outcome of the single in-flight evaluation.
    EvaluationFinished(Result<f64, EvalFailure>),
    StatsUpdated(StatsResponse),
    StatsUnavailable(String),
    BackendFailed(String),
}

impl UiEvent {
    pub fn name(&self) -> &'static str {
        match self {
            UiEvent::Info(_) => "info",
            UiEvent::EvaluationFinished(_) => "evaluation_finished",
            UiEvent::StatsUpdated(_) => "stats_updated",
            UiEvent::StatsUnavailable(_) => "stats_unavailable",
            UiEvent::BackendFailed(_) => "backend_failed",
        }
    }

    /// Events the window can miss without getting stuck. An evaluation
    /// outcome or a backend failure must reach the UI, otherwise the keypad
    /// stays loading.
    pub fn is_droppable(&self) -> bool {
        matches!(
            self,
            UiEvent::Info(_) | UiEvent::StatsUpdated(_) | UiEvent::StatsUnavailable(_)
        )
    }
}
