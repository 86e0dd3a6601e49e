//! Calculator state owned by the UI thread.

use client_core::{EvalFailure, KeyPress, Keypad, Messages};
use crossbeam_channel::Sender;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{events::UiEvent, orchestration::dispatch_backend_command};

pub struct CalculatorSession {
    keypad: Keypad,
    cmd_tx: Sender<BackendCommand>,
    status: String,
    today_count: Option<u64>,
}

impl CalculatorSession {
    pub fn new(cmd_tx: Sender<BackendCommand>, messages: &'static Messages) -> Self {
        Self {
            keypad: Keypad::new(messages),
            cmd_tx,
            status: String::new(),
            today_count: None,
        }
    }

    pub fn keypad(&self) -> &Keypad {
        &self.keypad
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn today_count(&self) -> Option<u64> {
        self.today_count
    }

    pub fn press(&mut self, key: KeyPress) {
        let Some(request) = self.keypad.press(key) else {
            return;
        };
        let queued = dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::Evaluate(request),
            &mut self.status,
        );
        if !queued {
            self.keypad.finish_evaluation(Err(EvalFailure::Unavailable));
        }
    }

    pub fn refresh_stats(&mut self) {
        dispatch_backend_command(&self.cmd_tx, BackendCommand::FetchStats, &mut self.status);
    }

    pub fn handle_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::Info(message) => {
                self.status = message;
            }
            UiEvent::EvaluationFinished(outcome) => {
                let succeeded = outcome.is_ok();
                self.keypad.finish_evaluation(outcome);
                if succeeded {
                    self.refresh_stats();
                }
            }
            UiEvent::StatsUpdated(stats) => {
                self.today_count = Some(stats.today_count);
            }
            UiEvent::StatsUnavailable(reason) => {
                tracing::debug!(%reason, "keeping last known stats");
            }
            UiEvent::BackendFailed(message) => {
                tracing::error!(%message, "backend worker failed");
                self.status = message;
                if self.keypad.is_loading() {
                    self.keypad.finish_evaluation(Err(EvalFailure::Unavailable));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use client_core::{EvaluationRequest, Locale};
    use crossbeam_channel::{bounded, Receiver};
    use shared::{domain::Operator, protocol::StatsResponse};

    use super::*;

    fn session() -> (CalculatorSession, Receiver<BackendCommand>) {
        let (cmd_tx, cmd_rx) = bounded(8);
        (CalculatorSession::new(cmd_tx, Locale::En.messages()), cmd_rx)
    }

    fn type_keys(session: &mut CalculatorSession, keys: &str) {
        for c in keys.chars() {
            session.press(KeyPress::from_char(c).expect("key"));
        }
    }

    #[test]
    fn equals_queues_one_evaluation_and_applies_result() {
        let (mut session, cmd_rx) = session();
        type_keys(&mut session, "1+2=");

        assert_eq!(
            cmd_rx.try_recv().expect("evaluate command"),
            BackendCommand::Evaluate(EvaluationRequest {
                a: 1.0,
                b: 2.0,
                op: Operator::Add,
            })
        );
        assert!(!session.keypad().can_evaluate());

        session.press(KeyPress::Equals);
        assert!(cmd_rx.try_recv().is_err(), "no duplicate request while pending");

        session.handle_event(UiEvent::EvaluationFinished(Ok(3.0)));
        assert_eq!(session.keypad().display(), "3");
        assert!(session.keypad().can_evaluate());
        assert_eq!(cmd_rx.try_recv().expect("stats refresh"), BackendCommand::FetchStats);
    }

    #[test]
    fn division_by_zero_shows_service_text() {
        let (mut session, _cmd_rx) = session();
        type_keys(&mut session, "5/0=");
        session.handle_event(UiEvent::EvaluationFinished(Err(EvalFailure::Service(
            "Division by zero".to_string(),
        ))));
        assert_eq!(
            session.keypad().error_message().as_deref(),
            Some("Division by zero")
        );
    }

    #[test]
    fn result_after_clear_still_updates_display() {
        let (mut session, _cmd_rx) = session();
        type_keys(&mut session, "6*7=");
        session.press(KeyPress::Clear);
        assert_eq!(session.keypad().display(), "0");

        session.handle_event(UiEvent::EvaluationFinished(Ok(42.0)));
        assert_eq!(session.keypad().display(), "42");
    }

    #[test]
    fn unqueued_evaluation_is_released_with_generic_error() {
        let (cmd_tx, cmd_rx) = bounded(1);
        drop(cmd_rx);
        let mut session = CalculatorSession::new(cmd_tx, Locale::Ru.messages());
        type_keys(&mut session, "1+1=");

        assert!(!session.keypad().is_loading());
        assert_eq!(
            session.keypad().error_message().as_deref(),
            Some("Ошибка вычисления")
        );
        assert!(session.status().contains("disconnected"));
    }

    #[test]
    fn backend_failure_releases_pending_evaluation() {
        let (mut session, _cmd_rx) = session();
        type_keys(&mut session, "1+1=");
        session.handle_event(UiEvent::BackendFailed("backend worker startup failure".into()));
        assert!(!session.keypad().is_loading());
        assert_eq!(session.status(), "backend worker startup failure");
    }

    #[test]
    fn stats_are_tracked_and_kept_on_failure() {
        let (mut session, _cmd_rx) = session();
        session.handle_event(UiEvent::StatsUpdated(StatsResponse {
            date: None,
            today_count: 9,
        }));
        session.handle_event(UiEvent::StatsUnavailable("timeout".into()));
        assert_eq!(session.today_count(), Some(9));
        assert!(session.keypad().error().is_none());
    }
}
