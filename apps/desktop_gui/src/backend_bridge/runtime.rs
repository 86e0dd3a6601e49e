//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread};

use client_core::{evaluate, CalcApi, CalcClient, ClientSettings};
use crossbeam_channel::{Receiver, Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;

pub fn launch(
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    settings: ClientSettings,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let _ = deliver(&ui_tx, UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                tracing::error!("failed to build backend runtime: {err}");
                deliver_blocking(
                    &ui_tx,
                    UiEvent::BackendFailed(format!(
                        "backend worker startup failure: failed to build runtime: {err}"
                    )),
                );
                return;
            }
        };

        let client = match CalcClient::from_settings(&settings) {
            Ok(client) => Arc::new(client),
            Err(err) => {
                tracing::error!("failed to build compute client: {err}");
                deliver_blocking(
                    &ui_tx,
                    UiEvent::BackendFailed(format!("backend worker startup failure: {err}")),
                );
                return;
            }
        };

        runtime.block_on(run(client, cmd_rx, ui_tx));
        tracing::info!("backend worker stopped");
    })
}

/// Serves commands until the UI drops its sender. Each command runs on its
/// own task so a slow stats call never holds up an evaluation; the blocking
/// channel receive stays off the async workers.
pub async fn run<A>(api: Arc<A>, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>)
where
    A: CalcApi + 'static,
{
    let _ = deliver(&ui_tx, UiEvent::Info("Backend worker ready".to_string()));

    loop {
        let rx = cmd_rx.clone();
        let cmd = match tokio::task::spawn_blocking(move || rx.recv()).await {
            Ok(Ok(cmd)) => cmd,
            Ok(Err(_)) => break,
            Err(err) => {
                tracing::error!("backend command intake failed: {err}");
                break;
            }
        };
        tracing::debug!(command = cmd.name(), "backend received command");
        let api = Arc::clone(&api);
        let ui_tx = ui_tx.clone();
        tokio::spawn(async move {
            let event = handle(api.as_ref(), cmd).await;
            if let Some(event) = deliver(&ui_tx, event) {
                tracing::debug!(event = event.name(), "ui event queue is full; waiting for room");
                if let Err(err) =
                    tokio::task::spawn_blocking(move || deliver_blocking(&ui_tx, event)).await
                {
                    tracing::error!("backend event delivery failed: {err}");
                }
            }
        });
    }
}

async fn handle<A: CalcApi + ?Sized>(api: &A, cmd: BackendCommand) -> UiEvent {
    match cmd {
        BackendCommand::Evaluate(request) => {
            UiEvent::EvaluationFinished(evaluate(api, request).await)
        }
        BackendCommand::FetchStats => match api.fetch_stats().await {
            Ok(stats) => UiEvent::StatsUpdated(stats),
            Err(err) => {
                tracing::warn!(error = %err, "stats unavailable");
                UiEvent::StatsUnavailable(err.to_string())
            }
        },
    }
}

/// Results that arrive after the window is gone are dropped. When the queue
/// is full, droppable events are shed and the rest are handed back so the
/// caller can wait for room.
#[must_use]
fn deliver(ui_tx: &Sender<UiEvent>, event: UiEvent) -> Option<UiEvent> {
    match ui_tx.try_send(event) {
        Ok(()) => None,
        Err(TrySendError::Disconnected(event)) => {
            tracing::debug!(event = event.name(), "ui closed; discarding backend event");
            None
        }
        Err(TrySendError::Full(event)) if event.is_droppable() => {
            tracing::warn!(event = event.name(), "ui event queue is full; dropping backend event");
            None
        }
        Err(TrySendError::Full(event)) => Some(event),
    }
}

fn deliver_blocking(ui_tx: &Sender<UiEvent>, event: UiEvent) {
    if let Err(err) = ui_tx.send(event) {
        tracing::debug!(event = err.0.name(), "ui closed; discarding backend event");
    }
}
