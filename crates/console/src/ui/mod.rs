mod app;
mod format;
mod input;
mod render;
mod terminal;
mod text;
mod theme;

use crate::config::Settings;
use app::{AppState, UiEvent};
use crossterm::event::{self, Event, KeyEventKind};
use ddi_core::{dispatch, PendingSubmission, PredictionBackend, PredictionSession, SessionOptions};
use input::{handle_key_event, KeyAction};
use render::draw_ui;
use std::sync::Arc;
use std::time::Duration;
use terminal::TerminalGuard;
use tokio::sync::mpsc;

const TICK_RATE: Duration = Duration::from_millis(100);

/// Interactive console. Returns when the user quits.
pub(crate) async fn run(
    settings: Settings,
    backend: Arc<dyn PredictionBackend>,
) -> anyhow::Result<()> {
    let (ui_tx, mut ui_rx) = mpsc::channel::<UiEvent>(16);
    let session = PredictionSession::new(SessionOptions {
        request_timeout: settings.request_timeout,
    });
    let mut app = AppState::new(session, settings.endpoint, settings.export_dir);

    let mut guard = TerminalGuard::enter()?;
    loop {
        while let Ok(event) = ui_rx.try_recv() {
            app.handle_event(event);
        }

        guard.terminal().draw(|frame| draw_ui(frame, &mut app))?;

        if !event::poll(TICK_RATE)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        match handle_key_event(key, &mut app) {
            KeyAction::None => {}
            KeyAction::Quit => break,
            KeyAction::Dispatch(pending) => spawn_dispatch(
                Arc::clone(&backend),
                pending,
                settings.request_timeout,
                ui_tx.clone(),
            ),
        }
    }

    guard.restore()?;
    tracing::info!("console closed");
    Ok(())
}

fn spawn_dispatch(
    backend: Arc<dyn PredictionBackend>,
    pending: PendingSubmission,
    timeout: Option<Duration>,
    ui_tx: mpsc::Sender<UiEvent>,
) {
    tokio::spawn(async move {
        let outcome = dispatch(backend.as_ref(), &pending, timeout).await;
        if ui_tx
            .send(UiEvent::Completed { pending, outcome })
            .await
            .is_err()
        {
            tracing::debug!("console closed before prediction finished");
        }
    });
}
