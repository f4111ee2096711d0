pub mod events;
pub mod input;
pub mod state;

use std::io::Write;

use kanal::{AsyncReceiver, AsyncSender};
use tokio::io::{AsyncBufReadExt, BufReader};
use vocaboo_types::{AppEvent, UiEvent};

pub use state::{UiMode, UiState};

use crate::events::handle_events;
use crate::input::parse_input;

/// Terminal front end: renders app events and turns typed lines into events.
pub async fn ui_loop(
    mode: UiMode,
    app_to_ui_rx: AsyncReceiver<AppEvent>,
    ui_to_app_tx: AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let mut state = UiState::new(mode);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    if mode == UiMode::Train {
        ui_to_app_tx.send(AppEvent::StartSession).await?;
    } else {
        print_out("Type a word to look up translations, `q` to quit.\n", &state);
    }

    loop {
        tokio::select! {
            event = app_to_ui_rx.recv() => {
                let event = event?;
                if matches!(event, AppEvent::UiEvent(UiEvent::Close)) {
                    tracing::debug!("[UI] Close requested by app");
                    break;
                }
                if let Some(text) = handle_events(event, &mut state) {
                    print_out(&text, &state);
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    tracing::debug!("[UI] stdin closed");
                    let _ = ui_to_app_tx.send(AppEvent::UiEvent(UiEvent::Close)).await;
                    break;
                };
                if let Some(event) = parse_input(&line, &state) {
                    let closing = matches!(event, AppEvent::UiEvent(UiEvent::Close));
                    ui_to_app_tx.send(event).await?;
                    if closing {
                        break;
                    }
                }
            }
        }
    }

    Ok(())
}

fn print_out(text: &str, state: &UiState) {
    let mut stdout = std::io::stdout().lock();
    let _ = stdout.write_all(text.as_bytes());
    if state.prompt {
        let _ = stdout.write_all(b"> ");
    }
    let _ = stdout.flush();
}
