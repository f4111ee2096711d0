use std::sync::Arc;
use std::time::Duration;

use kanal::{AsyncReceiver, AsyncSender};
use tokio_util::sync::CancellationToken;
use vocaboo_types::{AppEvent, UiEvent};

use crate::controller::Services;
use crate::state::AppState;
use crate::trainer::Trainer;

pub mod advance;
pub mod answer;
pub mod illustration;
pub mod suggest;

use advance::handle_advance_due;
use answer::handle_answer;
use illustration::handle_illustration;
use suggest::{SuggestionLookup, handle_suggest_input, handle_suggestions_ready};

/// App's main loop. Owns the trainer and the lookup, so all session state
/// changes happen here, one event at a time.
pub async fn event_loop(
    state: Arc<AppState>,
    services: Services,
    ui_to_app_rx: AsyncReceiver<AppEvent>,
    loopback: AsyncSender<AppEvent>,
    app_to_ui_tx: AsyncSender<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let (mut trainer, mut lookup) = {
        let config = state.config.read().await;

        let trainer = Trainer::new(
            &config,
            state.seed,
            services.trainer,
            cancel.child_token(),
            loopback.clone(),
        )?;
        let lookup = SuggestionLookup::new(
            services.translator,
            services.from_lang,
            services.to_lang,
            Duration::from_millis(config.translator.debounce_ms),
            cancel.child_token(),
            loopback,
        );
        (trainer, lookup)
    };

    tracing::info!("[EVENT_LOOP] Waiting for events");
    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => break,
            event = ui_to_app_rx.recv() => event?,
        };

        tracing::debug!("[EVENT_LOOP] Event: {:?}", std::mem::discriminant(&event));

        if matches!(event, AppEvent::UiEvent(UiEvent::Close)) {
            tracing::info!("[EVENT_LOOP] Close requested");
            break;
        }

        handle_events(&mut trainer, &mut lookup, &app_to_ui_tx, event).await?;
    }

    trainer.teardown();
    lookup.teardown();
    let _ = app_to_ui_tx.send(AppEvent::UiEvent(UiEvent::Close)).await;

    Ok(())
}

pub async fn handle_events(
    trainer: &mut Trainer,
    lookup: &mut SuggestionLookup,
    app_to_ui_tx: &AsyncSender<AppEvent>,
    event: AppEvent,
) -> anyhow::Result<()> {
    match event {
        AppEvent::StartSession => {
            if let Err(e) = trainer.start() {
                tracing::info!("Session not started: {}", e);
            }
            app_to_ui_tx
                .send(AppEvent::ShowProgress(trainer.progress_view()))
                .await?;
            send_card(trainer, app_to_ui_tx).await?;
        }
        AppEvent::SubmitChoice(selected) => {
            handle_answer(trainer, selected, app_to_ui_tx).await?;
        }
        AppEvent::AdvanceDue { generation } => {
            handle_advance_due(trainer, generation, app_to_ui_tx).await?;
        }
        AppEvent::IllustrationFetched {
            generation,
            outcome,
        } => {
            handle_illustration(trainer, generation, outcome, app_to_ui_tx).await?;
        }
        AppEvent::SpeakChoices => trainer.speak_choices(),
        AppEvent::Speak(text) => trainer.speak(&text),
        AppEvent::SuggestInput(query) => {
            handle_suggest_input(lookup, query, app_to_ui_tx).await?;
        }
        AppEvent::SuggestionsReady {
            generation,
            candidates,
        } => {
            handle_suggestions_ready(lookup, generation, candidates, app_to_ui_tx).await?;
        }
        AppEvent::UiEvent(_) => {}
        // UI-only events
        AppEvent::ShowCard(_)
        | AppEvent::ShowIllustration(_)
        | AppEvent::ShowVerdict(_)
        | AppEvent::ShowProgress(_)
        | AppEvent::ShowSuggestions(_)
        | AppEvent::EmptyVocabulary
        | AppEvent::Status(_) => {}
    }

    Ok(())
}

/// Show the current card with its illustration state, or the empty screen.
pub async fn send_card(trainer: &Trainer, app_to_ui_tx: &AsyncSender<AppEvent>) -> anyhow::Result<()> {
    let Some(card) = trainer.card_view() else {
        app_to_ui_tx.send(AppEvent::EmptyVocabulary).await?;
        return Ok(());
    };

    app_to_ui_tx.send(AppEvent::ShowCard(card)).await?;
    app_to_ui_tx
        .send(AppEvent::ShowIllustration(trainer.illustration_view()))
        .await?;
    Ok(())
}
