use chrono::Utc;
use kanal::AsyncSender;
use vocaboo_types::AppEvent;

use crate::trainer::Trainer;

pub async fn handle_answer(
    trainer: &mut Trainer,
    selected: String,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    tracing::debug!("Answer submitted: '{}'", selected);

    let Some(result) = trainer.submit(&selected, Utc::now()) else {
        return Ok(());
    };

    app_to_ui_tx.send(AppEvent::ShowVerdict(result.verdict)).await?;
    app_to_ui_tx
        .send(AppEvent::ShowProgress(trainer.progress_view()))
        .await?;

    if let Some(e) = result.save_error {
        app_to_ui_tx
            .send(AppEvent::Status(format!("Progress not saved: {}", e)))
            .await?;
    }

    Ok(())
}
