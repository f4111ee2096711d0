use kanal::AsyncSender;
use vocaboo_types::{AppEvent, FetchOutcome};

use crate::trainer::Trainer;

pub async fn handle_illustration(
    trainer: &mut Trainer,
    generation: u64,
    outcome: FetchOutcome,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let Some(view) = trainer.apply_illustration(generation, outcome) else {
        return Ok(());
    };

    app_to_ui_tx.send(AppEvent::ShowIllustration(view)).await?;
    Ok(())
}
