use std::time::Duration;

use kanal::AsyncSender;
use tokio_util::sync::CancellationToken;
use vocaboo_types::AppEvent;

use crate::events::send_card;
use crate::trainer::Trainer;

/// The feedback pause between a correct answer and the next card.
///
/// Fires `AdvanceDue` with the session generation it was scheduled for. A new
/// schedule or `cancel` stops the previous pause.
pub struct AdvanceTimer {
    parent: CancellationToken,
    pending: Option<CancellationToken>,
}

impl AdvanceTimer {
    pub fn new(parent: CancellationToken) -> Self {
        Self {
            parent,
            pending: None,
        }
    }

    pub fn schedule(&mut self, generation: u64, delay: Duration, loopback: AsyncSender<AppEvent>) {
        self.cancel();

        let token = self.parent.child_token();
        self.pending = Some(token.clone());

        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    tracing::debug!(generation, "Advance cancelled");
                }
                _ = tokio::time::sleep(delay) => {
                    let _ = loopback.send(AppEvent::AdvanceDue { generation }).await;
                }
            }
        });
    }

    pub fn cancel(&mut self) {
        if let Some(token) = self.pending.take() {
            token.cancel();
        }
    }

    /// Called when `AdvanceDue` arrives
    pub fn finish(&mut self) {
        self.pending = None;
    }

    #[cfg(test)]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl Drop for AdvanceTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

pub async fn handle_advance_due(
    trainer: &mut Trainer,
    generation: u64,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    if !trainer.advance(generation) {
        return Ok(());
    }

    send_card(trainer, app_to_ui_tx).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fires_once_after_the_delay() {
        let (tx, rx) = kanal::bounded_async(4);
        let mut timer = AdvanceTimer::new(CancellationToken::new());

        timer.schedule(3, Duration::from_millis(10), tx);
        assert!(timer.is_pending());

        let event = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(event, AppEvent::AdvanceDue { generation: 3 }));
    }

    #[tokio::test]
    async fn rescheduling_cancels_the_previous_pause() {
        let (tx, rx) = kanal::bounded_async(4);
        let mut timer = AdvanceTimer::new(CancellationToken::new());

        timer.schedule(1, Duration::from_millis(30), tx.clone());
        timer.schedule(2, Duration::from_millis(30), tx.clone());

        let event = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(event, AppEvent::AdvanceDue { generation: 2 }));

        // `tx` stays alive so an empty channel times out instead of closing
        let nothing = tokio::time::timeout(Duration::from_millis(100), rx.recv()).await;
        assert!(nothing.is_err());
        drop(tx);
    }

    #[tokio::test]
    async fn cancel_before_the_delay_sends_nothing() {
        let (tx, rx) = kanal::bounded_async(4);
        let mut timer = AdvanceTimer::new(CancellationToken::new());

        timer.schedule(1, Duration::from_millis(30), tx.clone());
        timer.cancel();
        assert!(!timer.is_pending());

        let nothing = tokio::time::timeout(Duration::from_millis(100), rx.recv()).await;
        assert!(nothing.is_err());
        drop(tx);
    }
}
