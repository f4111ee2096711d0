use std::sync::Arc;
use std::time::Duration;

use kanal::AsyncSender;
use tokio_util::sync::CancellationToken;
use vocaboo_enrichment::{EnrichError, TranslationProvider};
use vocaboo_types::AppEvent;

/// Debounced translation lookup for the add-word input.
///
/// Every input restarts the pause and cancels the request in flight. Results
/// come back as `SuggestionsReady` and are only accepted for the latest input.
pub struct SuggestionLookup {
    provider: Option<Arc<dyn TranslationProvider>>,
    from: String,
    to: String,
    debounce: Duration,
    generation: u64,
    pending: Option<CancellationToken>,
    parent: CancellationToken,
    loopback: AsyncSender<AppEvent>,
}

impl SuggestionLookup {
    pub fn new(
        provider: Option<Arc<dyn TranslationProvider>>,
        from: String,
        to: String,
        debounce: Duration,
        parent: CancellationToken,
        loopback: AsyncSender<AppEvent>,
    ) -> Self {
        Self {
            provider,
            from,
            to,
            debounce,
            generation: 0,
            pending: None,
            parent,
            loopback,
        }
    }

    /// Register a new input value. Returns false when no lookup was scheduled.
    pub fn input(&mut self, query: &str) -> bool {
        self.cancel_pending();
        self.generation += 1;

        let query = query.trim().to_string();
        if query.is_empty() {
            return false;
        }
        let Some(provider) = self.provider.clone() else {
            tracing::debug!("Translation lookups disabled");
            return false;
        };

        let token = self.parent.child_token();
        self.pending = Some(token.clone());

        let generation = self.generation;
        let debounce = self.debounce;
        let (from, to) = (self.from.clone(), self.to.clone());
        let loopback = self.loopback.clone();

        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => return,
                _ = tokio::time::sleep(debounce) => {}
            }

            let candidates = match provider.suggest(&query, &from, &to, &token).await {
                Ok(candidates) => candidates,
                Err(EnrichError::Cancelled) => return,
                Err(e) => {
                    tracing::warn!(query, "Suggestion lookup failed: {}", e);
                    Vec::new()
                }
            };

            if token.is_cancelled() {
                return;
            }
            let _ = loopback
                .send(AppEvent::SuggestionsReady {
                    generation,
                    candidates,
                })
                .await;
        });

        true
    }

    /// Whether a result belongs to the latest input. Consumes the pending slot.
    pub fn accept(&mut self, generation: u64) -> bool {
        if generation != self.generation || self.pending.is_none() {
            tracing::debug!(generation, current = self.generation, "Discarding stale suggestions");
            return false;
        }
        self.pending = None;
        true
    }

    pub fn teardown(&mut self) {
        self.cancel_pending();
        self.generation += 1;
    }

    #[cfg(test)]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn cancel_pending(&mut self) {
        if let Some(token) = self.pending.take() {
            token.cancel();
        }
    }
}

impl Drop for SuggestionLookup {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

pub async fn handle_suggest_input(
    lookup: &mut SuggestionLookup,
    query: String,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    if !lookup.input(&query) {
        app_to_ui_tx.send(AppEvent::ShowSuggestions(Vec::new())).await?;
    }
    Ok(())
}

pub async fn handle_suggestions_ready(
    lookup: &mut SuggestionLookup,
    generation: u64,
    candidates: Vec<String>,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    if lookup.accept(generation) {
        app_to_ui_tx.send(AppEvent::ShowSuggestions(candidates)).await?;
    }
    Ok(())
}
