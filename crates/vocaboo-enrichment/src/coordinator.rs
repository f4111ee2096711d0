use tokio_util::sync::CancellationToken;
use vocaboo_types::{FetchOutcome, IllustrationDisplay};

use crate::url::is_valid_http_url;
use crate::{EnrichError, ImageProvider};

/// Illustration state of the card on display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IllustrationState {
    Idle,
    Fetching,
    Resolved(String),
    /// Nothing usable: no result, request failure or a rejected URL
    Failed,
}

impl IllustrationState {
    pub fn display(&self) -> IllustrationDisplay {
        match self {
            IllustrationState::Fetching => IllustrationDisplay::Loading,
            IllustrationState::Resolved(url) => IllustrationDisplay::Image(url.clone()),
            IllustrationState::Idle | IllustrationState::Failed => IllustrationDisplay::Placeholder,
        }
    }
}

/// Everything a fetch task needs; the generation travels back with the result.
#[derive(Debug, Clone)]
pub struct FetchTicket {
    pub generation: u64,
    pub word: String,
    pub cancel: CancellationToken,
}

/// Keeps illustration results bound to the card that asked for them.
///
/// Each `begin` cancels the previous request and bumps the generation. A
/// result is applied only if it carries the current generation, so a slow
/// response for an earlier card can never replace the current card's state.
pub struct EnrichmentCoordinator {
    generation: u64,
    in_flight: Option<CancellationToken>,
    state: IllustrationState,
    parent: CancellationToken,
}

impl EnrichmentCoordinator {
    pub fn new(parent: CancellationToken) -> Self {
        Self {
            generation: 0,
            in_flight: None,
            state: IllustrationState::Idle,
            parent,
        }
    }

    /// Start fetching for a new card.
    pub fn begin(&mut self, word: &str) -> FetchTicket {
        self.cancel_in_flight();
        self.generation += 1;
        self.state = IllustrationState::Fetching;

        let cancel = self.parent.child_token();
        self.in_flight = Some(cancel.clone());

        tracing::debug!(generation = self.generation, word, "Illustration fetch started");

        FetchTicket {
            generation: self.generation,
            word: word.to_string(),
            cancel,
        }
    }

    /// Apply a finished fetch. Returns false when the result was discarded.
    pub fn apply(&mut self, generation: u64, outcome: FetchOutcome) -> bool {
        if generation != self.generation || self.state != IllustrationState::Fetching {
            tracing::debug!(
                generation,
                current = self.generation,
                "Discarding stale illustration result"
            );
            return false;
        }

        self.in_flight = None;
        self.state = match outcome {
            FetchOutcome::Found(url) if is_valid_http_url(&url) => {
                IllustrationState::Resolved(url.trim().to_string())
            }
            FetchOutcome::Found(url) => {
                tracing::warn!("Rejected illustration URL: {}", url);
                IllustrationState::Failed
            }
            FetchOutcome::Missing | FetchOutcome::Cancelled => IllustrationState::Failed,
            FetchOutcome::Failed(reason) => {
                tracing::debug!("Illustration unavailable: {}", reason);
                IllustrationState::Failed
            }
        };

        true
    }

    /// Drop the current card: cancel the request and go back to `Idle`.
    pub fn reset(&mut self) {
        self.cancel_in_flight();
        self.generation += 1;
        self.state = IllustrationState::Idle;
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn state(&self) -> &IllustrationState {
        &self.state
    }

    fn cancel_in_flight(&mut self) {
        if let Some(token) = self.in_flight.take() {
            token.cancel();
        }
    }
}

impl Drop for EnrichmentCoordinator {
    fn drop(&mut self) {
        self.cancel_in_flight();
    }
}

/// Run one ticket against a provider, folding every failure into an outcome.
pub async fn fetch_illustration(provider: &dyn ImageProvider, ticket: &FetchTicket) -> FetchOutcome {
    if ticket.cancel.is_cancelled() {
        return FetchOutcome::Cancelled;
    }

    match provider.fetch_image(&ticket.word, &ticket.cancel).await {
        Ok(Some(url)) => FetchOutcome::Found(url),
        Ok(None) => FetchOutcome::Missing,
        Err(EnrichError::Cancelled) => FetchOutcome::Cancelled,
        Err(e) => {
            tracing::warn!(word = %ticket.word, "Illustration fetch failed: {}", e);
            FetchOutcome::Failed(e.to_string())
        }
    }
}
