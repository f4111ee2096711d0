pub mod coordinator;
pub mod error;
pub mod mymemory;
pub mod pexels;
pub mod speech;
pub mod url;
pub mod wikipedia;

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use vocaboo_config::images::{ImageConfig, ImageProviderKind};
use vocaboo_config::speech::SpeechConfig;
use vocaboo_config::translator::TranslatorConfig;

pub use coordinator::{EnrichmentCoordinator, FetchTicket, IllustrationState, fetch_illustration};
pub use error::EnrichError;
pub use mymemory::MyMemoryTranslator;
pub use pexels::PexelsImages;
pub use speech::{CommandPronouncer, SilentPronouncer};
pub use url::is_valid_http_url;
pub use wikipedia::WikipediaImages;

/// Illustration lookup for a display word
#[async_trait::async_trait]
pub trait ImageProvider: Send + Sync {
    /// At most one image URL for `word`. Implementations stop early once
    /// `cancel` fires and return `EnrichError::Cancelled`.
    async fn fetch_image(
        &self,
        word: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<String>, EnrichError>;

    fn metadata(&self) -> ProviderMetadata;
}

/// Translation candidates for the add-word lookup
#[async_trait::async_trait]
pub trait TranslationProvider: Send + Sync {
    async fn suggest(
        &self,
        query: &str,
        from: &str,
        to: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<String>, EnrichError>;

    fn metadata(&self) -> ProviderMetadata;
}

/// Best-effort text to speech. Never fails from the caller's view.
pub trait Pronouncer: Send + Sync {
    fn speak(&self, text: &str);
}

#[derive(Debug, Clone)]
pub struct ProviderMetadata {
    pub name: String,
}

/// Build the configured image provider, `None` when images are disabled.
pub fn image_provider(config: &ImageConfig) -> Option<Arc<dyn ImageProvider>> {
    if !config.enabled {
        return None;
    }

    let timeout = Duration::from_millis(config.timeout_ms);
    let provider: Arc<dyn ImageProvider> = match config.provider {
        ImageProviderKind::Pexels if !config.api_key.trim().is_empty() => {
            Arc::new(PexelsImages::new(config.api_key.clone(), config.api_url.clone(), timeout))
        }
        ImageProviderKind::Pexels => {
            tracing::warn!("Pexels selected without an API key, falling back to Wikipedia");
            Arc::new(WikipediaImages::new(config.api_url.clone(), timeout))
        }
        ImageProviderKind::Wikipedia => Arc::new(WikipediaImages::new(config.api_url.clone(), timeout)),
    };

    tracing::info!("Image provider: {}", provider.metadata().name);
    Some(provider)
}

/// Build the configured translation provider, `None` when lookups are disabled.
pub fn translation_provider(
    config: &TranslatorConfig,
    timeout: Duration,
) -> Option<Arc<dyn TranslationProvider>> {
    if !config.enabled {
        return None;
    }

    match config.provider.as_str() {
        "mymemory" => Some(Arc::new(MyMemoryTranslator::new(
            config.api_url.clone(),
            config.max_candidates,
            timeout,
        ))),
        other => {
            tracing::warn!("Unknown translation provider '{}', lookups disabled", other);
            None
        }
    }
}

pub fn pronouncer(config: &SpeechConfig) -> Arc<dyn Pronouncer> {
    if config.enabled {
        Arc::new(CommandPronouncer::new(config))
    } else {
        Arc::new(SilentPronouncer)
    }
}

/// Run `fut` unless `cancel` fires first.
pub(crate) async fn cancellable<T, F>(cancel: &CancellationToken, fut: F) -> Result<T, EnrichError>
where
    F: std::future::Future<Output = Result<T, EnrichError>>,
{
    tokio::select! {
        _ = cancel.cancelled() => Err(EnrichError::Cancelled),
        result = fut => result,
    }
}

pub(crate) fn http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("vocaboo/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!("Failed to build HTTP client with timeout: {}", e);
            reqwest::Client::new()
        })
}
