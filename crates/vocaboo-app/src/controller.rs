use std::sync::Arc;
use std::time::Duration;

use kanal::{AsyncReceiver, AsyncSender};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use vocaboo_enrichment::TranslationProvider;
use vocaboo_types::AppEvent;
use vocaboo_ui::UiMode;

use crate::events::event_loop;
use crate::state::AppState;
use crate::store::JsonFileStore;
use crate::trainer::TrainerServices;

/// Centralized channel management
pub struct ChannelSet {
    pub app_to_ui: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
    pub ui_to_app: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
}

impl ChannelSet {
    pub fn new() -> Self {
        Self {
            app_to_ui: kanal::bounded_async(256),
            // user input plus timer and fetch completions
            ui_to_app: kanal::bounded_async(64),
        }
    }
}

impl Default for ChannelSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything the event loop needs from the outside world.
pub struct Services {
    pub trainer: TrainerServices,
    pub translator: Option<Arc<dyn TranslationProvider>>,
    pub from_lang: String,
    pub to_lang: String,
}

impl Services {
    /// Build stores and providers from the config.
    pub async fn from_state(
        state: &AppState,
        from_lang: Option<String>,
        to_lang: Option<String>,
    ) -> anyhow::Result<Self> {
        let config = state.config.read().await;

        let store = JsonFileStore::open(&config.storage)?;
        tracing::info!("Data dir: {}", store.dir().display());

        let timeout = Duration::from_millis(config.images.timeout_ms);
        Ok(Self {
            trainer: TrainerServices {
                vocabulary: Box::new(store.clone()),
                progress: Box::new(store),
                images: vocaboo_enrichment::image_provider(&config.images),
                pronouncer: vocaboo_enrichment::pronouncer(&config.speech),
            },
            translator: vocaboo_enrichment::translation_provider(&config.translator, timeout),
            from_lang: from_lang.unwrap_or_else(|| config.translator.from_lang.clone()),
            to_lang: to_lang.unwrap_or_else(|| config.translator.to_lang.clone()),
        })
    }
}

/// Application controller for task spawning and lifecycle
pub struct AppController {
    channels: ChannelSet,
    state: Arc<AppState>,
    cancel_token: CancellationToken,
}

impl AppController {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            channels: ChannelSet::new(),
            state,
            cancel_token: CancellationToken::new(),
        }
    }

    pub fn spawn_tasks(&self, services: Services, mode: UiMode) -> JoinSet<anyhow::Result<()>> {
        let mut tasks = JoinSet::new();

        // Event loop
        tasks.spawn(event_loop(
            self.state.clone(),
            services,
            self.channels.ui_to_app.1.clone(),
            self.channels.ui_to_app.0.clone(),
            self.channels.app_to_ui.0.clone(),
            self.cancel_token.child_token(),
        ));

        // UI loop
        tasks.spawn(vocaboo_ui::ui_loop(
            mode,
            self.channels.app_to_ui.1.clone(),
            self.channels.ui_to_app.0.clone(),
        ));

        tasks
    }

    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}
