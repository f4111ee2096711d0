
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use kanal::{AsyncReceiver, AsyncSender};
use tokio_util::sync::CancellationToken;
use vocaboo_config::Config;
use vocaboo_core::{MemoryStore, ProgressStore, VocabularyStore};
use vocaboo_enrichment::{
    EnrichError, ImageProvider, Pronouncer, ProviderMetadata, TranslationProvider,
};
use vocaboo_types::{AppEvent, WordPair};

use crate::events::handle_events;
use crate::events::suggest::SuggestionLookup;
use crate::trainer::{Trainer, TrainerServices};

pub fn image_url(word: &str) -> String {
    format!("https://img.test/{word}.jpg")
}

/// Answers with a URL derived from the word. The first `slow_calls` requests
/// take `delay` and ignore cancellation, like a response already on the wire.
pub struct FakeImages {
    calls: AtomicUsize,
    slow_calls: usize,
    delay: Duration,
}

impl FakeImages {
    pub fn new(slow_calls: usize, delay: Duration) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            slow_calls,
            delay,
        }
    }
}

#[async_trait]
impl ImageProvider for FakeImages {
    async fn fetch_image(
        &self,
        word: &str,
        _cancel: &CancellationToken,
    ) -> Result<Option<String>, EnrichError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) < self.slow_calls {
            tokio::time::sleep(self.delay).await;
        }
        Ok(Some(image_url(word)))
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "fake images".to_string(),
        }
    }
}

/// Records every query it receives.
#[derive(Default)]
pub struct FakeTranslator {
    pub queries: Mutex<Vec<String>>,
}

#[async_trait]
impl TranslationProvider for FakeTranslator {
    async fn suggest(
        &self,
        query: &str,
        _from: &str,
        _to: &str,
        _cancel: &CancellationToken,
    ) -> Result<Vec<String>, EnrichError> {
        self.queries.lock().unwrap().push(query.to_string());
        Ok(vec![format!("{query}-1"), format!("{query}-2")])
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "fake translator".to_string(),
        }
    }
}

#[derive(Default)]
pub struct RecordingPronouncer {
    pub spoken: Mutex<Vec<String>>,
}

impl Pronouncer for RecordingPronouncer {
    fn speak(&self, text: &str) {
        self.spoken.lock().unwrap().push(text.to_string());
    }
}

pub fn four_words() -> Vec<WordPair> {
    vec![
        WordPair::new("кот", "cat"),
        WordPair::new("собака", "dog"),
        WordPair::new("птица", "bird"),
        WordPair::new("рыба", "fish"),
    ]
}

pub struct HarnessBuilder {
    pub config: Config,
    pub vocabulary: Box<dyn VocabularyStore>,
    pub progress: Box<dyn ProgressStore>,
    pub images: Option<Arc<dyn ImageProvider>>,
    pub translator: Option<Arc<dyn TranslationProvider>>,
    pub pronouncer: Arc<RecordingPronouncer>,
}

impl HarnessBuilder {
    pub fn new(words: Vec<WordPair>) -> Self {
        let mut config = Config::default();
        config.trainer.advance_delay_ms = 10;
        config.translator.debounce_ms = 30;

        Self {
            config,
            vocabulary: Box::new(MemoryStore::new(words)),
            progress: Box::new(MemoryStore::default()),
            images: None,
            translator: None,
            pronouncer: Arc::new(RecordingPronouncer::default()),
        }
    }

    pub fn build(self) -> Harness {
        let cancel = CancellationToken::new();
        let (loopback, loopback_rx) = kanal::bounded_async(64);
        let (ui_tx, ui_rx) = kanal::unbounded_async();

        let trainer = Trainer::new(
            &self.config,
            Some(7),
            TrainerServices {
                vocabulary: self.vocabulary,
                progress: self.progress,
                images: self.images,
                pronouncer: self.pronouncer.clone(),
            },
            cancel.child_token(),
            loopback.clone(),
        )
        .unwrap();

        let lookup = SuggestionLookup::new(
            self.translator,
            "ru".to_string(),
            "en".to_string(),
            Duration::from_millis(self.config.translator.debounce_ms),
            cancel.child_token(),
            loopback,
        );

        Harness {
            trainer,
            lookup,
            loopback_rx,
            ui_tx,
            ui_rx,
            pronouncer: self.pronouncer,
            cancel,
        }
    }
}

/// Drives `handle_events` the way the event loop does, without stdin.
pub struct Harness {
    pub trainer: Trainer,
    pub lookup: SuggestionLookup,
    pub loopback_rx: AsyncReceiver<AppEvent>,
    pub ui_tx: AsyncSender<AppEvent>,
    pub ui_rx: AsyncReceiver<AppEvent>,
    pub pronouncer: Arc<RecordingPronouncer>,
    pub cancel: CancellationToken,
}

impl Harness {
    pub async fn send(&mut self, event: AppEvent) {
        handle_events(&mut self.trainer, &mut self.lookup, &self.ui_tx, event)
            .await
            .unwrap();
    }

    /// Handle timer and fetch completions until none arrives for `quiet`.
    pub async fn pump(&mut self, quiet: Duration) {
        while let Ok(Ok(event)) = tokio::time::timeout(quiet, self.loopback_rx.recv()).await {
            self.send(event).await;
        }
    }

    /// Everything rendered since the last call.
    pub fn rendered(&self) -> Vec<AppEvent> {
        let mut events = Vec::new();
        while let Ok(Some(event)) = self.ui_rx.try_recv() {
            events.push(event);
        }
        events
    }

    pub fn current_target(&self) -> String {
        self.trainer.session().current_word().unwrap().target.clone()
    }

    pub fn stats_of(&self, target: &str) -> vocaboo_types::WordStats {
        self.trainer
            .session()
            .words()
            .iter()
            .find(|w| w.target == target)
            .unwrap()
            .stats
    }
}

impl Drop for Harness {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
