use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use kanal::AsyncSender;
use tokio_util::sync::CancellationToken;
use vocaboo_config::Config;
use vocaboo_core::display::title_case;
use vocaboo_core::{
    DistractorGenerator, FoldingNormalizer, ProgressStore, StoreError, Submission, TrainerError,
    TrainingSession, VocabularyChange, VocabularyStore, persist_evaluation,
};
use vocaboo_enrichment::{EnrichmentCoordinator, ImageProvider, Pronouncer, fetch_illustration};
use vocaboo_types::{
    AppEvent, CardView, FetchOutcome, IllustrationView, ProgressView, VerdictView, WordId, WordStats,
};

use crate::events::advance::AdvanceTimer;

pub struct AnswerResult {
    pub verdict: VerdictView,
    pub save_error: Option<StoreError>,
}

/// Collaborators the trainer talks to.
pub struct TrainerServices {
    pub vocabulary: Box<dyn VocabularyStore>,
    pub progress: Box<dyn ProgressStore>,
    pub images: Option<Arc<dyn ImageProvider>>,
    pub pronouncer: Arc<dyn Pronouncer>,
}

/// Owns the session and everything that reacts to it.
///
/// Lives inside the event loop task, so none of it is shared.
pub struct Trainer {
    session: TrainingSession,
    coordinator: EnrichmentCoordinator,
    advance: AdvanceTimer,
    advance_delay: Duration,
    vocabulary: Box<dyn VocabularyStore>,
    progress_store: Box<dyn ProgressStore>,
    images: Option<Arc<dyn ImageProvider>>,
    pronouncer: Arc<dyn Pronouncer>,
    loopback: AsyncSender<AppEvent>,
    /// Stats of answers whose write failed, retried on every reload
    unsaved: HashMap<WordId, WordStats>,
    progress_unsaved: bool,
}

impl Trainer {
    pub fn new(
        config: &Config,
        seed: Option<u64>,
        services: TrainerServices,
        cancel: CancellationToken,
        loopback: AsyncSender<AppEvent>,
    ) -> anyhow::Result<Self> {
        let words = services.vocabulary.get_all()?;
        let progress = services.progress.get()?;

        let normalizer = Arc::new(FoldingNormalizer::from_config(&config.normalization));
        let generator = DistractorGenerator::new(config.trainer.max_distractors);

        let session = match seed {
            Some(seed) => TrainingSession::seeded(words, progress, normalizer, generator, seed),
            None => TrainingSession::new(words, progress, normalizer, generator),
        };

        Ok(Self {
            session,
            coordinator: EnrichmentCoordinator::new(cancel.child_token()),
            advance: AdvanceTimer::new(cancel),
            advance_delay: Duration::from_millis(config.trainer.advance_delay_ms),
            vocabulary: services.vocabulary,
            progress_store: services.progress,
            images: services.images,
            pronouncer: services.pronouncer,
            loopback,
            unsaved: HashMap::new(),
            progress_unsaved: false,
        })
    }

    #[cfg(test)]
    pub fn session(&self) -> &TrainingSession {
        &self.session
    }

    pub fn start(&mut self) -> Result<(), TrainerError> {
        self.advance.cancel();
        if let Err(e) = self.sync_vocabulary() {
            tracing::warn!("Failed to reload vocabulary: {}", e);
        }

        let started = self.session.on_start();
        self.begin_illustration();
        started
    }

    /// Score a submission. `None` when the session ignored it.
    pub fn submit(&mut self, selected: &str, now: DateTime<Utc>) -> Option<AnswerResult> {
        let evaluation = match self.session.submit(selected, now) {
            Submission::Scored(evaluation) => evaluation,
            Submission::Ignored(reason) => {
                tracing::debug!(?reason, "Submission ignored");
                return None;
            }
        };

        // the session keeps the new stats even if the write fails
        let save_error = persist_evaluation(
            &evaluation,
            self.session.progress(),
            self.vocabulary.as_mut(),
            self.progress_store.as_mut(),
        )
        .err();
        match &save_error {
            Some(e) => {
                tracing::error!("Failed to save answer: {}", e);
                self.unsaved.insert(evaluation.word_id.clone(), evaluation.stats);
                self.progress_unsaved = true;
            }
            None => {
                self.unsaved.remove(&evaluation.word_id);
            }
        }

        if evaluation.should_advance() {
            self.pronouncer.speak(&evaluation.selected);
            self.advance.schedule(
                self.session.generation(),
                self.advance_delay,
                self.loopback.clone(),
            );
        } else {
            self.pronouncer.speak(&evaluation.answer);
        }

        Some(AnswerResult {
            verdict: VerdictView {
                correct: evaluation.is_correct(),
                selected: evaluation.selected,
                answer: evaluation.answer,
                stats: evaluation.stats,
            },
            save_error,
        })
    }

    /// Handle a finished feedback pause. Returns false for a stale timer.
    ///
    /// Words added by another process since the last card join here.
    pub fn advance(&mut self, generation: u64) -> bool {
        if generation != self.session.generation() {
            tracing::debug!(generation, current = self.session.generation(), "Stale advance");
            return false;
        }
        self.advance.finish();

        let change = self.sync_vocabulary().unwrap_or_else(|e| {
            tracing::warn!("Failed to reload vocabulary: {}", e);
            VocabularyChange::Unchanged
        });
        match change {
            VocabularyChange::Unchanged | VocabularyChange::ChoicesRebuilt => {
                self.session.on_advance();
            }
            change => tracing::debug!(?change, "Vocabulary changed during the pause"),
        }

        self.begin_illustration();
        true
    }

    pub fn apply_illustration(&mut self, generation: u64, outcome: FetchOutcome) -> Option<IllustrationView> {
        self.coordinator
            .apply(generation, outcome)
            .then(|| self.illustration_view())
    }

    pub fn card_view(&self) -> Option<CardView> {
        let card = self.session.card()?;

        Some(CardView {
            word_id: card.word.id.clone(),
            generation: self.coordinator.generation(),
            prompt: title_case(&card.word.source),
            choices: card.choices.display_order().to_vec(),
            position: card.position + 1,
            pass_len: card.pass_len,
        })
    }

    pub fn illustration_view(&self) -> IllustrationView {
        IllustrationView {
            generation: self.coordinator.generation(),
            state: self.coordinator.state().display(),
        }
    }

    pub fn progress_view(&self) -> ProgressView {
        let progress = self.session.progress();
        ProgressView {
            answered: progress.total_answered,
            accuracy_percent: progress.accuracy_percent(),
            streak: progress.streak,
        }
    }

    pub fn speak(&self, text: &str) {
        self.pronouncer.speak(text);
    }

    pub fn speak_choices(&self) {
        if let Some(choices) = self.session.choices() {
            self.pronouncer.speak(&choices.display_order().join(", "));
        }
    }

    #[cfg(test)]
    pub fn advance_pending(&self) -> bool {
        self.advance.is_pending()
    }

    pub fn teardown(&mut self) {
        self.advance.cancel();
        self.coordinator.reset();
    }

    #[cfg(test)]
    pub fn unsaved_words(&self) -> usize {
        self.unsaved.len()
    }

    /// Replace the session snapshot with what the store holds now.
    ///
    /// Stats that never reached the store win over the stored copy.
    fn sync_vocabulary(&mut self) -> Result<VocabularyChange, StoreError> {
        self.retry_unsaved();

        let mut words = self.vocabulary.get_all()?;
        for word in &mut words {
            if let Some(stats) = self.unsaved.get(&word.id) {
                word.stats = *stats;
            }
        }
        Ok(self.session.on_vocabulary_changed(words))
    }

    fn retry_unsaved(&mut self) {
        let vocabulary = &mut self.vocabulary;
        self.unsaved.retain(|id, stats| match vocabulary.patch_stats(id, *stats) {
            Ok(()) => false,
            // removed elsewhere, nothing left to save
            Err(StoreError::NotFound(_)) => false,
            Err(e) => {
                tracing::debug!(word = %id, "Stats still not saved: {}", e);
                true
            }
        });

        if self.progress_unsaved {
            match self.progress_store.set(self.session.progress()) {
                Ok(()) => self.progress_unsaved = false,
                Err(e) => tracing::debug!("Progress still not saved: {}", e),
            }
        }
    }

    /// Point the coordinator at the current card and start its fetch.
    fn begin_illustration(&mut self) {
        let Some(word) = self.session.current_word().map(|w| w.target.clone()) else {
            self.coordinator.reset();
            return;
        };

        let ticket = self.coordinator.begin(&word);
        let Some(provider) = self.images.clone() else {
            self.coordinator.apply(ticket.generation, FetchOutcome::Missing);
            return;
        };

        let loopback = self.loopback.clone();
        tokio::spawn(async move {
            let outcome = fetch_illustration(provider.as_ref(), &ticket).await;
            let _ = loopback
                .send(AppEvent::IllustrationFetched {
                    generation: ticket.generation,
                    outcome,
                })
                .await;
        });
    }
}
