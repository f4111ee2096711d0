use vocaboo_types::{ProgressAggregate, WordId, WordPair, WordStats};

use crate::error::StoreError;
use crate::evaluator::Evaluation;
use crate::normalize::Normalizer;

/// Ordered collection of word pairs.
pub trait VocabularyStore: Send + Sync {
    fn get_all(&self) -> Result<Vec<WordPair>, StoreError>;

    /// Insert, or replace the record with the same id in place
    fn upsert(&mut self, word: WordPair) -> Result<(), StoreError>;

    fn remove(&mut self, id: &WordId) -> Result<bool, StoreError>;

    fn patch_stats(&mut self, id: &WordId, stats: WordStats) -> Result<(), StoreError> {
        let mut word = self
            .get_all()?
            .into_iter()
            .find(|w| w.id == *id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        word.stats = stats;
        self.upsert(word)
    }
}

pub trait ProgressStore: Send + Sync {
    fn get(&self) -> Result<ProgressAggregate, StoreError>;

    fn set(&mut self, progress: &ProgressAggregate) -> Result<(), StoreError>;
}

/// Write an evaluation's word stats and the session progress back.
pub fn persist_evaluation(
    evaluation: &Evaluation,
    progress: &ProgressAggregate,
    vocabulary: &mut dyn VocabularyStore,
    progress_store: &mut dyn ProgressStore,
) -> Result<(), StoreError> {
    vocabulary.patch_stats(&evaluation.word_id, evaluation.stats)?;
    progress_store.set(progress)
}

/// Add a word unless an equal `(source, target)` pair is already stored.
///
/// New words go to the front. Returns whether the word was added.
pub fn add_unique(
    vocabulary: &mut dyn VocabularyStore,
    normalizer: &dyn Normalizer,
    word: WordPair,
) -> Result<bool, StoreError> {
    let key = pair_key(normalizer, &word);
    let exists = vocabulary
        .get_all()?
        .iter()
        .any(|w| w.id == word.id || pair_key(normalizer, w) == key);

    if exists {
        tracing::debug!(source = %word.source, target = %word.target, "Skipping duplicate word");
        return Ok(false);
    }

    vocabulary.upsert(word)?;
    Ok(true)
}

fn pair_key(normalizer: &dyn Normalizer, word: &WordPair) -> (String, String) {
    (
        normalizer.normalize(&word.source),
        normalizer.normalize(&word.target),
    )
}

/// In-memory store, used by tests and as a scratch vocabulary.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    words: Vec<WordPair>,
    progress: ProgressAggregate,
}

impl MemoryStore {
    pub fn new(words: Vec<WordPair>) -> Self {
        Self {
            words,
            progress: ProgressAggregate::default(),
        }
    }
}

impl VocabularyStore for MemoryStore {
    fn get_all(&self) -> Result<Vec<WordPair>, StoreError> {
        Ok(self.words.clone())
    }

    fn upsert(&mut self, word: WordPair) -> Result<(), StoreError> {
        match self.words.iter_mut().find(|w| w.id == word.id) {
            Some(existing) => *existing = word,
            None => self.words.insert(0, word),
        }
        Ok(())
    }

    fn remove(&mut self, id: &WordId) -> Result<bool, StoreError> {
        let before = self.words.len();
        self.words.retain(|w| w.id != *id);
        Ok(self.words.len() != before)
    }

    fn patch_stats(&mut self, id: &WordId, stats: WordStats) -> Result<(), StoreError> {
        let word = self
            .words
            .iter_mut()
            .find(|w| w.id == *id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        word.stats = stats;
        Ok(())
    }
}

impl ProgressStore for MemoryStore {
    fn get(&self) -> Result<ProgressAggregate, StoreError> {
        Ok(self.progress.clone())
    }

    fn set(&mut self, progress: &ProgressAggregate) -> Result<(), StoreError> {
        self.progress = progress.clone();
        Ok(())
    }
}
