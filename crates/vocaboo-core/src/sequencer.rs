use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::error::TrainerError;

/// Shuffled round-robin traversal over the vocabulary snapshot.
///
/// Every pass visits each index of `[0, size)` exactly once in a uniformly
/// random order. Callers pass the current vocabulary size on every call so
/// a shrinking vocabulary is detected instead of producing a dangling index.
pub struct Sequencer {
    order: Vec<usize>,
    position: usize,
    passes: u64,
    rng: StdRng,
}

impl Sequencer {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Deterministic traversal, used by tests and `--seed`
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            order: Vec::new(),
            position: 0,
            passes: 0,
            rng,
        }
    }

    /// Begin a fresh traversal. An empty vocabulary leaves the current order untouched.
    pub fn start(&mut self, size: usize) -> Result<(), TrainerError> {
        if size == 0 {
            return Err(TrainerError::EmptyVocabulary);
        }

        self.passes = 0;
        self.reshuffle(size);
        Ok(())
    }

    /// Drop the traversal so `is_started` is false until the next `start`.
    pub fn reset(&mut self) {
        self.order.clear();
        self.position = 0;
        self.passes = 0;
    }

    pub fn is_started(&self) -> bool {
        !self.order.is_empty()
    }

    /// Move to the next card, starting a new pass when the current one is done.
    pub fn advance(&mut self, size: usize) -> Option<usize> {
        if !self.is_started() || size == 0 {
            return None;
        }

        self.position += 1;
        if self.position >= self.order.len() {
            self.passes += 1;
            tracing::debug!(passes = self.passes, "Pass complete");
            self.reshuffle(size);
        }

        self.current_index(size)
    }

    /// Index of the current card in the vocabulary snapshot.
    ///
    /// Reshuffles when the stored index no longer fits `size`.
    pub fn current_index(&mut self, size: usize) -> Option<usize> {
        if !self.is_started() || size == 0 {
            return None;
        }

        match self.order.get(self.position) {
            Some(&index) if index < size => Some(index),
            _ => {
                tracing::debug!(
                    position = self.position,
                    size,
                    "Current index out of range, reshuffling"
                );
                self.reshuffle(size);
                self.order.first().copied()
            }
        }
    }

    /// Zero-based position in the current pass
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn pass_len(&self) -> usize {
        self.order.len()
    }

    /// Number of passes completed since `start`
    pub fn passes(&self) -> u64 {
        self.passes
    }

    pub fn order(&self) -> &[usize] {
        &self.order
    }

    fn reshuffle(&mut self, size: usize) {
        self.order.clear();
        self.order.extend(0..size);
        // Fisher-Yates
        self.order.shuffle(&mut self.rng);
        self.position = 0;
    }
}

impl Default for Sequencer {
    fn default() -> Self {
        Self::new()
    }
}
