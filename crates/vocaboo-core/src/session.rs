use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use vocaboo_types::{ProgressAggregate, WordPair};

use crate::choices::{ChoiceSet, DistractorGenerator};
use crate::error::TrainerError;
use crate::evaluator::{Evaluation, evaluate};
use crate::normalize::Normalizer;
use crate::sequencer::Sequencer;

/// Where the learner is on the current card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardPhase {
    /// No answer given yet
    Awaiting,
    /// A wrong answer was given, only the correct choice is accepted now
    HeldForRetry,
    /// Answered correctly, waiting for the advance
    Answered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    NoCard,
    /// Held after a miss and the submission was not the correct choice
    RetryNotCorrect,
    AlreadyAnswered,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    Scored(Evaluation),
    Ignored(IgnoreReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VocabularyChange {
    /// Size changed, a new pass started
    Restarted,
    /// Same size but the current card points at another word
    CardReplaced,
    /// Same card, choices rebuilt from the new answers
    ChoicesRebuilt,
    Unchanged,
    Emptied,
}

/// Borrowed view of the card on display.
#[derive(Debug, Clone, Copy)]
pub struct Card<'a> {
    pub index: usize,
    pub word: &'a WordPair,
    pub choices: &'a ChoiceSet,
    pub phase: CardPhase,
    pub position: usize,
    pub pass_len: usize,
    pub generation: u64,
}

/// Quiz state over one vocabulary snapshot.
///
/// Owns the traversal order, the current choice set and the progress
/// aggregate. Every mutation happens in one of the `on_*` transitions or in
/// `submit`, each a single synchronous step.
pub struct TrainingSession {
    words: Vec<WordPair>,
    progress: ProgressAggregate,
    sequencer: Sequencer,
    generator: DistractorGenerator,
    normalizer: Arc<dyn Normalizer>,
    rng: StdRng,
    current: Option<usize>,
    choices: Option<ChoiceSet>,
    phase: CardPhase,
    generation: u64,
}

impl TrainingSession {
    pub fn new(
        words: Vec<WordPair>,
        progress: ProgressAggregate,
        normalizer: Arc<dyn Normalizer>,
        generator: DistractorGenerator,
    ) -> Self {
        Self::with_parts(
            words,
            progress,
            normalizer,
            generator,
            Sequencer::new(),
            StdRng::from_os_rng(),
        )
    }

    pub fn seeded(
        words: Vec<WordPair>,
        progress: ProgressAggregate,
        normalizer: Arc<dyn Normalizer>,
        generator: DistractorGenerator,
        seed: u64,
    ) -> Self {
        Self::with_parts(
            words,
            progress,
            normalizer,
            generator,
            Sequencer::seeded(seed),
            StdRng::seed_from_u64(seed.wrapping_add(1)),
        )
    }

    fn with_parts(
        words: Vec<WordPair>,
        progress: ProgressAggregate,
        normalizer: Arc<dyn Normalizer>,
        generator: DistractorGenerator,
        sequencer: Sequencer,
        rng: StdRng,
    ) -> Self {
        Self {
            words,
            progress,
            sequencer,
            generator,
            normalizer,
            rng,
            current: None,
            choices: None,
            phase: CardPhase::Awaiting,
            generation: 0,
        }
    }

    pub fn on_start(&mut self) -> Result<(), TrainerError> {
        if let Err(e) = self.sequencer.start(self.words.len()) {
            self.sequencer.reset();
            self.clear_card();
            return Err(e);
        }

        tracing::info!(words = self.words.len(), "Training session started");
        self.enter_card();
        Ok(())
    }

    /// Move to the next card. Returns false when there is nothing to show.
    pub fn on_advance(&mut self) -> bool {
        if self.sequencer.advance(self.words.len()).is_none() {
            self.clear_card();
            return false;
        }

        self.enter_card();
        self.current.is_some()
    }

    pub fn on_vocabulary_changed(&mut self, words: Vec<WordPair>) -> VocabularyChange {
        let old_len = self.words.len();
        let old_word = self.current_word().map(|w| w.id.clone());
        let answers_changed = !self
            .words
            .iter()
            .map(|w| &w.target)
            .eq(words.iter().map(|w| &w.target));

        self.words = words;

        if self.words.is_empty() {
            self.sequencer.reset();
            self.clear_card();
            return VocabularyChange::Emptied;
        }

        if self.words.len() != old_len || !self.sequencer.is_started() {
            // a fresh start cannot fail on a non-empty vocabulary
            let _ = self.sequencer.start(self.words.len());
            self.enter_card();
            return VocabularyChange::Restarted;
        }

        let new_word = self
            .sequencer
            .current_index(self.words.len())
            .map(|i| self.words[i].id.clone());

        if new_word != old_word {
            self.enter_card();
            VocabularyChange::CardReplaced
        } else if answers_changed {
            self.rebuild_choices();
            VocabularyChange::ChoicesRebuilt
        } else {
            VocabularyChange::Unchanged
        }
    }

    /// Score `selected` against the current card.
    ///
    /// While held after a miss, anything but the correct choice is ignored
    /// without touching stats.
    pub fn submit(&mut self, selected: &str, now: DateTime<Utc>) -> Submission {
        let Some(index) = self.current else {
            return Submission::Ignored(IgnoreReason::NoCard);
        };

        let verdict = evaluate(self.normalizer.as_ref(), selected, &self.words[index]);

        match self.phase {
            CardPhase::Answered => return Submission::Ignored(IgnoreReason::AlreadyAnswered),
            CardPhase::HeldForRetry if !verdict.is_correct => {
                tracing::debug!("Ignoring repeated wrong answer");
                return Submission::Ignored(IgnoreReason::RetryNotCorrect);
            }
            _ => {}
        }

        let word = &mut self.words[index];
        word.stats.record(verdict.is_correct);
        self.progress.record(verdict.is_correct, now);

        self.phase = if verdict.is_correct {
            CardPhase::Answered
        } else {
            CardPhase::HeldForRetry
        };

        tracing::debug!(
            word = %word.id,
            correct = verdict.is_correct,
            seen = word.stats.seen,
            "Answer scored"
        );

        Submission::Scored(Evaluation {
            word_id: word.id.clone(),
            selected: selected.to_string(),
            answer: word.target.clone(),
            verdict,
            stats: word.stats,
            recorded_at: now,
            card_generation: self.generation,
        })
    }

    pub fn card(&self) -> Option<Card<'_>> {
        let index = self.current?;
        let choices = self.choices.as_ref()?;

        Some(Card {
            index,
            word: &self.words[index],
            choices,
            phase: self.phase,
            position: self.sequencer.position(),
            pass_len: self.sequencer.pass_len(),
            generation: self.generation,
        })
    }

    pub fn current_word(&self) -> Option<&WordPair> {
        self.current.map(|i| &self.words[i])
    }

    pub fn choices(&self) -> Option<&ChoiceSet> {
        self.choices.as_ref()
    }

    pub fn phase(&self) -> CardPhase {
        self.phase
    }

    pub fn revealed(&self) -> bool {
        self.phase != CardPhase::Awaiting
    }

    pub fn pending_correct_only(&self) -> bool {
        self.phase == CardPhase::HeldForRetry
    }

    /// Incremented on every card transition
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn progress(&self) -> &ProgressAggregate {
        &self.progress
    }

    pub fn words(&self) -> &[WordPair] {
        &self.words
    }

    pub fn normalizer(&self) -> &dyn Normalizer {
        self.normalizer.as_ref()
    }

    fn enter_card(&mut self) {
        self.generation += 1;
        self.phase = CardPhase::Awaiting;
        self.current = self.sequencer.current_index(self.words.len());
        self.rebuild_choices();
    }

    fn rebuild_choices(&mut self) {
        self.choices = self.current.map(|index| {
            let answers: Vec<&str> = self.words.iter().map(|w| w.target.as_str()).collect();
            self.generator.build(
                self.normalizer.as_ref(),
                &self.words[index].target,
                &answers,
                Some(index),
                &mut self.rng,
            )
        });
    }

    fn clear_card(&mut self) {
        self.generation += 1;
        self.current = None;
        self.choices = None;
        self.phase = CardPhase::Awaiting;
    }
}
