use std::collections::HashSet;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::normalize::Normalizer;

/// The options offered for one card.
///
/// No two entries normalize to the same string, and the correct answer is
/// never among the distractors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceSet {
    correct: String,
    distractors: Vec<String>,
    display_order: Vec<String>,
}

impl ChoiceSet {
    pub fn correct(&self) -> &str {
        &self.correct
    }

    pub fn distractors(&self) -> &[String] {
        &self.distractors
    }

    /// Correct answer and distractors in the order they are shown
    pub fn display_order(&self) -> &[String] {
        &self.display_order
    }

    pub fn len(&self) -> usize {
        self.display_order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.display_order.is_empty()
    }

    /// Choice at a zero-based display position
    pub fn get(&self, index: usize) -> Option<&str> {
        self.display_order.get(index).map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DistractorGenerator {
    max_distractors: usize,
}

impl DistractorGenerator {
    pub fn new(max_distractors: usize) -> Self {
        Self { max_distractors }
    }

    pub fn max_distractors(&self) -> usize {
        self.max_distractors
    }

    /// Build the options for `correct`.
    ///
    /// The pool is every non-blank answer except the one at `exclude_index`,
    /// deduplicated by normalized form and without anything equal to the
    /// correct answer. Small pools yield fewer distractors, never padding.
    pub fn build<S, R>(
        &self,
        normalizer: &dyn Normalizer,
        correct: &str,
        answers: &[S],
        exclude_index: Option<usize>,
        rng: &mut R,
    ) -> ChoiceSet
    where
        S: AsRef<str>,
        R: Rng + ?Sized,
    {
        let correct = correct.trim().to_string();

        let mut seen = HashSet::new();
        seen.insert(normalizer.normalize(&correct));

        let mut pool: Vec<String> = answers
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != exclude_index)
            .map(|(_, answer)| answer.as_ref().trim())
            .filter(|answer| !answer.is_empty())
            .filter(|answer| seen.insert(normalizer.normalize(answer)))
            .map(str::to_string)
            .collect();

        pool.shuffle(rng);
        pool.truncate(self.max_distractors);

        let mut display_order = Vec::with_capacity(pool.len() + 1);
        display_order.push(correct.clone());
        display_order.extend(pool.iter().cloned());
        display_order.shuffle(rng);

        ChoiceSet {
            correct,
            distractors: pool,
            display_order,
        }
    }
}

impl Default for DistractorGenerator {
    fn default() -> Self {
        Self::new(3)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::normalize::FoldingNormalizer;

    fn assert_unique(normalizer: &FoldingNormalizer, choices: &ChoiceSet) {
        let normalized: HashSet<_> = choices
            .display_order()
            .iter()
            .map(|c| normalizer.normalize(c))
            .collect();
        assert_eq!(normalized.len(), choices.len(), "{choices:?}");
    }

    #[test]
    fn builds_three_distractors_from_large_pool() {
        let normalizer = FoldingNormalizer::default();
        let mut rng = StdRng::seed_from_u64(1);
        let answers = ["cat", "dog", "bird", "fish", "horse", "cow"];

        let choices = DistractorGenerator::default().build(&normalizer, "cat", &answers, Some(0), &mut rng);

        assert_eq!(choices.correct(), "cat");
        assert_eq!(choices.distractors().len(), 3);
        assert_eq!(choices.len(), 4);
        assert!(choices.display_order().iter().any(|c| c == "cat"));
        assert_unique(&normalizer, &choices);
    }

    #[test]
    fn single_word_vocabulary_gives_only_the_correct_answer() {
        let normalizer = FoldingNormalizer::default();
        let mut rng = StdRng::seed_from_u64(2);

        let choices = DistractorGenerator::default().build(&normalizer, "cat", &["cat"], Some(0), &mut rng);

        assert!(choices.distractors().is_empty());
        assert_eq!(choices.display_order(), ["cat".to_string()]);
    }

    #[test]
    fn small_pool_is_not_padded() {
        let normalizer = FoldingNormalizer::default();
        let mut rng = StdRng::seed_from_u64(3);
        let answers = ["cat", "dog", "Dog ", "DOG", ""];

        let choices = DistractorGenerator::default().build(&normalizer, "cat", &answers, Some(0), &mut rng);

        assert_eq!(choices.distractors(), ["dog".to_string()]);
        assert_eq!(choices.len(), 2);
    }

    #[test]
    fn duplicates_of_the_correct_answer_are_never_distractors() {
        let normalizer = FoldingNormalizer::default();
        let answers = ["ёж", "Еж", " ЁЖ", "лиса", "волк"];

        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let choices = DistractorGenerator::default().build(&normalizer, "ёж", &answers, Some(0), &mut rng);

            assert!(
                choices
                    .distractors()
                    .iter()
                    .all(|d| !normalizer.same(d, choices.correct()))
            );
            assert_eq!(choices.distractors().len(), 2);
            assert_unique(&normalizer, &choices);
        }
    }

    #[test]
    fn correct_answer_is_always_present() {
        let normalizer = FoldingNormalizer::default();
        let answers: Vec<String> = (0..20).map(|i| format!("word{i}")).collect();

        for seed in 0..100 {
            let mut rng = StdRng::seed_from_u64(seed);
            let index = (seed % 20) as usize;
            let choices =
                DistractorGenerator::default().build(&normalizer, &answers[index], &answers, Some(index), &mut rng);

            let hits = choices
                .display_order()
                .iter()
                .filter(|c| normalizer.same(c, &answers[index]))
                .count();
            assert_eq!(hits, 1);
            assert_unique(&normalizer, &choices);
        }
    }

    #[test]
    fn respects_configured_distractor_count() {
        let normalizer = FoldingNormalizer::default();
        let mut rng = StdRng::seed_from_u64(4);
        let answers = ["a", "b", "c", "d", "e", "f", "g"];

        let choices = DistractorGenerator::new(5).build(&normalizer, "a", &answers, Some(0), &mut rng);
        assert_eq!(choices.distractors().len(), 5);

        let choices = DistractorGenerator::new(0).build(&normalizer, "a", &answers, Some(0), &mut rng);
        assert_eq!(choices.len(), 1);
    }
}
