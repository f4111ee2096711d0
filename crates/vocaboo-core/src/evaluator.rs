use chrono::{DateTime, Utc};
use vocaboo_types::{WordId, WordPair, WordStats};

use crate::normalize::Normalizer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub is_correct: bool,
}

/// Compare a submitted choice against the word's target.
pub fn evaluate(normalizer: &dyn Normalizer, selected: &str, word: &WordPair) -> Verdict {
    Verdict {
        is_correct: normalizer.same(selected, &word.target),
    }
}

/// A scored submission, returned to the owner of the stores.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub word_id: WordId,
    pub selected: String,
    pub answer: String,
    pub verdict: Verdict,
    /// Word stats after this answer
    pub stats: WordStats,
    pub recorded_at: DateTime<Utc>,
    /// Card generation the answer belongs to
    pub card_generation: u64,
}

impl Evaluation {
    pub fn is_correct(&self) -> bool {
        self.verdict.is_correct
    }

    /// Whether the session should move on after the feedback pause
    pub fn should_advance(&self) -> bool {
        self.verdict.is_correct
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::FoldingNormalizer;

    #[test]
    fn comparison_ignores_case_whitespace_and_folds() {
        let normalizer = FoldingNormalizer::default();
        let word = WordPair::new("ёлка", "Fir Tree");

        assert!(evaluate(&normalizer, " fir tree ", &word).is_correct);
        assert!(!evaluate(&normalizer, "fir", &word).is_correct);
        assert!(!evaluate(&normalizer, "", &word).is_correct);

        let reversed = WordPair::new("fir tree", "Ёлка");
        assert!(evaluate(&normalizer, "елка", &reversed).is_correct);
    }

    #[test]
    fn empty_target_matches_only_blank_selection() {
        let normalizer = FoldingNormalizer::default();
        let word = WordPair::new("пусто", "");
        assert!(evaluate(&normalizer, "  ", &word).is_correct);
        assert!(!evaluate(&normalizer, "x", &word).is_correct);
    }
}
