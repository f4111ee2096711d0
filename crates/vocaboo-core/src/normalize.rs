use unicode_normalization::UnicodeNormalization;
use vocaboo_config::normalization::NormalizationConfig;

/// Canonical form used for every equality check on answers.
///
/// Answer comparison, distractor dedup and vocabulary dedup all go through the
/// same implementation, so two strings are either the same answer everywhere
/// or distinct everywhere.
pub trait Normalizer: Send + Sync {
    fn normalize(&self, text: &str) -> String;

    fn same(&self, a: &str, b: &str) -> bool {
        self.normalize(a) == self.normalize(b)
    }
}

/// Trim, NFC compose, lowercase, then apply the configured letter folds.
#[derive(Debug, Clone)]
pub struct FoldingNormalizer {
    folds: Vec<(String, String)>,
}

impl FoldingNormalizer {
    pub fn new<I, A, B>(folds: I) -> Self
    where
        I: IntoIterator<Item = (A, B)>,
        A: AsRef<str>,
        B: AsRef<str>,
    {
        let folds = folds
            .into_iter()
            .map(|(from, to)| (canonical(from.as_ref()), canonical(to.as_ref())))
            .filter(|(from, _)| !from.is_empty())
            .collect();

        Self { folds }
    }

    pub fn from_config(config: &NormalizationConfig) -> Self {
        Self::new(config.folds.iter().map(|f| (f.from.as_str(), f.to.as_str())))
    }
}

impl Default for FoldingNormalizer {
    fn default() -> Self {
        Self::from_config(&NormalizationConfig::default())
    }
}

impl Normalizer for FoldingNormalizer {
    fn normalize(&self, text: &str) -> String {
        let mut text = canonical(text);

        for (from, to) in &self.folds {
            if text.contains(from.as_str()) {
                text = text.replace(from.as_str(), to);
            }
        }

        text
    }
}

fn canonical(text: &str) -> String {
    let text = text.trim();
    if text.is_empty() {
        return String::new();
    }

    text.nfc().collect::<String>().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_case_and_configured_letters() {
        let normalizer = FoldingNormalizer::default();
        assert_eq!(normalizer.normalize("  Ёжик "), "ежик");
        assert_eq!(normalizer.normalize("CAT"), "cat");
        assert!(normalizer.same("ёлка", "Елка"));
    }

    #[test]
    fn decomposed_letters_fold_like_composed_ones() {
        let normalizer = FoldingNormalizer::default();
        // cyrillic "е" followed by a combining diaeresis
        assert_eq!(normalizer.normalize("\u{0435}\u{0308}"), "е");
    }

    #[test]
    fn empty_and_blank_input_normalize_to_empty() {
        let normalizer = FoldingNormalizer::default();
        assert_eq!(normalizer.normalize(""), "");
        assert_eq!(normalizer.normalize(" \t\n"), "");
    }

    #[test]
    fn no_folds_means_case_folding_only() {
        let normalizer = FoldingNormalizer::new(Vec::<(String, String)>::new());
        assert_eq!(normalizer.normalize("Ёж"), "ёж");
        assert!(!normalizer.same("ёж", "еж"));
    }

    #[test]
    fn does_not_collapse_inner_whitespace() {
        let normalizer = FoldingNormalizer::default();
        assert!(!normalizer.same("ice cream", "ice  cream"));
    }
}
