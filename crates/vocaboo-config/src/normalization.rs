use serde::{Deserialize, Serialize};

/// Replace every occurrence of `from` with `to` after case folding.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct LetterFold {
    pub from: String,
    pub to: String,
}

fn default_folds() -> Vec<LetterFold> {
    vec![LetterFold {
        from: "ё".to_string(),
        to: "е".to_string(),
    }]
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct NormalizationConfig {
    #[serde(default = "default_folds")]
    pub folds: Vec<LetterFold>,
}

impl Default for NormalizationConfig {
    fn default() -> Self {
        Self {
            folds: default_folds(),
        }
    }
}
