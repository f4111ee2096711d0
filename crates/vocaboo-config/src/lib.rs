use std::env;

use serde::{Deserialize, Serialize};

use self::images::ImageConfig;
use self::normalization::NormalizationConfig;
use self::speech::SpeechConfig;
use self::storage::StorageConfig;
use self::trainer::TrainerConfig;
use self::translator::TranslatorConfig;

pub mod images;
pub mod normalization;
pub mod speech;
pub mod storage;
pub mod trainer;
pub mod translator;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub trainer: TrainerConfig,
    pub normalization: NormalizationConfig,
    pub images: ImageConfig,
    pub translator: TranslatorConfig,
    pub speech: SpeechConfig,
    pub storage: StorageConfig,

    /// Emit logs as JSON lines instead of human readable text
    pub log_json: bool,
}

impl Config {
    pub fn new() -> Self {
        let log_json = env::var("LOG_FORMAT")
            .map(|v| v.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        Config {
            trainer: TrainerConfig::new(),
            normalization: NormalizationConfig::default(),
            images: ImageConfig::new(),
            translator: TranslatorConfig::new(),
            speech: SpeechConfig::default(),
            storage: StorageConfig::new(),

            log_json,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn env_number<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_profile_keeps_defaults_for_missing_keys() {
        let json = r#"{ "trainer": { "advance_delay_ms": 250 }, "speech": { "enabled": false } }"#;
        let config: Config = serde_json::from_str(json).unwrap();

        assert_eq!(config.trainer.advance_delay_ms, 250);
        assert_eq!(config.trainer.max_distractors, 3);
        assert!(!config.speech.enabled);
        assert_eq!(config.speech.command, "espeak");
        assert_eq!(config.storage.words_key, "ruen_words_v1");
        assert_eq!(config.normalization.folds.len(), 1);
    }

    #[test]
    fn empty_fold_list_is_respected() {
        let json = r#"{ "normalization": { "folds": [] } }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert!(config.normalization.folds.is_empty());
    }
}
