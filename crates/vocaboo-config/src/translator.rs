use serde::{Deserialize, Serialize};

use crate::env_number;

fn default_enabled() -> bool {
    true
}

fn default_provider() -> String {
    "mymemory".to_string()
}

fn default_from_lang() -> String {
    "ru".to_string()
}

fn default_to_lang() -> String {
    "en".to_string()
}

fn default_api_url() -> String {
    "https://api.mymemory.translated.net/get".to_string()
}

fn default_debounce_ms() -> u64 {
    400
}

fn default_max_candidates() -> usize {
    10
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct TranslatorConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_from_lang")]
    pub from_lang: String,
    #[serde(default = "default_to_lang")]
    pub to_lang: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_max_candidates")]
    pub max_candidates: usize,
}

impl TranslatorConfig {
    pub fn new() -> Self {
        Self {
            debounce_ms: env_number("SUGGEST_DEBOUNCE_MS").unwrap_or(default_debounce_ms()),
            ..Self::default()
        }
    }
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            provider: default_provider(),
            from_lang: default_from_lang(),
            to_lang: default_to_lang(),
            api_url: default_api_url(),
            debounce_ms: default_debounce_ms(),
            max_candidates: default_max_candidates(),
        }
    }
}
