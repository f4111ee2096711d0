use std::env;

use serde::{Deserialize, Serialize};

use crate::env_number;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ImageProviderKind {
    Wikipedia,
    Pexels,
}

fn default_enabled() -> bool {
    true
}

fn default_provider() -> ImageProviderKind {
    ImageProviderKind::Wikipedia
}

fn default_timeout_ms() -> u64 {
    8000
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ImageConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_provider")]
    pub provider: ImageProviderKind,
    /// Required by Pexels, ignored by Wikipedia
    #[serde(default)]
    pub api_key: String,
    /// Override of the provider endpoint, empty means the provider default
    #[serde(default)]
    pub api_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl ImageConfig {
    pub fn new() -> Self {
        let api_key = env::var("PEXELS_API_KEY").unwrap_or_default();
        let provider = if api_key.trim().is_empty() {
            ImageProviderKind::Wikipedia
        } else {
            ImageProviderKind::Pexels
        };

        Self {
            enabled: default_enabled(),
            provider,
            api_key,
            api_url: String::new(),
            timeout_ms: env_number("IMAGE_TIMEOUT_MS").unwrap_or(default_timeout_ms()),
        }
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            provider: default_provider(),
            api_key: String::new(),
            api_url: String::new(),
            timeout_ms: default_timeout_ms(),
        }
    }
}
