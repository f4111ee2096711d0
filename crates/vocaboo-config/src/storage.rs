use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("vocaboo")
}

fn default_words_key() -> String {
    "ruen_words_v1".to_string()
}

fn default_progress_key() -> String {
    "ruen_progress_v1".to_string()
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_words_key")]
    pub words_key: String,
    #[serde(default = "default_progress_key")]
    pub progress_key: String,
}

impl StorageConfig {
    pub fn new() -> Self {
        let data_dir = env::var("VOCABOO_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_data_dir());

        Self {
            data_dir,
            ..Self::default()
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            words_key: default_words_key(),
            progress_key: default_progress_key(),
        }
    }
}
