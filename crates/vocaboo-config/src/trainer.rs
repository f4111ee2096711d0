use serde::{Deserialize, Serialize};

use crate::env_number;

fn default_max_distractors() -> usize {
    3
}

fn default_advance_delay_ms() -> u64 {
    700
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct TrainerConfig {
    /// Upper bound on wrong options shown next to the correct one
    #[serde(default = "default_max_distractors")]
    pub max_distractors: usize,
    /// Feedback pause between a correct answer and the next card
    #[serde(default = "default_advance_delay_ms")]
    pub advance_delay_ms: u64,
}

impl TrainerConfig {
    pub fn new() -> Self {
        Self {
            max_distractors: default_max_distractors(),
            advance_delay_ms: env_number("ADVANCE_DELAY_MS").unwrap_or(default_advance_delay_ms()),
        }
    }
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            max_distractors: default_max_distractors(),
            advance_delay_ms: default_advance_delay_ms(),
        }
    }
}
