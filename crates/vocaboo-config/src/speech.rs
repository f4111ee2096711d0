use serde::{Deserialize, Serialize};

fn default_enabled() -> bool {
    true
}

fn default_command() -> String {
    "espeak".to_string()
}

fn default_voice() -> String {
    "en-us".to_string()
}

fn default_rate() -> f32 {
    0.95
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct SpeechConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// External TTS program, invoked as `<command> -v <voice> -s <wpm> <text>`
    #[serde(default = "default_command")]
    pub command: String,
    #[serde(default = "default_voice")]
    pub voice: String,
    /// Relative speaking rate, 1.0 is the program's normal speed
    #[serde(default = "default_rate")]
    pub rate: f32,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            command: default_command(),
            voice: default_voice(),
            rate: default_rate(),
        }
    }
}
