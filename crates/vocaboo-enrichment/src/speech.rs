use std::sync::Mutex;

use tokio::process::{Child, Command};
use vocaboo_config::speech::SpeechConfig;

use crate::Pronouncer;

/// espeak's default words per minute
const BASE_WPM: f32 = 175.0;

/// Speaks through an external TTS program.
///
/// A new utterance stops the previous one. Spawn failures are logged and
/// otherwise ignored.
pub struct CommandPronouncer {
    command: String,
    voice: String,
    wpm: u32,
    speaking: Mutex<Option<Child>>,
}

impl CommandPronouncer {
    pub fn new(config: &SpeechConfig) -> Self {
        Self {
            command: config.command.clone(),
            voice: config.voice.clone(),
            wpm: (BASE_WPM * config.rate.clamp(0.25, 4.0)).round() as u32,
            speaking: Mutex::new(None),
        }
    }

    fn args(&self, text: &str) -> Vec<String> {
        vec![
            "-v".to_string(),
            self.voice.clone(),
            "-s".to_string(),
            self.wpm.to_string(),
            text.to_string(),
        ]
    }
}

impl Pronouncer for CommandPronouncer {
    fn speak(&self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }

        if tokio::runtime::Handle::try_current().is_err() {
            tracing::debug!("No runtime, skipping speech");
            return;
        }

        let Ok(mut speaking) = self.speaking.lock() else {
            return;
        };

        if let Some(mut previous) = speaking.take() {
            let _ = previous.start_kill();
        }

        match Command::new(&self.command).args(self.args(text)).spawn() {
            Ok(child) => *speaking = Some(child),
            Err(e) => tracing::debug!("Speech command '{}' failed: {}", self.command, e),
        }
    }
}

/// Used when speech is disabled.
pub struct SilentPronouncer;

impl Pronouncer for SilentPronouncer {
    fn speak(&self, text: &str) {
        tracing::trace!("Speech disabled, not speaking '{}'", text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_maps_to_words_per_minute() {
        let config = SpeechConfig::default();
        let pronouncer = CommandPronouncer::new(&config);
        assert_eq!(
            pronouncer.args("cat"),
            vec!["-v", "en-us", "-s", "166", "cat"]
        );
    }

    #[tokio::test]
    async fn missing_program_is_swallowed() {
        let config = SpeechConfig {
            command: "vocaboo-no-such-tts-program".to_string(),
            ..SpeechConfig::default()
        };
        let pronouncer = CommandPronouncer::new(&config);
        pronouncer.speak("cat");
        pronouncer.speak("");
    }
}
