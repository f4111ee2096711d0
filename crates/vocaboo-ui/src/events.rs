use vocaboo_core::display::{card_counter, title_case};
use vocaboo_types::{AppEvent, IllustrationDisplay, UiEvent};

use crate::state::UiState;

/// Apply an app event to the terminal state and return the text to print.
pub fn handle_events(event: AppEvent, state: &mut UiState) -> Option<String> {
    match event {
        AppEvent::ShowCard(card) => {
            let mut out = format!(
                "\n{}\n  {}\n",
                card_counter(card.position.saturating_sub(1), card.pass_len),
                card.prompt
            );
            for (i, choice) in card.choices.iter().enumerate() {
                out.push_str(&format!("  [{}] {}\n", i + 1, title_case(choice)));
            }
            state.illustration = IllustrationDisplay::Loading;
            state.card = Some(card);
            Some(out)
        }
        AppEvent::ShowIllustration(view) => {
            let current = state.card.as_ref().map(|c| c.generation);
            if current != Some(view.generation) {
                tracing::debug!("[UI] Ignoring illustration for generation {}", view.generation);
                return None;
            }
            state.illustration = view.state.clone();
            match view.state {
                IllustrationDisplay::Loading => None,
                IllustrationDisplay::Image(url) => Some(format!("  (image: {})\n", url)),
                IllustrationDisplay::Placeholder => Some("  (no illustration)\n".to_string()),
            }
        }
        AppEvent::ShowVerdict(verdict) => {
            let stats = format!(
                "seen {} / correct {} / wrong {}",
                verdict.stats.seen, verdict.stats.correct, verdict.stats.wrong
            );
            if verdict.correct {
                Some(format!("  Correct! ({})\n", stats))
            } else {
                Some(format!(
                    "  Wrong: '{}'. Correct answer: {} ({})\n",
                    verdict.selected, verdict.answer, stats
                ))
            }
        }
        AppEvent::ShowProgress(progress) => Some(format!(
            "  Answered: {}  Accuracy: {}%  Streak: {}\n",
            progress.answered, progress.accuracy_percent, progress.streak
        )),
        AppEvent::ShowSuggestions(candidates) => {
            if candidates.is_empty() {
                return Some("  (no suggestions)\n".to_string());
            }
            let list: Vec<String> = candidates
                .iter()
                .enumerate()
                .map(|(i, c)| format!("  {}. {}", i + 1, c))
                .collect();
            Some(format!("{}\n", list.join("\n")))
        }
        AppEvent::EmptyVocabulary => {
            state.card = None;
            Some("No words to train. Add some with `vocaboo add <source> <target>`.\n".to_string())
        }
        AppEvent::Status(message) => Some(format!("  {}\n", message)),
        AppEvent::UiEvent(UiEvent::Close) => None,
        _ => None,
    }
}
