use vocaboo_types::{AppEvent, UiEvent};

use crate::state::{UiMode, UiState};

/// Map one line of user input to an event for the app.
pub fn parse_input(line: &str, state: &UiState) -> Option<AppEvent> {
    let trimmed = line.trim();

    if trimmed.eq_ignore_ascii_case("q") || trimmed.eq_ignore_ascii_case(":q") {
        return Some(AppEvent::UiEvent(UiEvent::Close));
    }

    match state.mode {
        UiMode::Lookup => Some(AppEvent::SuggestInput(trimmed.to_string())),
        UiMode::Train => parse_train_input(trimmed, state),
    }
}

fn parse_train_input(input: &str, state: &UiState) -> Option<AppEvent> {
    if input.eq_ignore_ascii_case("s") {
        return Some(AppEvent::SpeakChoices);
    }

    let card = state.card.as_ref()?;

    if let Ok(number) = input.parse::<usize>() {
        return number
            .checked_sub(1)
            .and_then(|i| card.choices.get(i))
            .map(|choice| AppEvent::SubmitChoice(choice.clone()));
    }

    // typed answers are submitted as-is
    (!input.is_empty()).then(|| AppEvent::SubmitChoice(input.to_string()))
}
