use serde::{Deserialize, Serialize};

use crate::word::{WordId, WordStats};

#[derive(Debug, Clone)]
pub enum AppEvent {
    UiEvent(UiEvent),
    StartSession,
    SubmitChoice(String),
    /// Speak the choices of the current card
    SpeakChoices,
    Speak(String),
    /// Latest content of the lookup input; every update restarts the debounce
    SuggestInput(String),

    IllustrationFetched {
        generation: u64,
        outcome: FetchOutcome,
    },
    AdvanceDue {
        generation: u64,
    },
    SuggestionsReady {
        generation: u64,
        candidates: Vec<String>,
    },

    ShowCard(CardView),
    ShowIllustration(IllustrationView),
    ShowVerdict(VerdictView),
    ShowProgress(ProgressView),
    ShowSuggestions(Vec<String>),
    EmptyVocabulary,
    Status(String),
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    Close,
}

/// Result of one illustration lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Found(String),
    Missing,
    Failed(String),
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    pub word_id: WordId,
    pub generation: u64,
    pub prompt: String,
    pub choices: Vec<String>,
    /// 1-based position in the current pass
    pub position: usize,
    pub pass_len: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IllustrationView {
    pub generation: u64,
    pub state: IllustrationDisplay,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IllustrationDisplay {
    Loading,
    Image(String),
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerdictView {
    pub correct: bool,
    pub selected: String,
    pub answer: String,
    pub stats: WordStats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressView {
    pub answered: u64,
    pub accuracy_percent: u32,
    pub streak: u32,
}
