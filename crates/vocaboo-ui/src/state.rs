use vocaboo_types::{CardView, IllustrationDisplay};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    Train,
    Lookup,
}

/// What the terminal currently shows
#[derive(Debug)]
pub struct UiState {
    pub mode: UiMode,
    pub card: Option<CardView>,
    pub illustration: IllustrationDisplay,
    pub prompt: bool,
}

impl UiState {
    pub fn new(mode: UiMode) -> Self {
        Self {
            mode,
            card: None,
            illustration: IllustrationDisplay::Placeholder,
            prompt: atty::is(atty::Stream::Stdin),
        }
    }
}
