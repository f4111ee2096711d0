use vocaboo_types::WordId;

#[derive(Debug, thiserror::Error)]
pub enum TrainerError {
    #[error("Vocabulary is empty")]
    EmptyVocabulary,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Word not found: {0}")]
    NotFound(WordId),
}
