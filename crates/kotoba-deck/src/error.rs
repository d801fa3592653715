#[derive(Debug, thiserror::Error)]
pub enum DeckError {
    #[error("deck has {available} entries but {requested} were requested")]
    InsufficientVocabulary { available: usize, requested: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
