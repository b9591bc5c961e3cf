//! Application error types.

use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    InvalidUrl(String),

    #[error("No thumbnail lookup is active")]
    NoCurrentRecord,

    #[error("No history entry at position {0}")]
    HistoryIndex(usize),

    #[error("Thumbnail variant '{0}' is missing from the current record")]
    MissingVariant(String),

    #[error("Media error: {0}")]
    Media(#[from] tubethumb_media::MediaError),

    #[error("History error: {0}")]
    History(#[from] tubethumb_history::HistoryError),

    #[error("AI analysis failed: {0}")]
    Ai(#[from] tubethumb_ai::AiError),
}

impl AppError {
    pub fn invalid_url(msg: impl Into<String>) -> Self {
        Self::InvalidUrl(msg.into())
    }
}
