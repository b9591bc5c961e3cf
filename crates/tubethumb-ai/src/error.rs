//! AI client error types.

use thiserror::Error;

/// Result type for AI operations.
pub type AiResult<T> = Result<T, AiError>;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Gemini API returned {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Empty response from AI")]
    EmptyResponse,

    #[error("Failed to parse AI response: {0}")]
    Parse(String),

    #[error("AI response does not match the expected shape: {0}")]
    SchemaMismatch(String),
}

impl AiError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn schema_mismatch(msg: impl Into<String>) -> Self {
        Self::SchemaMismatch(msg.into())
    }
}
