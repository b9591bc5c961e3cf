//! AI thumbnail critique.
//!
//! Sends one inline image plus a fixed instruction to Gemini and validates
//! the JSON that comes back against [`AnalysisResult`].
//!
//! The feature is optional: without an API key [`AnalysisConfig::from_env`]
//! returns `None` and no client is built.
//!
//! [`AnalysisResult`]: tubethumb_models::AnalysisResult

pub mod client;
pub mod config;
pub mod error;
pub mod prompt;
mod types;

pub use client::AnalysisClient;
pub use config::AnalysisConfig;
pub use error::{AiError, AiResult};
