//! TubeThumb application layer.
//!
//! Wires the extractor, thumbnail builder, media pipeline, history store and
//! optional AI client into one [`Orchestrator`] driven by the `tubethumb`
//! binary.

pub mod config;
pub mod error;
pub mod logging;
pub mod orchestrator;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use orchestrator::{AnalysisOutcome, Orchestrator, INVALID_URL_MESSAGE};
