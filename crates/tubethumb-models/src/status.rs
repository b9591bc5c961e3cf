//! Lookup status shown to the user.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Four-state status of the lookup flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppState {
    /// Nothing looked up yet
    #[default]
    Idle,
    /// A lookup is in flight
    Analyzing,
    /// The current lookup result is available
    Ready,
    /// The lookup flow failed. Rejected input does not enter this state.
    Error,
}

impl AppState {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppState::Idle => "idle",
            AppState::Analyzing => "analyzing",
            AppState::Ready => "ready",
            AppState::Error => "error",
        }
    }
}

impl std::fmt::Display for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
