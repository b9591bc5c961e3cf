//! AI thumbnail critique models.
//!
//! The analysis itself is produced by an external model. These types describe
//! the shape we expect back and check it on receipt, so a response that
//! parses but breaks the contract is still rejected.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Critique of a single thumbnail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Overall score (0-100)
    pub score: i32,

    /// What works well
    pub strengths: Vec<String>,

    /// What hurts click-through
    pub weaknesses: Vec<String>,

    /// Actionable improvements
    pub suggestions: Vec<String>,

    /// One short paragraph
    pub summary: String,

    /// Suggested hashtags
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hashtags: Option<Vec<String>>,

    /// Suggested caption
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,

    /// Dominant colours as hex strings (e.g. "#FF0000")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dominant_colors: Option<Vec<String>>,

    /// Overall mood of the image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<String>,
}

impl AnalysisResult {
    /// Validate the result against the expected schema.
    pub fn validate(&self) -> Result<(), String> {
        if !(0..=100).contains(&self.score) {
            return Err(format!("Score {} is outside 0-100", self.score));
        }

        if self.summary.trim().is_empty() {
            return Err("Summary must not be empty".to_string());
        }

        if let Some(colors) = &self.dominant_colors {
            if let Some(bad) = colors.iter().find(|c| !is_hex_color(c)) {
                return Err(format!("Dominant color {:?} is not a hex color", bad));
            }
        }

        Ok(())
    }

    pub fn score_band(&self) -> ScoreBand {
        ScoreBand::from_score(self.score)
    }
}

/// Coarse rating derived from the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    /// Above 75
    Strong,
    /// Above 50
    Fair,
    Weak,
}

impl ScoreBand {
    pub fn from_score(score: i32) -> Self {
        if score > 75 {
            ScoreBand::Strong
        } else if score > 50 {
            ScoreBand::Fair
        } else {
            ScoreBand::Weak
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreBand::Strong => "strong",
            ScoreBand::Fair => "fair",
            ScoreBand::Weak => "weak",
        }
    }
}

impl fmt::Display for ScoreBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One image inlined into an AI request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct InlineImage {
    /// MIME type of the encoded bytes
    pub mime_type: String,
    /// Base64-encoded image bytes
    pub data: String,
}

/// `#RGB` or `#RRGGBB`.
fn is_hex_color(s: &str) -> bool {
    match s.strip_prefix('#') {
        Some(hex) => (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}
