//! Gemini `generateContent` client for thumbnail critique.

use reqwest::Client;
use tracing::{debug, info, warn};
use tubethumb_models::{AnalysisResult, InlineImage};

use crate::config::AnalysisConfig;
use crate::error::{AiError, AiResult};
use crate::prompt::{response_schema, ANALYSIS_PROMPT};
use crate::types::{Content, GeminiRequest, GeminiResponse, GenerationConfig, Part};

/// Header carrying the API key. Kept out of the URL so transport errors,
/// which print the URL, never expose it.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Thumbnail critique client. One attempt per call, no retry.
#[derive(Debug, Clone)]
pub struct AnalysisClient {
    http: Client,
    config: AnalysisConfig,
}

impl AnalysisClient {
    pub fn new(config: AnalysisConfig) -> AiResult<Self> {
        if config.api_key.trim().is_empty() {
            return Err(AiError::config_error("API key is empty"));
        }

        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(AiError::Network)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables. `None` when no key is configured.
    pub fn from_env() -> Option<AiResult<Self>> {
        AnalysisConfig::from_env().map(Self::new)
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Critique a single thumbnail image.
    pub async fn analyze(&self, image: InlineImage) -> AiResult<AnalysisResult> {
        let request = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part::image(image), Part::text(ANALYSIS_PROMPT)],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: response_schema(),
            },
        };

        info!(model = %self.config.model, "Requesting thumbnail analysis");

        let response = self
            .http
            .post(self.config.endpoint())
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            warn!(status, "Gemini API returned an error");
            return Err(AiError::Http { status, body });
        }

        let gemini_response: GeminiResponse = response
            .json()
            .await
            .map_err(|e| AiError::parse(format!("invalid Gemini envelope: {}", e)))?;

        let text = gemini_response.text().unwrap_or_default();
        let result = parse_analysis(&text)?;

        info!(score = result.score, band = %result.score_band(), "Thumbnail analysis complete");
        Ok(result)
    }
}

/// Parse and validate the model's JSON text.
pub(crate) fn parse_analysis(text: &str) -> AiResult<AnalysisResult> {
    let json = strip_code_fence(text);
    if json.is_empty() {
        return Err(AiError::EmptyResponse);
    }

    debug!(len = json.len(), "Parsing analysis JSON");

    let result: AnalysisResult = serde_json::from_str(json)
        .map_err(|e| AiError::schema_mismatch(e.to_string()))?;
    result.validate().map_err(AiError::schema_mismatch)?;

    Ok(result)
}

/// Remove a surrounding markdown code fence (```json ... ```), if any.
fn strip_code_fence(text: &str) -> &str {
    let text = text.trim();
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    let text = text.strip_suffix("```").unwrap_or(text);
    text.trim()
}
