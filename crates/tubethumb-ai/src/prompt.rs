//! Instruction sent alongside the thumbnail.

use serde_json::{json, Value};

/// Fixed critique instruction.
pub const ANALYSIS_PROMPT: &str = r##"Analyze this YouTube thumbnail as an expert social media marketer and graphic designer.
Provide a structured JSON response.

Evaluate:
1. Visual clarity and text readability.
2. Emotional impact.
3. Click-through potential.

Return the response in this exact JSON schema:
{
  "score": number (0-100),
  "strengths": string[] (3 bullet points),
  "weaknesses": string[] (3 bullet points),
  "suggestions": string[] (3 actionable improvements),
  "summary": string (1 short paragraph),
  "hashtags": string[] (up to 5 suggested hashtags, each starting with #),
  "caption": string (one suggested caption for the video),
  "dominantColors": string[] (up to 5 dominant colors as hex codes, e.g. "#FF0000"),
  "sentiment": string (one or two words describing the overall mood)
}
"##;

/// `responseSchema` for the `generationConfig` block.
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "score": { "type": "INTEGER" },
            "strengths": { "type": "ARRAY", "items": { "type": "STRING" } },
            "weaknesses": { "type": "ARRAY", "items": { "type": "STRING" } },
            "suggestions": { "type": "ARRAY", "items": { "type": "STRING" } },
            "summary": { "type": "STRING" },
            "hashtags": { "type": "ARRAY", "items": { "type": "STRING" } },
            "caption": { "type": "STRING" },
            "dominantColors": { "type": "ARRAY", "items": { "type": "STRING" } },
            "sentiment": { "type": "STRING" }
        },
        "required": ["score", "strengths", "weaknesses", "suggestions", "summary"]
    })
}
