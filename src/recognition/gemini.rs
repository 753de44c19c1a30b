//! Gemini `generateContent` client.

use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use bytes::Bytes;
use serde::Deserialize;
use tracing::debug;

use super::{NutritionEstimate, RecognitionError, Recognizer};
use crate::config::GeminiConfig;

const PROMPT: &str = r#"Analyze this food image and return ONLY a valid JSON object with these keys:
"name", "calories", "protein", "carbs", "fat", "confidence".
Do NOT include any comments, explanations, or extra text.
Example:
{
  "name": "Rice",
  "calories": 130,
  "protein": 2.7,
  "carbs": 28,
  "fat": 0.3,
  "confidence": 0.95
}
"#;

#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            api_url: config.api_url,
            api_key: config.api_key,
        })
    }

    fn first_text(response: GenerateContentResponse) -> Option<String> {
        response
            .candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}

/// Remove an optional ```` ```json ```` fence around the model's reply.
/// No other normalization is attempted.
fn strip_code_fences(raw: &str) -> String {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```") {
        let labelled = rest
            .get(..4)
            .map_or(false, |label| label.eq_ignore_ascii_case("json"));
        text = if labelled { &rest[4..] } else { rest };
    }
    text.replace("```", "").trim().to_string()
}

/// Parse the model's textual reply as a strict nutrition estimate.
pub fn parse_estimate(raw: &str) -> Result<NutritionEstimate, RecognitionError> {
    let cleaned = strip_code_fences(raw);
    Ok(serde_json::from_str(&cleaned)?)
}

#[async_trait]
impl Recognizer for GeminiClient {
    async fn analyze(
        &self,
        image: Bytes,
        mime: &str,
    ) -> Result<NutritionEstimate, RecognitionError> {
        let body = serde_json::json!({
            "contents": [{
                "parts": [
                    { "text": PROMPT },
                    { "inline_data": { "mime_type": mime, "data": BASE64.encode(&image) } }
                ]
            }]
        });

        let response = self
            .http
            .post(&self.api_url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json::<GenerateContentResponse>()
            .await?;

        let text = Self::first_text(response).ok_or(RecognitionError::EmptyReply)?;
        debug!(reply = %text, "gemini reply");
        parse_estimate(&text)
    }
}
