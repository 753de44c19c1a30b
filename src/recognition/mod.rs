//! Food recognition: turns a photo into a structured nutrition estimate
//! via an external multimodal model. This is a pass-through format
//! bridge; the nutritional accuracy of the reply is not validated here.

pub mod gemini;
pub mod handlers;

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

pub use gemini::GeminiClient;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::analyze_routes())
}

/// Structured nutrition estimate as reported upstream. Confidence is
/// whatever the model claims, unclamped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NutritionEstimate {
    pub name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub confidence: f64,
}

#[derive(Debug, thiserror::Error)]
pub enum RecognitionError {
    #[error("recognition request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("recognition reply contained no text")]
    EmptyReply,

    #[error("recognition reply was not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

#[async_trait]
pub trait Recognizer: Send + Sync {
    /// One request, no retry; the caller surfaces any failure as-is.
    async fn analyze(&self, image: Bytes, mime: &str)
        -> Result<NutritionEstimate, RecognitionError>;
}
