use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    routing::post,
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::AuthUser,
    error::{ApiError, FieldError},
    state::AppState,
};

use super::NutritionEstimate;

pub fn analyze_routes() -> Router<AppState> {
    Router::new()
        .route("/ai/analyze-food", post(analyze_food))
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024)) // 10MB
}

/// POST /api/ai/analyze-food (multipart, field `image`)
#[instrument(skip(state, multipart))]
pub async fn analyze_food(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    mut multipart: Multipart,
) -> Result<Json<NutritionEstimate>, ApiError> {
    let mut image = None;
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                if field.name() == Some("image") {
                    let mime = field
                        .content_type()
                        .map(|ct| ct.to_string())
                        .unwrap_or_else(|| "image/jpeg".into());
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| ApiError::Internal(anyhow::anyhow!(e)))?;
                    image = Some((bytes, mime));
                    break;
                }
            }
            Ok(None) => break,
            Err(e) => {
                return Err(ApiError::Validation(vec![FieldError::new(
                    "image",
                    &format!("Invalid multipart body: {e}"),
                )]));
            }
        }
    }

    let Some((bytes, mime)) = image else {
        return Err(ApiError::Validation(vec![FieldError::new(
            "image",
            "No image provided",
        )]));
    };

    let estimate = state
        .recognizer
        .analyze(bytes, &mime)
        .await
        .map_err(|e| ApiError::Recognition(e.to_string()))?;

    tracing::info!(user_id, food = %estimate.name, "food analyzed");
    Ok(Json(estimate))
}
