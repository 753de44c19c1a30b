//! API error taxonomy with consistent JSON responses.
//!
//! Every error body serializes as `{"message": ..., "errors"?: [...]}`.
//! Unexpected errors are logged and surface as a generic 500 with no
//! internal detail.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Field-level validation detail.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Validation error")]
    Validation(Vec<FieldError>),

    /// Duplicate username/email. The original API reports this as 400.
    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    /// Upstream recognition failure.
    #[error("Food recognition failed")]
    Recognition(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<FieldError>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, errors) = match self {
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                "Validation error".to_string(),
                Some(errors),
            ),
            ApiError::Conflict(msg) => (StatusCode::BAD_REQUEST, msg, None),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            ApiError::Recognition(detail) => {
                tracing::error!(error = %detail, "food recognition failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Food recognition failed".to_string(),
                    None,
                )
            }
            ApiError::Internal(err) => {
                tracing::error!(error = %err, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
        };

        (status, Json(ErrorBody { message, errors })).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        let cases = [
            (
                ApiError::Validation(vec![FieldError::new("email", "required")]),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::Conflict("User already exists".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::Unauthorized("Invalid credentials".into()),
                StatusCode::UNAUTHORIZED,
            ),
            (
                ApiError::NotFound("Food entry not found".into()),
                StatusCode::NOT_FOUND,
            ),
            (
                ApiError::Recognition("upstream 503".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ApiError::Internal(anyhow::anyhow!("boom")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn internal_error_leaks_no_detail() {
        let response = ApiError::Internal(anyhow::anyhow!("secret db string")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
