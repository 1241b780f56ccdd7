use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::fix::FixError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Input too short: {actual} characters (minimum {min})")]
    InputTooShort { min: usize, actual: usize },

    #[error("Unsupported document: {0}")]
    UnsupportedDocument(String),

    #[error("A fix is already in progress for version {0}")]
    FixInProgress(uuid::Uuid),

    #[error("Rewrite capability unavailable: {0}")]
    RewriteUnavailable(String),

    #[error("Rewrite capability returned an empty response")]
    RewriteEmptyResponse,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<FixError> for AppError {
    fn from(e: FixError) -> Self {
        match e {
            FixError::RewriteCapabilityUnavailable(msg) => AppError::RewriteUnavailable(msg),
            FixError::RewriteEmptyResponse => AppError::RewriteEmptyResponse,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::InputTooShort { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "INPUT_TOO_SHORT",
                self.to_string(),
            ),
            AppError::UnsupportedDocument(msg) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "UNSUPPORTED_DOCUMENT",
                msg.clone(),
            ),
            AppError::FixInProgress(_) => (StatusCode::CONFLICT, "FIX_IN_PROGRESS", self.to_string()),
            AppError::RewriteUnavailable(msg) => {
                tracing::error!("Rewrite unavailable: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "REWRITE_UNAVAILABLE",
                    "The rewriting service is unavailable; the original CV was not changed"
                        .to_string(),
                )
            }
            AppError::RewriteEmptyResponse => {
                tracing::error!("Rewrite returned no usable text");
                (
                    StatusCode::BAD_GATEWAY,
                    "REWRITE_EMPTY_RESPONSE",
                    "The rewriting service returned no text; the original CV was not changed"
                        .to_string(),
                )
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
