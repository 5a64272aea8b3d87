//! API error type and its mapping to HTTP responses
//!
//! Every failure leaving the HTTP layer is an [`ApiError`], rendered as a
//! JSON body with a single human-readable `message` field. Internal detail
//! (backend errors, hash failures) is logged server-side and never exposed
//! to the client.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use validator::ValidationErrors;

use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Client-supplied data failed validation (400)
    #[error("{0}")]
    Validation(String),

    /// Missing or invalid session (401)
    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated but not allowed (403)
    #[error("{0}")]
    Forbidden(String),

    /// Referenced entity absent (404)
    #[error("{0}")]
    NotFound(String),

    /// State transition not allowed (409)
    #[error("{0}")]
    Conflict(String),

    /// Storage backend failure (503)
    #[error("Storage backend unavailable")]
    Unavailable,

    /// Anything else (500)
    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status_code(),
            Json(json!({ "message": self.to_string() })),
        )
            .into_response()
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        tracing::error!(error = %err, "storage operation failed");
        match err {
            StorageError::Unavailable(_) => ApiError::Unavailable,
            StorageError::Corrupt(_) => ApiError::Internal,
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(first_validation_message(&errors))
    }
}

/// Extracts the first violated field's message from a validation result
///
/// Mirrors the original API behavior of reporting only the first failing
/// field rather than the whole error set.
pub fn first_validation_message(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .into_iter()
        .next()
        .and_then(|(field, field_errors)| {
            field_errors.first().map(|err| match &err.message {
                Some(message) => message.to_string(),
                None => format!("Invalid value for field '{}'", field),
            })
        })
        .unwrap_or_else(|| "Invalid request payload".to_string())
}
