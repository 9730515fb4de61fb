//! Error types for ceye-an
//!
//! One failure taxonomy for the whole analysis request: validation failures
//! are reported before any network call, provider failures abort the request
//! as a unit, and nothing is retried here (retry policy belongs to callers).

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::services::sentinel::ProviderError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed bbox, missing/invalid comparison option, or a custom date
    /// violating the 60-day rule (400)
    #[error("Invalid request: {0}")]
    Validation(String),

    /// Provider credential exchange failed (502)
    #[error("Imagery provider authentication failed: {0}")]
    Authentication(String),

    /// One of the concurrent imagery fetches failed; no partial results (502)
    #[error("Imagery fetch failed: {0}")]
    ImageryFetch(String),

    /// A bbox that passed shape validation but degenerated numerically,
    /// or another unexpected arithmetic failure (500)
    #[error("Internal computation error: {0}")]
    Computation(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),

    /// Generic error
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<ceye_common::Error> for ApiError {
    fn from(err: ceye_common::Error) -> Self {
        match err {
            ceye_common::Error::InvalidInput(msg) => ApiError::Validation(msg),
            ceye_common::Error::Internal(msg) => ApiError::Computation(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<ProviderError> for ApiError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Auth { status, body } => {
                ApiError::Authentication(format!("{status}: {body}"))
            }
            ProviderError::Request { status, body } => {
                ApiError::ImageryFetch(format!("provider returned {status}: {body}"))
            }
            ProviderError::Network(msg) => ApiError::ImageryFetch(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg),
            ApiError::Authentication(msg) => (StatusCode::BAD_GATEWAY, "AUTH_FAILED", msg),
            ApiError::ImageryFetch(msg) => {
                (StatusCode::BAD_GATEWAY, "IMAGERY_FETCH_FAILED", msg)
            }
            ApiError::Computation(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "COMPUTATION_ERROR", msg)
            }
            ApiError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg)
            }
            ApiError::Other(ref err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                err.to_string(),
            ),
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
