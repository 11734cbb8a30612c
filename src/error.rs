//! Error types for triage-api

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Common result type for triage-api operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised below the API boundary
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Model artifacts failed to load at startup; every prediction fails
    /// until the process restarts with valid artifacts.
    #[error("Model or preprocessor not loaded")]
    ModelUnavailable,

    /// Model artifact or inference error
    #[error("Model error: {0}")]
    Model(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// API error type, translated to a JSON `{"error": ...}` body.
///
/// All `/predict` failures surface here; none propagate as unhandled
/// crash responses.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Model artifacts not loaded (503)
    #[error("Model or preprocessor not loaded")]
    ModelUnavailable,

    /// Invalid request body (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Prediction or persistence failure (500)
    #[error("An error occurred during prediction: {0}")]
    Prediction(String),

    /// Queue retrieval failure (500); the message already names the cause
    #[error("{0}")]
    Database(String),
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::ModelUnavailable => ApiError::ModelUnavailable,
            Error::Database(e) => ApiError::Prediction(e.to_string()),
            other => ApiError::Prediction(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::ModelUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Prediction(_) | ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_unavailable_maps_to_503() {
        let response = ApiError::ModelUnavailable.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_prediction_error_message_shape() {
        let err = ApiError::Prediction("boom".to_string());
        assert_eq!(err.to_string(), "An error occurred during prediction: boom");
    }

    #[test]
    fn test_crate_error_converts_to_api_error() {
        let api: ApiError = Error::ModelUnavailable.into();
        assert!(matches!(api, ApiError::ModelUnavailable));
    }
}
