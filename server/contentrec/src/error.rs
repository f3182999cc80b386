//! Error types for the recommendation service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::{debug, error};

/// Recommendation service error type
#[derive(Error, Debug)]
pub enum RecError {
    /// A required request field was absent or null
    #[error("{0} required")]
    MissingField(&'static str),

    /// A request field was present but could not be coerced
    #[error("{field} must be {expected}")]
    InvalidField {
        /// Name of the offending field
        field: &'static str,
        /// Human-readable description of the accepted values
        expected: &'static str,
    },

    /// Request body was not a JSON object we could read
    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    /// Scoring input did not match the network's dimensionality
    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Expected vector length
        expected: usize,
        /// Actual vector length received
        got: usize,
    },

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Configuration was loaded but failed validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal failure
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for recommendation operations
pub type RecResult<T> = std::result::Result<T, RecError>;

impl RecError {
    pub fn configuration(message: impl Into<String>) -> Self {
        RecError::Configuration(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        RecError::Validation(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        RecError::Internal(message.into())
    }

    /// HTTP status this error maps to
    pub fn status_code(&self) -> StatusCode {
        match self {
            RecError::MissingField(_)
            | RecError::InvalidField { .. }
            | RecError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            RecError::DimensionMismatch { .. }
            | RecError::Configuration(_)
            | RecError::Validation(_)
            | RecError::Io(_)
            | RecError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RecError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        if status.is_server_error() {
            error!(status = status.as_u16(), "{}", message);
        } else {
            debug!(status = status.as_u16(), "{}", message);
        }

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_message() {
        let err = RecError::MissingField("user_id");
        assert_eq!(err.to_string(), "user_id required");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_invalid_field_message() {
        let err = RecError::InvalidField {
            field: "user_id",
            expected: "an integer",
        };
        assert_eq!(err.to_string(), "user_id must be an integer");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_internal_errors_map_to_500() {
        let err = RecError::DimensionMismatch {
            expected: 20,
            got: 19,
        };
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            RecError::internal("boom").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_error_response_body() {
        let response = RecError::MissingField("user_id").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, serde_json::json!({ "error": "user_id required" }));
    }
}
