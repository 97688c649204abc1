//! Error types and API response structures

use super::codes::ErrorCode;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Error returned by every handler.
///
/// Serialized as an [`ErrorBody`] with the status of its [`ErrorCode`].
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details (field-level errors, context, etc.)
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add a detail entry to this error
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Get the HTTP status code for this error
    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    pub fn invalid_token(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::TokenInvalid, msg)
    }

    pub fn token_expired() -> Self {
        Self::new(ErrorCode::TokenExpired)
    }
}

/// JSON body of an error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: u16,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl From<&AppError> for ErrorBody {
    fn from(err: &AppError) -> Self {
        Self {
            code: err.code.code(),
            message: err.message.clone(),
            details: err.details.clone(),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.http_status();

        if matches!(self.code.category(), super::category::ErrorCategory::System) {
            tracing::error!(code = %self.code, message = %self.message, "System error occurred");
        }

        (status, axum::Json(ErrorBody::from(&self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    #[test]
    fn test_default_message() {
        let err = AppError::new(ErrorCode::ItemNotFound);
        assert_eq!(err.code, ErrorCode::ItemNotFound);
        assert_eq!(err.message, ErrorCode::ItemNotFound.message());
        assert!(err.details.is_none());
    }

    #[test]
    fn test_details_accumulate() {
        let err = AppError::with_message(ErrorCode::InvalidWeightUnit, "Invalid unit: xyz")
            .with_detail("field", "unit")
            .with_detail("line", 3);

        let details = err.details.unwrap();
        assert_eq!(details.get("field").unwrap(), "unit");
        assert_eq!(details.get("line").unwrap(), 3);
        assert_eq!(err.message, "Invalid unit: xyz");
    }

    #[test]
    fn test_status_follows_code() {
        assert_eq!(
            AppError::token_expired().http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::validation("Trip title is required").http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::new(ErrorCode::InternalError).http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_body() {
        let err = AppError::with_message(ErrorCode::TripNotFound, "Trip not found.")
            .with_detail("id", 123);
        let body = ErrorBody::from(&err);
        assert_eq!(body.code, ErrorCode::TripNotFound.code());

        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("\"message\":\"Trip not found.\""));
        assert!(json.contains("\"id\":123"));

        let plain = serde_json::to_string(&ErrorBody::from(&AppError::token_expired())).unwrap();
        assert!(!plain.contains("details"));
    }

    #[test]
    fn test_into_response_status() {
        let resp = AppError::invalid_token("Invalid token").into_response();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
