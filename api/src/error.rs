//! API errors
//!
//! Every failure leaves the server as `{"error": "..."}` with a non-2xx
//! status.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{error, warn};

use socratic_core::{PromptError, RelayError};

use crate::models::ErrorResponse;

/// Failures reported to API callers
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Bad request body or unknown test type
    #[error("{0}")]
    Validation(String),

    /// Model provider failed
    #[error("{0}")]
    Provider(String),

    /// Anything else
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Provider(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<PromptError> for ApiError {
    fn from(err: PromptError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<RelayError> for ApiError {
    fn from(err: RelayError) -> Self {
        ApiError::Provider(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            ApiError::Validation(msg) => warn!("Rejected request: {}", msg),
            ApiError::Provider(msg) => error!("Provider failure: {}", msg),
            ApiError::Internal(msg) => error!("Internal failure: {}", msg),
        }

        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use socratic_core::ProviderError;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::Validation("x".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Provider("x".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Internal("x".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_unknown_test_type_is_validation() {
        let err: ApiError = PromptError::UnknownTestType("gre".to_string()).into();
        assert!(matches!(err, ApiError::Validation(_)));
        assert_eq!(err.to_string(), "Unknown test type: gre");
    }

    #[test]
    fn test_relay_error_keeps_description() {
        let err: ApiError = RelayError::Provider(ProviderError::Timeout("60s".to_string())).into();
        assert!(matches!(err, ApiError::Provider(_)));
        assert_eq!(err.to_string(), "Request timed out: 60s");
    }
}
