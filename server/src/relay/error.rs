//! Relay Error Types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Errors that terminate a webhook request early.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Anything other than POST.
    #[error("Method Not Allowed")]
    MethodNotAllowed,

    /// Missing signature header or no secret configured.
    #[error("Unauthorized")]
    Unauthorized,

    /// Signature did not match the body.
    #[error("Signature mismatch")]
    SignatureMismatch,

    /// Body is not valid JSON, or the alert does not have the expected shape.
    #[error("Invalid payload: {0}")]
    Payload(#[from] serde_json::Error),

    /// A field required to build the notification is absent.
    #[error("Missing field: {0}")]
    MissingField(&'static str),
}

/// Error body for method errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        match self {
            Self::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                Json(ErrorResponse {
                    error: self.to_string(),
                }),
            )
                .into_response(),
            Self::Unauthorized | Self::SignatureMismatch => {
                (StatusCode::UNAUTHORIZED, self.to_string()).into_response()
            }
            Self::Payload(_) | Self::MissingField(_) => {
                error!(error = %self, "Error processing webhook");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}

/// Result type for relay operations.
pub type RelayResult<T> = Result<T, RelayError>;
