//! Error types for the rewrite pipeline and the HTTP layer.
//!
//! Component errors ([`ShortenProviderError`], [`RewriteError`], [`RelayError`])
//! describe what went wrong; [`AppError`] decides what the caller sees.

use std::time::Duration;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

/// Generic body returned for every batch failure.
pub const PROCESSING_FAILED: &str = "Failed to process the message";

/// Failure of a single shortening call.
#[derive(Debug, thiserror::Error)]
pub enum ShortenProviderError {
    #[error("provider request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("provider responded with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed provider response: {0}")]
    Malformed(String),

    #[error("provider did not respond within {0:?}")]
    Timeout(Duration),
}

/// Batch-level failure: at least one occurrence could not be shortened.
///
/// Carries the untouched input message so it can be logged; no partially
/// rewritten text ever leaves the rewriter.
#[derive(Debug, thiserror::Error)]
#[error("failed to shorten occurrence #{index} ({url}): {source}")]
pub struct RewriteError {
    pub index: usize,
    pub url: String,
    pub original_message: String,
    pub failed: usize,
    pub total: usize,
    #[source]
    pub source: ShortenProviderError,
}

/// Failure to push a rewritten message back to its channel.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("relay request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("channel {channel_id} rejected update with status {status}")]
    Status { channel_id: String, status: u16 },

    #[error("relay to channel {0} timed out")]
    Timeout(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

/// Errors surfaced to HTTP callers.
#[derive(Debug)]
pub enum AppError {
    Validation { message: String, details: Value },
    Internal { message: String },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            AppError::Validation { message, details } => ErrorBody {
                error: message,
                details: (!details.is_null()).then_some(details),
            },
            AppError::Internal { message } => ErrorBody {
                error: message,
                details: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .keys()
            .map(|k| k.to_string())
            .collect();
        fields.sort();
        let message = if fields.is_empty() {
            "Invalid request".to_string()
        } else {
            format!("Missing or invalid fields: {}", fields.join(", "))
        };

        AppError::bad_request(message, json!({ "fields": fields }))
    }
}

impl From<RewriteError> for AppError {
    fn from(_: RewriteError) -> Self {
        AppError::internal(PROCESSING_FAILED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::bad_request("x", Value::Null).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::internal("x").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_rewrite_error_maps_to_generic_message() {
        let err = RewriteError {
            index: 1,
            url: "http://b.com".to_string(),
            original_message: "a http://b.com".to_string(),
            failed: 1,
            total: 2,
            source: ShortenProviderError::Malformed("missing link".to_string()),
        };

        assert!(err.to_string().contains("http://b.com"));

        match AppError::from(err) {
            AppError::Internal { message } => assert_eq!(message, PROCESSING_FAILED),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
