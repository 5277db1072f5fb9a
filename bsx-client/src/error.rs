//! Error types for backend calls

use serde_json::Value;
use thiserror::Error;

/// Failure of a single backend call
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection, TLS, timeout or body-streaming failure
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("Server returned HTTP {status}")]
    Status {
        status: u16,
        /// Response body, when it was valid JSON
        body: Option<Value>,
    },

    /// Success status but the body lacked an expected field
    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    /// JSON error body sent by the server, if any
    pub fn body(&self) -> Option<&Value> {
        match self {
            ApiError::Status { body, .. } => body.as_ref(),
            _ => None,
        }
    }

    /// HTTP status code, if the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Network(e) => e.status().map(|s| s.as_u16()),
            ApiError::Decode(_) => None,
        }
    }
}

/// Result type for backend calls
pub type ApiResult<T> = Result<T, ApiError>;
