//! Error types for the LLM layer

use thiserror::Error;

/// Errors that can occur when calling an inference backend
#[derive(Debug, Error)]
pub enum LlmError {
    /// Missing or rejected credentials
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// HTTP request failures
    #[error("HTTP error (status {status}): {body}")]
    HttpError { status: u16, body: String },

    /// SSE stream parsing failures
    #[error("Stream error: {0}")]
    StreamError(String),

    /// JSON encoding/decoding issues
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Backend returned a well-formed error payload
    #[error("Provider error ({code}): {message}")]
    ProviderError { code: String, message: String },
}

impl From<serde_json::Error> for LlmError {
    fn from(err: serde_json::Error) -> Self {
        LlmError::SerializationError(err.to_string())
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            LlmError::HttpError {
                status: status.as_u16(),
                body: err.to_string(),
            }
        } else {
            LlmError::HttpError {
                status: 0,
                body: err.to_string(),
            }
        }
    }
}
