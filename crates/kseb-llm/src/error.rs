//! Internal error types for OpenAI API calls.
//!
//! These errors are internal to `kseb-llm` and are mapped to `LlmError`
//! at the port boundary.

use kseb_core::LlmError;
use thiserror::Error;

pub type OpenAiResult<T> = Result<T, OpenAiError>;

#[derive(Debug, Error)]
pub enum OpenAiError {
    /// API request failed with an HTTP error status.
    #[error("OpenAI API request failed with status {status}: {message}")]
    ApiRequestFailed { status: u16, message: String },

    /// API returned an invalid or unexpected response.
    #[error("Invalid response from OpenAI API: {message}")]
    InvalidResponse { message: String },

    /// Network or HTTP client error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl From<OpenAiError> for LlmError {
    fn from(err: OpenAiError) -> Self {
        match err {
            OpenAiError::ApiRequestFailed { status: 401, .. } => Self::Unauthorized,
            OpenAiError::ApiRequestFailed { status, message } => Self::Api { status, message },
            OpenAiError::InvalidResponse { message } => Self::InvalidResponse(message),
            OpenAiError::Network(e) => Self::Transport(e.to_string()),
            OpenAiError::JsonParse(e) => Self::InvalidResponse(e.to_string()),
        }
    }
}
