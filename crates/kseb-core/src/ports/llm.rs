//! LLM provider port.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{Completion, CompletionRequest};

/// Errors from an LLM provider.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LlmError {
    /// The API key was rejected.
    #[error("LLM provider rejected the API key")]
    Unauthorized,

    /// The provider returned a non-success status.
    #[error("LLM API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Network or timeout error.
    #[error("LLM transport error: {0}")]
    Transport(String),

    /// The reply could not be understood.
    #[error("Invalid LLM response: {0}")]
    InvalidResponse(String),
}

/// A chat-completion capable model.
#[async_trait]
pub trait LlmPort: Send + Sync {
    /// Run one completion.
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, LlmError>;

    /// Convenience wrapper: system + user prompt, text reply.
    async fn ask(&self, system: &str, user: &str, temperature: f32) -> Result<String, LlmError> {
        let request = CompletionRequest::prompt(system, user).with_temperature(temperature);
        let completion = self.complete(request).await?;
        Ok(completion.text().to_string())
    }
}
