use kseb_core::LlmError;
use thiserror::Error;

/// Errors that end an agent run without an answer.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AgentError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    /// The model kept requesting tools past the configured limit.
    #[error("Agent stopped after {0} iterations without a final answer")]
    IterationLimit(u32),
}
