//! Agent tool port.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::domain::{ChatContext, ToolDefinition};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ToolError {
    /// The model supplied arguments that do not match the schema.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// The tool ran and failed.
    #[error("Tool failed: {0}")]
    Failed(String),
}

impl ToolError {
    /// Deserialize typed arguments, mapping failures to `InvalidArguments`.
    pub fn parse_args<T: serde::de::DeserializeOwned>(args: Value) -> Result<T, Self> {
        serde_json::from_value(args).map_err(|e| Self::InvalidArguments(e.to_string()))
    }
}

/// A capability the agent can invoke.
///
/// Tools always return text for the model; expected failures (bad dates,
/// missing ids, remote errors) are rendered into that text. `Err` is
/// reserved for argument errors and unexpected failures.
#[async_trait]
pub trait Tool: Send + Sync {
    fn definition(&self) -> ToolDefinition;

    async fn call(&self, args: Value, ctx: &ChatContext) -> Result<String, ToolError>;
}
