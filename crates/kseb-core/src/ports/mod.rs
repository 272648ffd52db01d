//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the core domain expects from infrastructure.
//! They contain no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - No `reqwest`, `axum` or file-format types in any signature
//! - Every port is object-safe and used as `Arc<dyn Port>`
//! - Each port has its own error enum; `CoreError` unifies them

pub mod artifacts;
pub mod backend;
pub mod llm;
pub mod research;
pub mod tool;

use thiserror::Error;

pub use artifacts::{ArtifactError, ArtifactStore, is_safe_name};
pub use backend::{BackendError, BackendPort};
pub use llm::{LlmError, LlmPort};
pub use research::{
    PageReaderPort, PaperSearchPort, PdfTextPort, ResearchError, SearchHit, WebSearchPort,
};
pub use tool::{Tool, ToolError};

/// Core error type for semantic domain errors.
///
/// This is the canonical error type used across the core domain.
/// Adapters should map this to their own error types (HTTP status codes,
/// CLI exit codes).
#[derive(Debug, Error)]
pub enum CoreError {
    /// LLM provider call failed.
    #[error(transparent)]
    Llm(#[from] LlmError),

    /// Main-server call failed.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// Search, page reading or paper lookup failed.
    #[error(transparent)]
    Research(#[from] ResearchError),

    /// Generated file could not be stored or read.
    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    /// Tool execution failed.
    #[error(transparent)]
    Tool(#[from] ToolError),

    /// Settings validation error.
    #[error(transparent)]
    Settings(#[from] crate::settings::SettingsError),

    /// Validation error (invalid input).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Internal error (unexpected condition).
    #[error("Internal error: {0}")]
    Internal(String),
}
