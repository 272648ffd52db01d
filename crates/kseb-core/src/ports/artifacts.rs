//! Storage for generated documents served through the download route.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ArtifactError {
    /// The name contains a path separator or parent reference.
    #[error("Invalid artifact name: {0}")]
    InvalidName(String),

    #[error("Artifact storage error: {0}")]
    Io(String),
}

/// True when `name` is a plain file name with no path components.
pub fn is_safe_name(name: &str) -> bool {
    !name.is_empty() && !name.contains("..") && !name.contains('/') && !name.contains('\\')
}

#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Store bytes under a fresh unique name with `extension`; returns the name.
    async fn save(&self, extension: &str, bytes: Vec<u8>) -> Result<String, ArtifactError>;

    /// Read an artifact; `Ok(None)` when it does not exist.
    async fn load(&self, name: &str) -> Result<Option<Vec<u8>>, ArtifactError>;
}
