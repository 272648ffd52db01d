//! Research ports: web search, page reading, paper search, PDF text.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::Paper;

/// Errors from research services.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResearchError {
    #[error("HTTP {status} from {url}")]
    Http { status: u16, url: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("PDF text extraction failed: {0}")]
    Pdf(String),
}

/// One web search result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub link: Option<String>,
    pub snippet: Option<String>,
}

#[async_trait]
pub trait WebSearchPort: Send + Sync {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, ResearchError>;
}

/// Fetches a URL and returns readable text.
#[async_trait]
pub trait PageReaderPort: Send + Sync {
    async fn read(&self, url: &str) -> Result<String, ResearchError>;
}

#[async_trait]
pub trait PaperSearchPort: Send + Sync {
    /// Display name of the source, e.g. `arXiv`.
    fn source_name(&self) -> &'static str;

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Paper>, ResearchError>;
}

/// Downloads a PDF and returns its plain text.
#[async_trait]
pub trait PdfTextPort: Send + Sync {
    async fn fetch_text(&self, url: &str) -> Result<String, ResearchError>;
}
