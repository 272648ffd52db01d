//! Research adapters for the KSEB chatbot server.
//!
//! - [`GoogleSearchClient`]: Google Custom Search ([`kseb_core::WebSearchPort`])
//! - [`JinaReader`], [`HtmlPageReader`]: page text ([`kseb_core::PageReaderPort`])
//! - [`ArxivClient`], [`SemanticScholarClient`]: paper metadata
//! - [`PdfFetcher`]: PDF download and text extraction
//! - [`DeepSearch`] and [`PaperAnalyst`]: the composite research flows

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

mod analyst;
mod arxiv;
mod deep_search;
mod google;
mod http;
mod pdf;
mod reader;
mod semantic_scholar;

pub use analyst::{AnalysisProfile, PAPERS_PER_REPORT, PaperAnalyst};
pub use arxiv::{ARXIV_API_URL, ArxivClient, parse_feed};
pub use deep_search::{DEEP_SEARCH_HITS, DeepSearch, PAGE_CONTENT_CHARS};
pub use google::{GOOGLE_SEARCH_URL, GoogleSearchClient};
pub use pdf::{INTRO_FALLBACK_CHARS, PdfFetcher, extract_intro_and_conclusion};
pub use reader::{
    HtmlPageReader, JINA_READER_URL, JinaReader, PAGE_CHUNK_CHARS, chunk_text, html_to_text,
};
pub use semantic_scholar::{SEMANTIC_SCHOLAR_URL, SemanticScholarClient};

// Silence unused dev-dependency warnings
#[cfg(test)]
use wiremock as _;
#[cfg(test)]
use serde_json as _;
