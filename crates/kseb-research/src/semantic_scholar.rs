//! Semantic Scholar Graph API client.

use std::time::Duration;

use async_trait::async_trait;
use kseb_core::{Paper, PaperSearchPort, ResearchError};
use serde::Deserialize;

use crate::http::{send_checked, transport};

pub const SEMANTIC_SCHOLAR_URL: &str = "https://api.semanticscholar.org/graph/v1";

const FIELDS: &str = "title,abstract,url,year,authors,openAccessPdf";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<PaperDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaperDto {
    title: Option<String>,
    #[serde(rename = "abstract")]
    abstract_text: Option<String>,
    url: Option<String>,
    year: Option<i32>,
    #[serde(default)]
    authors: Vec<AuthorDto>,
    open_access_pdf: Option<OpenAccessPdf>,
}

#[derive(Debug, Deserialize)]
struct AuthorDto {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct OpenAccessPdf {
    url: Option<String>,
}

impl From<PaperDto> for Paper {
    fn from(dto: PaperDto) -> Self {
        Self {
            title: dto.title.unwrap_or_else(|| "N/A".to_string()),
            authors: dto.authors.into_iter().map(|a| a.name).collect(),
            published: dto.year.map(|y| y.to_string()),
            link: dto.url,
            summary: dto.abstract_text,
            pdf_url: dto
                .open_access_pdf
                .and_then(|pdf| pdf.url)
                .filter(|url| !url.is_empty()),
        }
    }
}

/// [`PaperSearchPort`] over Semantic Scholar.
///
/// The public API rate-limits aggressively; failures are logged and reported
/// as an empty result so callers can move on to the next query.
pub struct SemanticScholarClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl SemanticScholarClient {
    pub fn new(api_key: Option<String>) -> Result<Self, ResearchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| transport(&e))?;
        Ok(Self {
            client,
            base_url: SEMANTIC_SCHOLAR_URL.to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        })
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn fetch(&self, query: &str, limit: usize) -> Result<Vec<Paper>, ResearchError> {
        let limit = limit.to_string();
        let mut request = self
            .client
            .get(format!("{}/paper/search", self.base_url))
            .query(&[("query", query), ("limit", limit.as_str()), ("fields", FIELDS)]);
        if let Some(key) = &self.api_key {
            request = request.header("x-api-key", key);
        }

        let response = send_checked(request).await?;
        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| ResearchError::Parse(e.to_string()))?;
        Ok(body.data.into_iter().map(Paper::from).collect())
    }
}

#[async_trait]
impl PaperSearchPort for SemanticScholarClient {
    fn source_name(&self) -> &'static str {
        "Semantic Scholar"
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Paper>, ResearchError> {
        match self.fetch(query, limit).await {
            Ok(papers) => {
                tracing::debug!(query, results = papers.len(), "Semantic Scholar search finished");
                Ok(papers)
            }
            Err(e) => {
                tracing::warn!(query, error = %e, "Semantic Scholar search failed");
                Ok(Vec::new())
            }
        }
    }
}
