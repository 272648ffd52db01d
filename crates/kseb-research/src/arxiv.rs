//! arXiv export API client (Atom feed).

use std::time::Duration;

use async_trait::async_trait;
use kseb_core::{Paper, PaperSearchPort, ResearchError};
use serde::Deserialize;

use crate::http::{send_checked, transport};

pub const ARXIV_API_URL: &str = "https://export.arxiv.org/api/query";

#[derive(Debug, Deserialize)]
struct Feed {
    #[serde(rename = "entry", default)]
    entries: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
struct Entry {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    published: Option<String>,
    #[serde(rename = "author", default)]
    authors: Vec<Author>,
    #[serde(rename = "link", default)]
    links: Vec<Link>,
}

#[derive(Debug, Deserialize)]
struct Author {
    name: String,
}

#[derive(Debug, Deserialize)]
struct Link {
    #[serde(rename = "@href")]
    href: String,
    #[serde(rename = "@title", default)]
    title: Option<String>,
}

impl From<Entry> for Paper {
    fn from(entry: Entry) -> Self {
        let pdf_url = entry
            .links
            .iter()
            .find(|link| link.title.as_deref() == Some("pdf"))
            .map(|link| link.href.clone());

        Self {
            title: squash_whitespace(&entry.title),
            authors: entry.authors.into_iter().map(|a| a.name).collect(),
            published: entry
                .published
                .map(|p| p.get(..10).unwrap_or(&p).to_string()),
            link: Some(entry.id),
            summary: entry.summary.map(|s| squash_whitespace(&s)),
            pdf_url,
        }
    }
}

/// Feed titles and abstracts are hard-wrapped.
fn squash_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parse an arXiv Atom response into papers.
pub fn parse_feed(xml: &str) -> Result<Vec<Paper>, ResearchError> {
    let feed: Feed =
        quick_xml::de::from_str(xml).map_err(|e| ResearchError::Parse(e.to_string()))?;
    Ok(feed.entries.into_iter().map(Paper::from).collect())
}

/// [`PaperSearchPort`] over arXiv, sorted by relevance.
pub struct ArxivClient {
    client: reqwest::Client,
    endpoint: String,
}

impl ArxivClient {
    pub fn new() -> Result<Self, ResearchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| transport(&e))?;
        Ok(Self {
            client,
            endpoint: ARXIV_API_URL.to_string(),
        })
    }

    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl PaperSearchPort for ArxivClient {
    fn source_name(&self) -> &'static str {
        "arXiv"
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Paper>, ResearchError> {
        let request = self.client.get(&self.endpoint).query(&[
            ("search_query", format!("all:{query}")),
            ("start", "0".to_string()),
            ("max_results", limit.to_string()),
            ("sortBy", "relevance".to_string()),
            ("sortOrder", "descending".to_string()),
        ]);

        let response = send_checked(request).await?;
        let xml = response.text().await.map_err(|e| transport(&e))?;
        let papers = parse_feed(&xml)?;
        tracing::debug!(query, results = papers.len(), "arXiv search finished");
        Ok(papers)
    }
}
