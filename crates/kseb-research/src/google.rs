//! Google Custom Search JSON API.

use std::time::Duration;

use async_trait::async_trait;
use kseb_core::{ResearchError, SearchHit, WebSearchPort};
use serde::Deserialize;

use crate::http::{send_checked, transport};

pub const GOOGLE_SEARCH_URL: &str = "https://www.googleapis.com/customsearch/v1";

/// The API returns at most 10 items per page.
const MAX_RESULTS: usize = 10;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    #[serde(default)]
    title: String,
    link: Option<String>,
    snippet: Option<String>,
}

/// [`WebSearchPort`] backed by a Programmable Search Engine.
pub struct GoogleSearchClient {
    client: reqwest::Client,
    api_key: String,
    cse_id: String,
    endpoint: String,
}

impl GoogleSearchClient {
    pub fn new(api_key: impl Into<String>, cse_id: impl Into<String>) -> Result<Self, ResearchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| transport(&e))?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            cse_id: cse_id.into(),
            endpoint: GOOGLE_SEARCH_URL.to_string(),
        })
    }

    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl WebSearchPort for GoogleSearchClient {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, ResearchError> {
        let num = limit.clamp(1, MAX_RESULTS).to_string();
        let request = self.client.get(&self.endpoint).query(&[
            ("key", self.api_key.as_str()),
            ("cx", self.cse_id.as_str()),
            ("q", query),
            ("num", num.as_str()),
        ]);

        let response = send_checked(request).await?;
        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| ResearchError::Parse(e.to_string()))?;

        tracing::debug!(query, hits = body.items.len(), "Google search finished");
        Ok(body
            .items
            .into_iter()
            .map(|item| SearchHit {
                title: item.title,
                link: item.link,
                snippet: item.snippet,
            })
            .collect())
    }
}
