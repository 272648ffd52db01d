//! Page readers: the Jina reader proxy and a plain HTML reader.

use std::time::Duration;

use async_trait::async_trait;
use kseb_core::{PageReaderPort, ResearchError};
use scraper::{ElementRef, Html};

use crate::http::{BROWSER_USER_AGENT, parse_http_url, send_checked, transport};

pub const JINA_READER_URL: &str = "https://r.jina.ai";

/// Default chunk size for page text handed to the model.
pub const PAGE_CHUNK_CHARS: usize = 8000;

/// Elements whose text is page chrome rather than content.
const SKIPPED_TAGS: [&str; 6] = ["script", "style", "header", "footer", "nav", "aside"];

/// Reads pages through `r.jina.ai`, which returns the main content as text.
pub struct JinaReader {
    client: reqwest::Client,
    base_url: String,
}

impl JinaReader {
    pub fn new() -> Result<Self, ResearchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| transport(&e))?;
        Ok(Self {
            client,
            base_url: JINA_READER_URL.to_string(),
        })
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl PageReaderPort for JinaReader {
    async fn read(&self, url: &str) -> Result<String, ResearchError> {
        let target = parse_http_url(url)?;
        let request = self.client.get(format!("{}/{target}", self.base_url));
        let response = send_checked(request).await?;
        response.text().await.map_err(|e| transport(&e))
    }
}

/// Fetches raw HTML and strips it down to visible text.
pub struct HtmlPageReader {
    client: reqwest::Client,
}

impl HtmlPageReader {
    pub fn new() -> Result<Self, ResearchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(BROWSER_USER_AGENT)
            .build()
            .map_err(|e| transport(&e))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageReaderPort for HtmlPageReader {
    async fn read(&self, url: &str) -> Result<String, ResearchError> {
        let target = parse_http_url(url)?;
        let response = send_checked(self.client.get(target)).await?;
        let html = response.text().await.map_err(|e| transport(&e))?;
        Ok(html_to_text(&html))
    }
}

/// Visible text of an HTML document, one trimmed text node per line.
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut lines = Vec::new();
    collect_text(document.root_element(), &mut lines);
    lines.join("\n")
}

fn collect_text(element: ElementRef<'_>, out: &mut Vec<String>) {
    if SKIPPED_TAGS.contains(&element.value().name()) {
        return;
    }
    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            collect_text(child_element, out);
        } else if let Some(text) = child.value().as_text() {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                out.push(trimmed.to_string());
            }
        }
    }
}

/// Split text into chunks of at most `chunk_chars` characters.
pub fn chunk_text(text: &str, chunk_chars: usize) -> Vec<String> {
    if chunk_chars == 0 {
        return vec![text.to_string()];
    }
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(chunk_chars)
        .map(|chunk| chunk.iter().collect())
        .collect()
}
