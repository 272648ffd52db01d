//! PDF download, text extraction and section slicing.

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use kseb_core::{PdfTextPort, ResearchError};
use regex::Regex;

use crate::http::{BROWSER_USER_AGENT, parse_http_url, send_checked, transport};

/// Introduction length used when no following section heading is found.
pub const INTRO_FALLBACK_CHARS: usize = 4000;

static INTRO_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(1\s*\.?\s*)?INTRODUCTION").expect("valid regex"));
static INTRO_END: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)2\s*\.?\s*(BACKGROUND|RELATED WORK|PRELIMINARIES)").expect("valid regex")
});
static CONCLUSION_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)CONCLUSION|DISCUSSION").expect("valid regex"));
static CONCLUSION_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)REFERENCES|ACKNOWLEDGEMENTS").expect("valid regex"));

/// Downloads PDFs and extracts their text with `pdf-extract`.
pub struct PdfFetcher {
    client: reqwest::Client,
}

impl PdfFetcher {
    pub fn new() -> Result<Self, ResearchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .user_agent(BROWSER_USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| transport(&e))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PdfTextPort for PdfFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String, ResearchError> {
        let target = parse_http_url(url)?;
        let response = send_checked(self.client.get(target)).await?;
        let bytes = response.bytes().await.map_err(|e| transport(&e))?;
        tracing::debug!(url, size = bytes.len(), "PDF downloaded");

        // pdf-extract is CPU bound and may panic on malformed input
        let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
            .await
            .map_err(|e| ResearchError::Pdf(e.to_string()))?
            .map_err(|e| ResearchError::Pdf(e.to_string()))?;

        Ok(text.replace('\n', " "))
    }
}

/// Slice the introduction and conclusion out of a paper's text.
///
/// Returns `None` when no introduction heading exists.
pub fn extract_intro_and_conclusion(text: &str) -> Option<String> {
    let intro_start = INTRO_START.find(text)?.start();
    let intro_text = &text[intro_start..];
    let introduction = match INTRO_END.find(intro_text) {
        Some(end) => &intro_text[..end.start()],
        None => prefix_chars(intro_text, INTRO_FALLBACK_CHARS),
    };

    let conclusion = CONCLUSION_START.find(text).map_or("", |start| {
        let tail = &text[start.start()..];
        CONCLUSION_END
            .find(tail)
            .map_or(tail, |end| &tail[..end.start()])
    });

    Some(format!(
        "--- INTRODUCTION ---\n{introduction}\n\n--- CONCLUSION ---\n{conclusion}"
    ))
}

fn prefix_chars(text: &str, max_chars: usize) -> &str {
    text.char_indices()
        .nth(max_chars)
        .map_or(text, |(idx, _)| &text[..idx])
}
