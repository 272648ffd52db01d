//! Search-then-read web research.

use std::sync::Arc;

use kseb_core::{PageReaderPort, ResearchError, WebSearchPort};

/// Number of search hits that are read in full.
pub const DEEP_SEARCH_HITS: usize = 3;

/// Per-page content budget, in characters.
pub const PAGE_CONTENT_CHARS: usize = 5000;

/// Finds pages with a web search and reads each of them.
pub struct DeepSearch {
    search: Arc<dyn WebSearchPort>,
    reader: Arc<dyn PageReaderPort>,
}

impl DeepSearch {
    pub fn new(search: Arc<dyn WebSearchPort>, reader: Arc<dyn PageReaderPort>) -> Self {
        Self { search, reader }
    }

    /// Read the top hits for `query` and return their content as one text.
    ///
    /// Only the search itself can fail; unreadable pages are reported inline.
    pub async fn run(&self, query: &str) -> Result<String, ResearchError> {
        let hits = self.search.search(query, DEEP_SEARCH_HITS).await?;
        if hits.is_empty() {
            return Ok("No search results found.".to_string());
        }

        let urls: Vec<String> = hits.into_iter().filter_map(|hit| hit.link).collect();
        if urls.is_empty() {
            return Ok("No valid URLs found in search results.".to_string());
        }

        let mut blocks = Vec::with_capacity(urls.len());
        for url in &urls {
            let content = match self.reader.read(url).await {
                Ok(text) => truncate(text),
                Err(e) => {
                    tracing::warn!(url = %url, error = %e, "Page read failed");
                    format!("Error fetching {url}: {e}")
                }
            };
            blocks.push(format!("--- Content from {url} ---\n{content}"));
        }

        tracing::info!(query, pages = blocks.len(), "Deep search finished");
        Ok(blocks.join("\n\n"))
    }
}

fn truncate(text: String) -> String {
    match text.char_indices().nth(PAGE_CONTENT_CHARS) {
        Some((idx, _)) => format!("{}... (truncated)", &text[..idx]),
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use kseb_core::SearchHit;

    struct FixedSearch(Vec<SearchHit>);

    #[async_trait]
    impl WebSearchPort for FixedSearch {
        async fn search(&self, _query: &str, limit: usize) -> Result<Vec<SearchHit>, ResearchError> {
            assert_eq!(limit, DEEP_SEARCH_HITS);
            Ok(self.0.clone())
        }
    }

    struct EchoReader;

    #[async_trait]
    impl PageReaderPort for EchoReader {
        async fn read(&self, url: &str) -> Result<String, ResearchError> {
            if url.contains("broken") {
                return Err(ResearchError::Http {
                    status: 500,
                    url: url.to_string(),
                });
            }
            if url.contains("long") {
                return Ok("x".repeat(PAGE_CONTENT_CHARS + 10));
            }
            Ok(format!("body of {url}"))
        }
    }

    fn hit(link: Option<&str>) -> SearchHit {
        SearchHit {
            title: "t".to_string(),
            link: link.map(str::to_string),
            snippet: None,
        }
    }

    fn deep(hits: Vec<SearchHit>) -> DeepSearch {
        DeepSearch::new(Arc::new(FixedSearch(hits)), Arc::new(EchoReader))
    }

    #[tokio::test]
    async fn test_no_hits() {
        let out = deep(vec![]).run("q").await.unwrap();
        assert_eq!(out, "No search results found.");
    }

    #[tokio::test]
    async fn test_hits_without_links() {
        let out = deep(vec![hit(None)]).run("q").await.unwrap();
        assert_eq!(out, "No valid URLs found in search results.");
    }

    #[tokio::test]
    async fn test_blocks_and_errors() {
        let out = deep(vec![hit(Some("https://a.com")), hit(Some("https://broken.com"))])
            .run("q")
            .await
            .unwrap();
        assert_eq!(
            out,
            "--- Content from https://a.com ---\nbody of https://a.com\n\n\
             --- Content from https://broken.com ---\n\
             Error fetching https://broken.com: HTTP 500 from https://broken.com"
        );
    }

    #[tokio::test]
    async fn test_long_content_is_truncated() {
        let out = deep(vec![hit(Some("https://long.com"))]).run("q").await.unwrap();
        let expected = format!(
            "--- Content from https://long.com ---\n{}... (truncated)",
            "x".repeat(PAGE_CONTENT_CHARS)
        );
        assert_eq!(out, expected);
    }
}
