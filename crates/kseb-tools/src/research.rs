//! Research tools: deep web search, paper analysis and page reading.

use std::sync::Arc;

use async_trait::async_trait;
use kseb_core::{ChatContext, CoreError, PageReaderPort, Tool, ToolDefinition, ToolError};
use kseb_research::{DeepSearch, PAGE_CHUNK_CHARS, PaperAnalyst, chunk_text};
use serde::Deserialize;
use serde_json::{Value, json};

/// A research flow that turns a query into a text report.
#[async_trait]
pub trait Researcher: Send + Sync {
    async fn research(&self, query: &str) -> Result<String, CoreError>;
}

#[async_trait]
impl Researcher for DeepSearch {
    async fn research(&self, query: &str) -> Result<String, CoreError> {
        Ok(self.run(query).await?)
    }
}

#[async_trait]
impl Researcher for PaperAnalyst {
    async fn research(&self, query: &str) -> Result<String, CoreError> {
        self.run(query).await
    }
}

#[derive(Debug, Deserialize)]
struct QueryArgs {
    query: String,
}

/// Exposes a [`Researcher`] to the agent under a fixed name.
pub struct ResearchTool {
    name: &'static str,
    description: &'static str,
    researcher: Arc<dyn Researcher>,
}

impl ResearchTool {
    pub const DEEP_SEARCH: &'static str = "deep_search";
    pub const ARXIV: &'static str = "advanced_arxiv_search";
    pub const SEMANTIC_SCHOLAR: &'static str = "semantic_scholar_search";

    pub fn deep_search(researcher: Arc<dyn Researcher>) -> Self {
        Self {
            name: Self::DEEP_SEARCH,
            description: "A tool for performing deep web searches. It finds relevant URLs with \
                Google Search, scrapes their content using Jina AI Reader, and returns a \
                summarized result. Use this for questions about recent events or specific topics.",
            researcher,
        }
    }

    pub fn arxiv(researcher: Arc<dyn Researcher>) -> Self {
        Self {
            name: Self::ARXIV,
            description: "Use this tool to find and deeply summarize up to 3 academic papers from \
                arXiv, especially for STEM fields like Computer Science and AI. It automatically \
                translates Korean queries to English.",
            researcher,
        }
    }

    pub fn semantic_scholar(researcher: Arc<dyn Researcher>) -> Self {
        Self {
            name: Self::SEMANTIC_SCHOLAR,
            description: "Use this tool to find and summarize up to 3 academic papers from all \
                fields, including social sciences, medicine, and humanities. It automatically \
                generates effective English search queries from Korean.",
            researcher,
        }
    }
}

#[async_trait]
impl Tool for ResearchTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            self.name,
            self.description,
            json!({
                "type": "object",
                "properties": {
                    "query": { "type": "string", "description": "검색할 주제 또는 질문." }
                },
                "required": ["query"]
            }),
        )
    }

    async fn call(&self, args: Value, _ctx: &ChatContext) -> Result<String, ToolError> {
        let args: QueryArgs = ToolError::parse_args(args)?;
        tracing::info!(tool = self.name, query = %args.query, "Research started");
        self.researcher
            .research(&args.query)
            .await
            .map_err(|e| ToolError::Failed(e.to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct UrlArgs {
    url: String,
}

/// Separator placed between page chunks.
const CHUNK_SEPARATOR: &str = "\n\n---\n\n";

/// Returns the full text of a web page, in fixed-size chunks.
pub struct ReadWebPageTool {
    reader: Arc<dyn PageReaderPort>,
}

impl ReadWebPageTool {
    pub const NAME: &'static str = "read_web_page";

    pub fn new(reader: Arc<dyn PageReaderPort>) -> Self {
        Self { reader }
    }
}

#[async_trait]
impl Tool for ReadWebPageTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            Self::NAME,
            "웹페이지 전체 텍스트를 8k chunk로 나누어 반환",
            json!({
                "type": "object",
                "properties": {
                    "url": { "type": "string", "description": "읽을 웹 페이지의 URL (http 또는 https)." }
                },
                "required": ["url"]
            }),
        )
    }

    async fn call(&self, args: Value, _ctx: &ChatContext) -> Result<String, ToolError> {
        let args: UrlArgs = ToolError::parse_args(args)?;
        match self.reader.read(args.url.trim()).await {
            Ok(text) => Ok(chunk_text(&text, PAGE_CHUNK_CHARS).join(CHUNK_SEPARATOR)),
            Err(e) => {
                tracing::warn!(url = %args.url, error = %e, "Page read failed");
                Ok(format!("오류: 웹 페이지를 읽는 중 문제가 발생했습니다: {e}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kseb_core::ResearchError;

    struct StaticPage(Result<String, ResearchError>);

    #[async_trait]
    impl PageReaderPort for StaticPage {
        async fn read(&self, _url: &str) -> Result<String, ResearchError> {
            self.0.clone()
        }
    }

    struct Echo;

    #[async_trait]
    impl Researcher for Echo {
        async fn research(&self, query: &str) -> Result<String, CoreError> {
            if query == "fail" {
                return Err(CoreError::Internal("down".to_string()));
            }
            Ok(format!("report on {query}"))
        }
    }

    fn ctx() -> ChatContext {
        ChatContext::new(1, 2, "token")
    }

    #[tokio::test]
    async fn test_page_is_chunked() {
        let long = "가".repeat(PAGE_CHUNK_CHARS + 10);
        let tool = ReadWebPageTool::new(Arc::new(StaticPage(Ok(long))));
        let out = tool
            .call(json!({"url": "https://example.com"}), &ctx())
            .await
            .unwrap();
        assert_eq!(out.matches(CHUNK_SEPARATOR).count(), 1);
        assert!(out.ends_with(&"가".repeat(10)));
    }

    #[tokio::test]
    async fn test_page_error_is_reported_as_text() {
        let tool = ReadWebPageTool::new(Arc::new(StaticPage(Err(ResearchError::Http {
            status: 404,
            url: "https://example.com".to_string(),
        }))));
        let out = tool
            .call(json!({"url": "https://example.com"}), &ctx())
            .await
            .unwrap();
        assert!(out.starts_with("오류: 웹 페이지를 읽는 중 문제가 발생했습니다: HTTP 404"));
    }

    #[tokio::test]
    async fn test_research_tool() {
        let tool = ResearchTool::arxiv(Arc::new(Echo));
        assert_eq!(tool.definition().name, "advanced_arxiv_search");

        let out = tool.call(json!({"query": "LLM"}), &ctx()).await.unwrap();
        assert_eq!(out, "report on LLM");

        let err = tool.call(json!({"query": "fail"}), &ctx()).await.unwrap_err();
        assert!(matches!(err, ToolError::Failed(_)));

        let err = tool.call(json!({}), &ctx()).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }
}
