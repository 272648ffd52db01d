//! Word report drafts.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Local;
use kseb_core::{
    ArtifactStore, ChatContext, CompletionRequest, LlmPort, ReportContext, Tool, ToolDefinition,
    ToolError,
};
use kseb_docs::build_report_docx;
use kseb_llm::parse_json_reply;
use serde::Deserialize;
use serde_json::{Value, json};
use thiserror::Error;

use crate::gather::Gatherer;
use crate::output::DownloadLinks;

/// Instructions for the hierarchical report outline.
pub const REPORT_SYSTEM_PROMPT: &str = r#"당신은 최고의 컨설턴트이자 전문 작가입니다. 당신의 임무는 주어진 주제와 원시 데이터를 바탕으로, '계층적인' 구조의 완벽한 문서 초안과 가이드라인을 'JSON' 형식으로 생성하는 것입니다.

**문서 생성 규칙:**
1.  **계층 구조:** 문서는 '서론-본론-결론'과 같은 `main_sections`으로 구성됩니다. '본론'은 반드시 여러 개의 `sub_sections`으로 나누어 깊이를 더해야 합니다.
2.  **콘텐츠와 가이드 분리:** 각 `sub_section`마다, `content`(초안)와 `guideline`(발전 방향 가이드)을 반드시 분리하여 작성합니다.
3.  **구조화된 표(Table):** 데이터 요약이 필요하면, `table` 객체에 `headers`와 `rows`를 포함하여 구조화된 데이터를 제공합니다.
4.  **참고문헌:** 마지막 `main_section`은 반드시 '참고문헌'이어야 하며, `content`에 APA 양식의 리스트를 포함합니다.
5.  **JSON 출력:** 다른 설명 없이, 최종 결과물은 반드시 아래 명시된 JSON 형식이어야 합니다.

**출력 JSON 형식:**
{
  "report_title": "...",
  "main_sections": [
    {"title": "I. 서론", "content": "...", "guideline": "..."},
    {
      "title": "II. 본론",
      "sub_sections": [
        {
          "title": "1. 소주제 1", "content": "...", "guideline": "...",
          "table": {"headers": [...], "rows": [[...]]}
        },
        {"title": "2. 소주제 2", "content": "...", "guideline": "..."}
      ]
    },
    {"title": "III. 결론", "content": "...", "guideline": "..."},
    {"title": "IV. 참고문헌", "content": "1. Author (Year)...\n2. ..."}
  ]
}"#;

const REPORT_TEMPERATURE: f32 = 0.3;

#[derive(Debug, Error)]
enum ReportError {
    #[error("AI가 문서 구조를 생성하는 데 실패했습니다.")]
    Outline,

    #[error("Word 문서 파일 생성에 실패했습니다.")]
    Build,
}

#[derive(Debug, Deserialize)]
struct TopicArgs {
    topic: String,
}

/// Researches a topic and writes a structured `.docx` draft.
pub struct GenerateReportTool {
    gatherer: Arc<Gatherer>,
    llm: Arc<dyn LlmPort>,
    store: Arc<dyn ArtifactStore>,
    links: DownloadLinks,
}

impl GenerateReportTool {
    pub const NAME: &'static str = "generate_report";

    pub fn new(
        gatherer: Arc<Gatherer>,
        llm: Arc<dyn LlmPort>,
        store: Arc<dyn ArtifactStore>,
        links: DownloadLinks,
    ) -> Self {
        Self {
            gatherer,
            llm,
            store,
            links,
        }
    }

    async fn outline(&self, topic: &str, material: &str) -> Result<ReportContext, ReportError> {
        let request = CompletionRequest::prompt(
            REPORT_SYSTEM_PROMPT,
            format!("주제: {topic}\n\n[원시 데이터]:\n{material}"),
        )
        .with_temperature(REPORT_TEMPERATURE);

        let completion = self.llm.complete(request).await.map_err(|e| {
            tracing::error!(error = %e, "Report outline request failed");
            ReportError::Outline
        })?;

        parse_json_reply(completion.text()).map_err(|e| {
            tracing::error!(error = %e, reply = completion.text(), "Report outline is not valid JSON");
            ReportError::Outline
        })
    }

    async fn write(&self, context: &ReportContext) -> Result<String, ReportError> {
        let bytes = build_report_docx(context, Local::now().date_naive()).map_err(|e| {
            tracing::error!(error = %e, "Report build failed");
            ReportError::Build
        })?;
        self.store.save("docx", bytes).await.map_err(|e| {
            tracing::error!(error = %e, "Report could not be stored");
            ReportError::Build
        })
    }

    async fn generate(&self, topic: &str, ctx: &ChatContext) -> Result<String, ReportError> {
        let material = self.gatherer.report_material(topic, ctx).await;
        let context = self.outline(topic, &material).await?;
        let filename = self.write(&context).await?;

        let title = if context.report_title.trim().is_empty() {
            topic
        } else {
            context.report_title.as_str()
        };
        tracing::info!(filename = %filename, sections = context.main_sections.len(), "Report generated");
        Ok(format!(
            "'{title}' 문서 초안이 완성되었습니다.\n[여기에서 다운로드]({})하여 내용을 확인하고 수정하세요.",
            self.links.url(&filename)
        ))
    }
}

#[async_trait]
impl Tool for GenerateReportTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            Self::NAME,
            "사용자 요청(topic)을 분석하여 계층 구조의 목차, 초안, 가이드, 표, 참고문헌을 갖춘 Word(.docx) 보고서 초안을 생성하고 다운로드 링크를 반환합니다.",
            json!({
                "type": "object",
                "properties": {
                    "topic": { "type": "string", "description": "보고서의 주제." }
                },
                "required": ["topic"]
            }),
        )
    }

    async fn call(&self, args: Value, ctx: &ChatContext) -> Result<String, ToolError> {
        let args: TopicArgs = ToolError::parse_args(args)?;
        tracing::info!(user_id = ctx.user_id, topic = %args.topic, "Report generation started");
        Ok(self
            .generate(&args.topic, ctx)
            .await
            .unwrap_or_else(|e| e.to_string()))
    }
}
