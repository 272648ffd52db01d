//! Paper search and review pipeline.
//!
//! A Korean question is turned into English keyword queries, the paper
//! source is searched until three candidates are found, and each candidate
//! is summarised from its introduction and conclusion (or its abstract).

use std::sync::Arc;
use std::time::Duration;

use kseb_core::{CoreError, LlmPort, Paper, PaperSearchPort, PdfTextPort, ResearchError};

use crate::pdf::extract_intro_and_conclusion;

/// Papers analysed per request.
pub const PAPERS_PER_REPORT: usize = 3;

const QUERY_SYSTEM_PROMPT: &str = "You are an expert academic researcher. Your task is to \
analyze the following Korean user query and generate up to 3 diverse and effective English \
search keyword phrases for an academic database. Provide only the keyword phrases, each on a \
new line, without any numbering or extra text.";

const REVIEW_SYSTEM_PROMPT: &str = "You are a professional academic reviewer. Your task is to \
analyze the provided text (Introduction and Conclusion of a paper) and write a detailed \
analysis report in Korean, structured with the following sections:\n\n\
**1. 문제 제기 (Problem Statement):** 이 연구가 해결하고자 하는 핵심 문제는 무엇인가?\n\
**2. 제안 방법론 (Proposed Method):** 이 문제를 해결하기 위해 어떤 독창적인 방법이나 접근법을 제안하는가?\n\
**3. 핵심 결과 및 의의 (Key Results & Significance):** 연구를 통해 무엇을 발견했으며, 이 결과가 \
해당 분야에 어떤 중요한 기여를 하는가? (예: 성능 향상, 새로운 가능성 제시 등)\n\
**4. 예상 활용 분야 (Potential Applications):** 이 연구 결과가 실제로 어디에 응용될 수 있는가?";

const SYNOPSIS_SYSTEM_PROMPT: &str = "You are an expert research paper analyst. Your task is to \
synthesize the provided Introduction and Conclusion of an academic paper into a comprehensive \
yet easy-to-understand summary in Korean. Focus on the paper's core problem, methodology, key \
findings, and implications.";

/// How a source's results are presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisProfile {
    /// What is being analysed, as shown in the report header.
    pub scope: &'static str,
    pub date_label: &'static str,
    system_prompt: &'static str,
    user_verb: &'static str,
    /// Show per-paper download/extraction progress lines.
    pub trace_steps: bool,
    /// Pause before the first search.
    pub warmup: Duration,
}

impl AnalysisProfile {
    /// Structured four-part review with progress lines.
    pub const ARXIV: Self = Self {
        scope: "arXiv 논문",
        date_label: "게재일",
        system_prompt: REVIEW_SYSTEM_PROMPT,
        user_verb: "analyze",
        trace_steps: true,
        warmup: Duration::ZERO,
    };

    /// Free-form synopsis; the API needs a short warm-up delay.
    pub const SEMANTIC_SCHOLAR: Self = Self {
        scope: "전체 학술 자료",
        date_label: "게재 연도",
        system_prompt: SYNOPSIS_SYSTEM_PROMPT,
        user_verb: "summarize",
        trace_steps: false,
        warmup: Duration::from_secs(1),
    };
}

/// Searches one paper source and writes a Korean review report.
pub struct PaperAnalyst {
    llm: Arc<dyn LlmPort>,
    source: Arc<dyn PaperSearchPort>,
    pdf: Arc<dyn PdfTextPort>,
    profile: AnalysisProfile,
    search_pause: Duration,
}

impl PaperAnalyst {
    pub fn new(
        llm: Arc<dyn LlmPort>,
        source: Arc<dyn PaperSearchPort>,
        pdf: Arc<dyn PdfTextPort>,
        profile: AnalysisProfile,
    ) -> Self {
        Self {
            llm,
            source,
            pdf,
            profile,
            search_pause: Duration::from_secs(2),
        }
    }

    /// Override the pauses between searches (tests use zero).
    #[must_use]
    pub const fn with_pauses(mut self, warmup: Duration, between_searches: Duration) -> Self {
        self.profile.warmup = warmup;
        self.search_pause = between_searches;
        self
    }

    pub fn source_name(&self) -> &'static str {
        self.source.source_name()
    }

    /// Run the whole pipeline and return a markdown report.
    pub async fn run(&self, query: &str) -> Result<String, CoreError> {
        let source = self.source.source_name();
        let mut log = vec![format!(
            "🔍 **'{query}'에 대한 {} 분석을 시작합니다...**\n",
            self.profile.scope
        )];

        let queries = self.keyword_queries(query).await?;
        log.push(format!(
            "🔄 **검색어 생성:** {}",
            queries
                .iter()
                .map(|q| format!("'{q}'"))
                .collect::<Vec<_>>()
                .join(", ")
        ));

        let papers = self.collect_papers(&queries, &mut log).await;
        if papers.is_empty() {
            return Ok(format!("해당 주제에 대한 논문을 {source}에서 찾을 수 없습니다."));
        }

        log.push(format!("\n📄 **총 {}개의 관련 논문을 분석합니다.**\n", papers.len()));

        for (i, paper) in papers.iter().enumerate() {
            log.push(format!("--- \n### **분석 {}: {}**", i + 1, paper.title));
            log.push(self.analyze(paper).await);
            log.push(format!("\n- **저자**: {}", paper.author_line()));
            log.push(format!(
                "- **{}**: {}",
                self.profile.date_label,
                paper.published.as_deref().unwrap_or("N/A")
            ));
            log.push(format!("- **링크**: {}\n", paper.link.as_deref().unwrap_or("N/A")));
        }

        tracing::info!(source, query, papers = papers.len(), "Paper analysis finished");
        Ok(log.join("\n"))
    }

    async fn keyword_queries(&self, query: &str) -> Result<Vec<String>, CoreError> {
        let reply = self.llm.ask(QUERY_SYSTEM_PROMPT, query, 0.0).await?;
        let mut queries: Vec<String> = reply
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        if queries.is_empty() {
            queries.push(query.trim().to_string());
        }
        tracing::debug!(?queries, "Generated keyword queries");
        Ok(queries)
    }

    async fn collect_papers(&self, queries: &[String], log: &mut Vec<String>) -> Vec<Paper> {
        if !self.profile.warmup.is_zero() {
            tokio::time::sleep(self.profile.warmup).await;
        }

        let mut papers = Vec::new();
        for (i, keywords) in queries.iter().enumerate() {
            if i > 0 && !self.search_pause.is_zero() {
                tokio::time::sleep(self.search_pause).await;
            }
            match self.source.search(keywords, PAPERS_PER_REPORT).await {
                Ok(found) => papers.extend(found),
                Err(e) => {
                    tracing::warn!(
                        source = self.source.source_name(),
                        keywords = %keywords,
                        error = %e,
                        "Paper search failed"
                    );
                    log.push(format!(
                        "\n- ⚠️ **오류:** '{keywords}' 검색 중 {} 연결에 실패했습니다.",
                        self.source.source_name()
                    ));
                }
            }
            if papers.len() >= PAPERS_PER_REPORT {
                break;
            }
        }
        papers.truncate(PAPERS_PER_REPORT);
        papers
    }

    async fn analyze(&self, paper: &Paper) -> String {
        if self.profile.trace_steps {
            self.analyze_traced(paper).await
        } else {
            let text = match self.full_text_sections(paper).await {
                Ok(Some(sections)) => sections,
                _ => paper.summary.clone().unwrap_or_default(),
            };
            self.summarize(&text, &paper.title).await
        }
    }

    async fn analyze_traced(&self, paper: &Paper) -> String {
        let mut steps = vec!["    - 📥 PDF 다운로드 시도...".to_string()];

        let text = match self.full_text_sections(paper).await {
            Err(ResearchError::Pdf(_)) | Ok(None) => {
                steps.push("    - 📑 PDF 텍스트 추출 및 분석 시도...".to_string());
                steps.push(
                    "    - ⚠️ **분석 실패:** PDF 구조가 복잡하여 서론/결론을 추출할 수 없습니다. 초록으로 대체합니다."
                        .to_string(),
                );
                paper.summary.clone().unwrap_or_default()
            }
            Err(_) => {
                steps.push("    - ⚠️ **분석 실패:** PDF를 다운로드할 수 없습니다.".to_string());
                return steps.join("\n");
            }
            Ok(Some(sections)) => {
                steps.push("    - 📑 PDF 텍스트 추출 및 분석 시도...".to_string());
                steps.push("    - ✅ PDF 분석 완료.".to_string());
                sections
            }
        };

        steps.push("    - ✍️ 한국어 요약 생성 시도...".to_string());
        let summary = self.summarize(&text, &paper.title).await;
        steps.push("    - ✅ 요약 생성 완료.".to_string());
        steps.push(format!("\n{summary}"));
        steps.join("\n")
    }

    /// Introduction and conclusion from the paper's PDF. `Ok(None)` when the
    /// text has no recognisable introduction.
    async fn full_text_sections(&self, paper: &Paper) -> Result<Option<String>, ResearchError> {
        let url = paper
            .pdf_url
            .as_deref()
            .ok_or_else(|| ResearchError::Parse("no PDF link".to_string()))?;
        let text = self.pdf.fetch_text(url).await.inspect_err(|e| {
            tracing::debug!(url, error = %e, "PDF unavailable");
        })?;
        Ok(extract_intro_and_conclusion(&text))
    }

    async fn summarize(&self, text: &str, title: &str) -> String {
        let user = format!(
            "Please {} the following content from the paper titled '{title}':\n\n{text}",
            self.profile.user_verb
        );
        match self.llm.ask(self.profile.system_prompt, &user, 0.0).await {
            Ok(summary) if !summary.trim().is_empty() => summary,
            Ok(_) => "요약 생성에 실패했습니다.".to_string(),
            Err(e) => {
                tracing::warn!(title, error = %e, "Paper summary failed");
                "요약 생성에 실패했습니다.".to_string()
            }
        }
    }
}
