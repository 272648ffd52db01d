//! Paper analyst pipeline with in-memory ports.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use kseb_core::{
    Completion, CompletionRequest, LlmError, LlmMessage, LlmPort, Paper, PaperSearchPort,
    PdfTextPort, ResearchError,
};
use kseb_research::{AnalysisProfile, PaperAnalyst};

/// Answers keyword requests with fixed lines and every other prompt with a
/// canned summary; records user prompts.
struct ScriptedLlm {
    keywords: String,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedLlm {
    fn new(keywords: &str) -> Arc<Self> {
        Arc::new(Self {
            keywords: keywords.to_string(),
            prompts: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl LlmPort for ScriptedLlm {
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, LlmError> {
        let system = request.messages[0].content_str().to_string();
        let user = request.messages[1].content_str().to_string();
        self.prompts.lock().unwrap().push(user);
        let reply = if system.contains("search keyword phrases") {
            self.keywords.clone()
        } else {
            "한국어 요약".to_string()
        };
        Ok(Completion {
            message: LlmMessage::assistant(reply),
            usage: None,
        })
    }
}

/// Returns the configured papers per query, or an error for `fail` queries.
struct FakeSource {
    papers: Vec<Paper>,
    queries: Mutex<Vec<String>>,
}

#[async_trait]
impl PaperSearchPort for FakeSource {
    fn source_name(&self) -> &'static str {
        "arXiv"
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Paper>, ResearchError> {
        self.queries.lock().unwrap().push(query.to_string());
        if query.contains("fail") {
            return Err(ResearchError::Transport("connection reset".to_string()));
        }
        Ok(self.papers.iter().take(limit).cloned().collect())
    }
}

struct FakePdf;

#[async_trait]
impl PdfTextPort for FakePdf {
    async fn fetch_text(&self, url: &str) -> Result<String, ResearchError> {
        match url {
            u if u.ends_with("good.pdf") => {
                Ok("1 Introduction Deep graphs. 2 Background old. Conclusion It works. References".to_string())
            }
            u if u.ends_with("scanned.pdf") => Err(ResearchError::Pdf("no text layer".to_string())),
            u => Err(ResearchError::Http {
                status: 404,
                url: u.to_string(),
            }),
        }
    }
}

fn paper(title: &str, pdf: Option<&str>) -> Paper {
    Paper {
        title: title.to_string(),
        authors: vec!["Kim".to_string(), "Lee".to_string()],
        published: Some("2024-03-01".to_string()),
        link: Some(format!("http://arxiv.org/abs/{title}")),
        summary: Some(format!("abstract of {title}")),
        pdf_url: pdf.map(str::to_string),
    }
}

fn analyst(
    llm: Arc<ScriptedLlm>,
    source: Arc<FakeSource>,
    profile: AnalysisProfile,
) -> PaperAnalyst {
    PaperAnalyst::new(llm, source, Arc::new(FakePdf), profile)
        .with_pauses(Duration::ZERO, Duration::ZERO)
}

#[tokio::test]
async fn traced_report_covers_each_pdf_outcome() {
    let llm = ScriptedLlm::new("graph learning\ngnn survey\n");
    let source = Arc::new(FakeSource {
        papers: vec![
            paper("good", Some("http://x/good.pdf")),
            paper("scanned", Some("http://x/scanned.pdf")),
            paper("gone", Some("http://x/gone.pdf")),
        ],
        queries: Mutex::new(Vec::new()),
    });

    let report = analyst(llm.clone(), source.clone(), AnalysisProfile::ARXIV)
        .run("그래프 신경망")
        .await
        .unwrap();

    // Three papers from the first query, so the second is never searched.
    assert_eq!(*source.queries.lock().unwrap(), vec!["graph learning"]);

    assert!(report.starts_with("🔍 **'그래프 신경망'에 대한 arXiv 논문 분석을 시작합니다...**\n"));
    assert!(report.contains("🔄 **검색어 생성:** 'graph learning', 'gnn survey'"));
    assert!(report.contains("📄 **총 3개의 관련 논문을 분석합니다.**"));
    assert!(report.contains("### **분석 1: good**"));
    assert!(report.contains("    - ✅ PDF 분석 완료."));
    assert!(report.contains("초록으로 대체합니다."));
    assert!(report.contains("    - ⚠️ **분석 실패:** PDF를 다운로드할 수 없습니다."));
    assert!(report.contains("- **저자**: Kim, Lee"));
    assert!(report.contains("- **게재일**: 2024-03-01"));
    assert!(report.contains("- **링크**: http://arxiv.org/abs/gone"));

    // Keyword prompt plus two summaries; the undownloadable paper is not summarised.
    let prompts = llm.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 3);
    assert!(prompts[1].contains("--- INTRODUCTION ---\n1 Introduction Deep graphs. "));
    assert!(prompts[2].ends_with("abstract of scanned"));
}

#[tokio::test]
async fn failed_searches_are_logged_and_next_query_used() {
    let llm = ScriptedLlm::new("fail here\nworking query");
    let source = Arc::new(FakeSource {
        papers: vec![paper("only", None)],
        queries: Mutex::new(Vec::new()),
    });

    let report = analyst(llm, source.clone(), AnalysisProfile::ARXIV)
        .run("주제")
        .await
        .unwrap();

    assert_eq!(source.queries.lock().unwrap().len(), 2);
    assert!(report.contains("⚠️ **오류:** 'fail here' 검색 중 arXiv 연결에 실패했습니다."));
    assert!(report.contains("📄 **총 1개의 관련 논문을 분석합니다.**"));
}

#[tokio::test]
async fn nothing_found_names_the_source() {
    let llm = ScriptedLlm::new("a\nb\nc");
    let source = Arc::new(FakeSource {
        papers: vec![],
        queries: Mutex::new(Vec::new()),
    });

    let report = analyst(llm, source.clone(), AnalysisProfile::ARXIV)
        .run("없는 주제")
        .await
        .unwrap();

    assert_eq!(source.queries.lock().unwrap().len(), 3);
    assert_eq!(report, "해당 주제에 대한 논문을 arXiv에서 찾을 수 없습니다.");
}

#[tokio::test]
async fn synopsis_profile_falls_back_to_abstract_quietly() {
    let llm = ScriptedLlm::new("remote work");
    let source = Arc::new(FakeSource {
        papers: vec![paper("nopdf", None)],
        queries: Mutex::new(Vec::new()),
    });

    let report = analyst(llm.clone(), source, AnalysisProfile::SEMANTIC_SCHOLAR)
        .run("원격 근무")
        .await
        .unwrap();

    assert!(report.starts_with("🔍 **'원격 근무'에 대한 전체 학술 자료 분석을 시작합니다...**"));
    assert!(!report.contains("PDF 다운로드"));
    assert!(report.contains("한국어 요약"));
    assert!(report.contains("- **게재 연도**: 2024-03-01"));

    let prompts = llm.prompts.lock().unwrap();
    assert_eq!(
        prompts[1],
        "Please summarize the following content from the paper titled 'nopdf':\n\nabstract of nopdf"
    );
}

#[tokio::test]
async fn empty_keyword_reply_uses_original_query() {
    let llm = ScriptedLlm::new("  \n");
    let source = Arc::new(FakeSource {
        papers: vec![],
        queries: Mutex::new(Vec::new()),
    });

    analyst(llm, source.clone(), AnalysisProfile::ARXIV)
        .run(" 양자 컴퓨팅 ")
        .await
        .unwrap();

    assert_eq!(*source.queries.lock().unwrap(), vec!["양자 컴퓨팅"]);
}
