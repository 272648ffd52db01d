//! Summary, report and presentation tools with scripted model replies.

mod common;

use std::io::Cursor;
use std::sync::Arc;

use common::{FakeBackend, FixedResearch, ScriptedLlm, ctx, message};
use kseb_core::{BackendError, MessageRole, Tool};
use kseb_docs::FsArtifactStore;
use kseb_tools::{
    DownloadLinks, Gatherer, GeneratePptTool, GenerateReportTool, SummarizeChannelTool,
};
use serde_json::json;
use zip::ZipArchive;

const LINK_PREFIX: &str = "http://bot.test/api/v1/download/";

fn chat_backend() -> Arc<FakeBackend> {
    Arc::new(FakeBackend::with_messages(vec![
        message(9, "민수", "발표 주제 정하자"),
        message(10, "지현", "AI 협업 도구 어때?"),
    ]))
}

// ============================================================================
// summarize_channel_conversations
// ============================================================================

#[tokio::test]
async fn summary_of_whole_channel() {
    let llm = Arc::new(ScriptedLlm::new(["### 회의 요약\n**주제:** 발표"]));
    let tool = SummarizeChannelTool::new(chat_backend(), llm.clone());

    let out = tool.call(json!({}), &ctx()).await.unwrap();
    assert_eq!(out, "### 회의 요약\n**주제:** 발표");

    let requests = llm.requests();
    assert_eq!(requests.len(), 1);
    let user = requests[0].messages[1].content_str();
    assert!(user.starts_with("다음 대화 내용을 위 포맷에 맞춰 요약해줘:\n"));
    assert!(user.contains("[2025-08-01 09:00] 민수: 발표 주제 정하자"));
    assert!(requests[0].messages[0].content_str().contains("### 회의 요약"));
}

#[tokio::test]
async fn summary_with_time_filter() {
    let llm = Arc::new(ScriptedLlm::new([
        "[2025-08-01 10:00] 지현: AI 협업 도구 어때?",
        "요약본",
    ]));
    let tool = SummarizeChannelTool::new(chat_backend(), llm.clone());

    let out = tool
        .call(json!({"time_query": "오전 10시"}), &ctx())
        .await
        .unwrap();
    assert_eq!(out, "요약본");

    let requests = llm.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests[0].messages[0].content_str().contains("오늘은 "));
    assert!(requests[0].messages[1]
        .content_str()
        .starts_with("시간 조건: 오전 10시\n\n전체 대화:\n---\n"));
    let summary_input = requests[1].messages[1].content_str();
    assert!(summary_input.contains("지현: AI 협업 도구 어때?"));
    assert!(!summary_input.contains("민수"));
}

#[tokio::test]
async fn summary_time_filter_without_match() {
    let llm = Arc::new(ScriptedLlm::new(["No Match"]));
    let tool = SummarizeChannelTool::new(chat_backend(), llm.clone());

    let out = tool
        .call(json!({"time_query": "어제"}), &ctx())
        .await
        .unwrap();
    assert_eq!(out, "'어제'에 해당하는 대화를 찾지 못했습니다.");
    assert_eq!(llm.requests().len(), 1);
}

#[tokio::test]
async fn summary_of_empty_or_unreachable_channel() {
    let llm = Arc::new(ScriptedLlm::default());
    let tool = SummarizeChannelTool::new(Arc::new(FakeBackend::default()), llm.clone());
    let out = tool.call(json!({"time_query": "all"}), &ctx()).await.unwrap();
    assert_eq!(out, "요약할 대화 내용이 없습니다.");

    let backend = FakeBackend {
        messages: Err(BackendError::Status {
            status: 403,
            body: r#"{"message":"채널 접근 권한이 없습니다."}"#.to_string(),
        }),
        ..FakeBackend::default()
    };
    let tool = SummarizeChannelTool::new(Arc::new(backend), llm.clone());
    let out = tool.call(json!({}), &ctx()).await.unwrap();
    assert_eq!(out, "대화 내용을 가져오는 데 실패했습니다: 채널 접근 권한이 없습니다.");

    assert!(llm.requests().is_empty());
}

// ============================================================================
// generate_report
// ============================================================================

const REPORT_REPLY: &str = r#"```json
{
  "report_title": "AI 협업 도구 동향",
  "main_sections": [
    {"title": "I. 서론", "content": "배경", "guideline": "통계 보강"},
    {"title": "II. 참고문헌", "content": "1. Kim (2024)"}
  ]
}
```"#;

struct Fixture {
    web: Arc<FixedResearch>,
    papers: Arc<FixedResearch>,
    gatherer: Arc<Gatherer>,
    store: Arc<FsArtifactStore>,
    _dir: tempfile::TempDir,
}

fn fixture(web: FixedResearch, papers: FixedResearch) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let web = Arc::new(web);
    let papers = Arc::new(papers);
    let gatherer = Arc::new(Gatherer::new(chat_backend(), web.clone(), papers.clone()));
    Fixture {
        web,
        papers,
        gatherer,
        store: Arc::new(FsArtifactStore::new(dir.path())),
        _dir: dir,
    }
}

fn filename_from(out: &str) -> String {
    let start = out.find(LINK_PREFIX).unwrap() + LINK_PREFIX.len();
    let end = out[start..].find(')').unwrap() + start;
    out[start..end].to_string()
}

#[tokio::test]
async fn report_is_written_and_linked() {
    let fx = fixture(
        FixedResearch::ok("웹 결과"),
        FixedResearch::failing("down"),
    );
    let llm = Arc::new(ScriptedLlm::new([REPORT_REPLY]));
    let tool = GenerateReportTool::new(
        fx.gatherer.clone(),
        llm.clone(),
        fx.store.clone(),
        DownloadLinks::new(LINK_PREFIX),
    );

    let out = tool.call(json!({"topic": "AI 협업"}), &ctx()).await.unwrap();
    assert!(out.starts_with("'AI 협업 도구 동향' 문서 초안이 완성되었습니다.\n[여기에서 다운로드]("));
    assert!(out.ends_with("하여 내용을 확인하고 수정하세요."));

    let filename = filename_from(&out);
    assert!(filename.ends_with(".docx"));
    let bytes = std::fs::read(fx.store.dir().join(&filename)).unwrap();
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    assert!(archive.by_name("word/document.xml").is_ok());

    assert_eq!(
        fx.web.queries.lock().unwrap()[0],
        "AI 협업에 대한 최신 동향, 통계, 주요 사례 분석"
    );
    assert_eq!(fx.papers.queries.lock().unwrap()[0], "AI 협업");

    let request = &llm.requests()[0];
    assert!((request.temperature - 0.3).abs() < f32::EPSILON);
    let material = request.messages[1].content_str();
    assert!(material.starts_with("주제: AI 협업\n\n[원시 데이터]:\n문서 주제: AI 협업"));
    assert!(material.contains("[웹 리서치 결과]:\n웹 결과"));
    assert!(material.contains("논문 검색에 실패했습니다: Internal error: down"));
    assert!(material.contains("민수: 발표 주제 정하자"));
}

#[tokio::test]
async fn report_accepts_null_and_list_content() {
    let fx = fixture(FixedResearch::ok("w"), FixedResearch::ok("p"));
    let llm = Arc::new(ScriptedLlm::new([r#"{
  "report_title": "팀 프로젝트 보고서",
  "main_sections": [
    {"title": "I. 서론", "content": null, "guideline": null},
    {"title": "II. 본론", "sub_sections": [
      {"title": "1. 현황", "content": ["첫 문단", "둘째 문단"], "guideline": ["자료 보강"]}
    ]}
  ]
}"#]));
    let tool = GenerateReportTool::new(
        fx.gatherer.clone(),
        llm,
        fx.store.clone(),
        DownloadLinks::new(LINK_PREFIX),
    );

    let out = tool.call(json!({"topic": "프로젝트"}), &ctx()).await.unwrap();
    assert!(out.starts_with("'팀 프로젝트 보고서' 문서 초안이 완성되었습니다."));

    let bytes = std::fs::read(fx.store.dir().join(filename_from(&out))).unwrap();
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut document = String::new();
    std::io::Read::read_to_string(
        &mut archive.by_name("word/document.xml").unwrap(),
        &mut document,
    )
    .unwrap();
    assert!(document.contains("첫 문단</w:t><w:br/>"));
    assert!(document.contains("둘째 문단"));
    assert!(document.contains("자료 보강"));
}

#[tokio::test]
async fn report_with_unparsable_outline() {
    let fx = fixture(FixedResearch::ok("w"), FixedResearch::ok("p"));
    let llm = Arc::new(ScriptedLlm::new(["보고서를 작성할 수 없습니다."]));
    let tool = GenerateReportTool::new(
        fx.gatherer.clone(),
        llm,
        fx.store.clone(),
        DownloadLinks::new(LINK_PREFIX),
    );

    let out = tool.call(json!({"topic": "AI"}), &ctx()).await.unwrap();
    assert_eq!(out, "AI가 문서 구조를 생성하는 데 실패했습니다.");
    assert_eq!(std::fs::read_dir(fx.store.dir()).unwrap().count(), 0);
}

// ============================================================================
// generate_ppt
// ============================================================================

const DECK_REPLY: &str = r#"{
  "presentation_title": "원격 협업의 미래",
  "presenter": "김민수",
  "slides": [
    {"layout": "Layout_Body", "title": "배경", "content": "- 원격 근무 확산", "guideline": "[Critique] 근거 부족"}
  ]
}"#;

#[tokio::test]
async fn deck_is_repaired_once_then_written() {
    let fx = fixture(FixedResearch::ok("w"), FixedResearch::ok("p"));
    let broken = r#"{"presentation_title": "원격 협업의 미래", "slides": [}"#;
    let llm = Arc::new(ScriptedLlm::new([broken, DECK_REPLY]));
    let tool = GeneratePptTool::new(
        fx.gatherer.clone(),
        llm.clone(),
        fx.store.clone(),
        DownloadLinks::new(LINK_PREFIX),
    );

    let out = tool.call(json!({"topic": "원격 협업"}), &ctx()).await.unwrap();
    assert!(out.starts_with("'원격 협업의 미래' 발표 자료 초안이 완성되었습니다."));
    assert!(out.ends_with("하여 내용을 확인하고 발전시키세요."));

    let filename = filename_from(&out);
    assert!(filename.ends_with(".pptx"));
    let bytes = std::fs::read(fx.store.dir().join(&filename)).unwrap();
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    assert!(archive.by_name("ppt/presentation.xml").is_ok());

    let requests = llm.requests();
    assert_eq!(requests.len(), 2);
    assert!((requests[0].temperature - 0.4).abs() < f32::EPSILON);
    assert!(requests[0].messages[1]
        .content_str()
        .starts_with("발표 주제: 원격 협업\n\n[참고 자료]:\n발표 주제: 원격 협업"));
    assert_eq!(requests[1].messages.len(), 1);
    assert_eq!(requests[1].messages[0].role, MessageRole::User);
    assert!(requests[1].messages[0].content_str().contains("Malformed JSON:\n---\n{\"presentation_title\""));

    assert_eq!(fx.web.queries.lock().unwrap()[0], "원격 협업에 대한 발표 자료");
}

#[tokio::test]
async fn deck_gives_up_after_failed_repair() {
    let fx = fixture(FixedResearch::ok("w"), FixedResearch::ok("p"));
    let llm = Arc::new(ScriptedLlm::new(["not json", "still not json"]));
    let tool = GeneratePptTool::new(
        fx.gatherer.clone(),
        llm.clone(),
        fx.store.clone(),
        DownloadLinks::new(LINK_PREFIX),
    );

    let out = tool.call(json!({"topic": "원격 협업"}), &ctx()).await.unwrap();
    assert_eq!(
        out,
        "AI가 PPT 구조를 생성하고 수정하는 데 모두 실패했습니다. 다시 시도해 주세요."
    );
    assert_eq!(llm.requests().len(), 2);
}

#[tokio::test]
async fn deck_aborts_when_research_fails() {
    let fx = fixture(FixedResearch::failing("quota"), FixedResearch::ok("p"));
    let llm = Arc::new(ScriptedLlm::default());
    let tool = GeneratePptTool::new(
        fx.gatherer.clone(),
        llm.clone(),
        fx.store.clone(),
        DownloadLinks::new(LINK_PREFIX),
    );

    let out = tool.call(json!({"topic": "원격 협업"}), &ctx()).await.unwrap();
    assert_eq!(out, "발표 자료를 만들기 위한 정보를 수집하는 데 실패했습니다.");
    assert!(llm.requests().is_empty());
}
