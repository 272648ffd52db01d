//! PowerPoint presentation drafts.

use std::sync::Arc;

use async_trait::async_trait;
use kseb_core::{
    ArtifactStore, ChatContext, CompletionRequest, DeckContext, LlmMessage, LlmPort, Tool,
    ToolDefinition, ToolError,
};
use kseb_docs::build_deck_pptx;
use kseb_llm::parse_json_reply;
use serde::Deserialize;
use serde_json::{Value, json};
use thiserror::Error;

use crate::gather::Gatherer;
use crate::output::DownloadLinks;

/// Instructions for the deck outline with critique-style speaker notes.
pub const DECK_SYSTEM_PROMPT: &str = r#"당신은 TED 강연자를 코칭하는 세계 최고의 프레젠테이션 코치이자, McKinsey의 수석 컨설턴트입니다.
당신의 임무는 주어진 주제와 데이터를 바탕으로, 청중을 완벽하게 설득하고 감동시킬 PPT 초안을 'JSON' 형식으로 생성하는 것입니다.

**프레젠테이션 생성 원칙:**
1.  **표지 정보:** `presentation_title`, `presenter`, `team_members`, `major` 필드를 생성합니다.
2.  **동적 목차 생성:** 먼저 본문 슬라이드들을 모두 구상한 뒤, 각 섹션의 제목(`Layout_Section_Header`)을 추출하여 `Layout_TOC` 슬라이드의 `content`를 동적으로 구성해야 합니다.
3.  **(핵심!) '비평 및 개선' 가이드라인:** 모든 슬라이드의 `guideline`은 아래 3가지 항목을 반드시 포함하는 **'PPT 업그레이드 작업 지시서'**여야 합니다.
    - `[Critique]`: (AI가 방금 만든 슬라이드 초안의 부족한 점, 논리적 허점, 설득력이 약한 부분을 날카롭게 진단하고 비평합니다.)
    - `[Action Items]`: (비평에 대한 구체적인 개선 계획을 2개 이상 제시합니다. '데이터 추가', '사례 보강', '시각 자료 제작' 등 즉시 실행 가능한 작업이어야 합니다.)
    - `[Presentation Tip]`: (개선된 슬라이드를 발표할 때, 청중의 마음을 사로잡을 수 있는 강력한 오프닝 멘트나 발표 전략을 제시합니다.)
4.  **(중요!) 슬라이드 레이아웃 선택:** 기본적으로 모든 내용은 **`"layout": "Layout_Body"`**를 사용하세요. 하지만, 내용상 다이어그램, 그래프, 차트 등 '시각 자료가 반드시 필요한 경우에만' **`"layout": "Layout_Image_Right"`**를 사용하고, `"image_description"` 필드에 필요한 이미지를 구체적으로 묘사해야 합니다. 일반적인 텍스트 슬라이드에 이미지 레이아웃을 남용하지 마세요.
5.  **사용 가능한 레이아웃:** `Layout_Title`, `Layout_Body`, `Layout_Section_Header`, `Layout_TOC`, `Layout_Conclusion`, `Layout_QNA`, `Layout_Image_Right`.

**JSON 출력 예시:**
{
  "presentation_title": "MCP 서버 기반 초개인화 여행 경험 제안",
  "presenter": "김연아",
  "team_members": "박태환, 손흥민",
  "major": "경영정보시스템",
  "slides": [
    {
      "layout": "Layout_TOC",
      "title": "Index",
      "content": "- I. The Burning Platform: 현 여행 시장의 위기\n- II. The Silver Bullet: MCP 서버, 유일한 해결책\n- III. The Roadmap: 3단계 실행 계획",
      "guideline": "[Critique]: 목차만으로는 발표의 전체적인 스토리와 기대감이 전달되지 않습니다.\n[Action Items]: 1. (디자인) 각 목차 옆에 연관된 아이콘을 배치하여 시각적 이해를 돕고, 2. (부제 추가) 질문 형태의 부제를 추가하여 흥미를 유발하세요.\n[Presentation Tip]: '오늘, 저는 여러분께 단순한 기술이 아닌, 여행의 패러다임을 바꿀 새로운 미래에 대해 말씀드리고자 합니다.' 라는 멘트로 발표를 시작하십시오."
    },
    {
      "layout": "Layout_Body",
      "title": "고객들은 이미 정답을 알고 있습니다",
      "content": "- '나만을 위한 여행'에 대한 갈망 폭발\n- 현실은 획일적인 패키지 상품의 반복",
      "guideline": "[Critique]: 주장은 있으나, 이를 뒷받침할 객관적인 데이터가 없어 공허하게 들립니다.\n[Action Items]: 1. (데이터 보강) '개인화 여행' 검색량 추이 데이터를 찾아 구체적인 수치를 담은 그래프를 추가하세요. 2. (인용 추가) 유명 경영자의 명언을 하단에 추가하여 주장에 무게를 더하세요.\n[Presentation Tip]: '데이터가 보여주듯, 이것은 더 이상 선택이 아닌 생존의 문제입니다.' 와 같이 위기감을 고조시키며 슬라이드를 시작하십시오."
    },
    {
      "layout": "Layout_Image_Right",
      "title": "MCP 서버 아키텍처",
      "content": "- 사용자 데이터 분석을 통한 실시간 개인화\n- MSA 기반의 유연한 확장성 확보",
      "image_description": "중앙에 MCP 서버가 위치하고, 좌측에는 데이터 수집 모듈(앱, 웹), 우측에는 파트너사 API가 연결된 아키텍처 다이어그램. 데이터 흐름을 화살표로 명확히 표시.",
      "guideline": "[Critique]: 아키텍처가 너무 기술 중심으로만 설명되어 비즈니스 측면의 장점이 드러나지 않습니다.\n[Action Items]: 1. (Benefit 추가) 각 구성요소 옆에 기대효과를 작은 텍스트로 추가하세요. 2. (시각화 강화) 데이터 흐름을 순차적으로 보여주는 애니메이션을 적용하세요.\n[Presentation Tip]: '이 복잡해 보이는 그림이, 어떻게 우리에게 수백억의 가치를 안겨줄 수 있는지 지금부터 설명드리겠습니다.' 와 같이 호기심을 자극하는 멘트로 시작하세요."
    }
  ]
}"#;

/// Follow-up prompt used once when the outline is not valid JSON.
///
/// `{malformed_json}` is replaced with the rejected reply.
pub const JSON_REPAIR_PROMPT: &str = "The following text is a malformed JSON string. \
Please correct the syntax errors and return only the valid JSON object. \
Do not add any explanations or surrounding text. Just the corrected JSON.\n\n\
Malformed JSON:\n---\n{malformed_json}\n---";

const DECK_TEMPERATURE: f32 = 0.4;

#[derive(Debug, Error)]
enum DeckError {
    #[error("발표 자료를 만들기 위한 정보를 수집하는 데 실패했습니다.")]
    Gather,

    #[error("AI가 PPT 구조를 생성하고 수정하는 데 모두 실패했습니다. 다시 시도해 주세요.")]
    Outline,

    #[error(
        "PPTX 파일 생성에 실패했습니다. 템플릿 파일의 슬라이드 마스터를 확인하거나 관리자에게 문의하세요."
    )]
    Build,
}

#[derive(Debug, Deserialize)]
struct TopicArgs {
    topic: String,
}

/// Researches a topic and writes a `.pptx` draft with coaching notes.
pub struct GeneratePptTool {
    gatherer: Arc<Gatherer>,
    llm: Arc<dyn LlmPort>,
    store: Arc<dyn ArtifactStore>,
    links: DownloadLinks,
}

impl GeneratePptTool {
    pub const NAME: &'static str = "generate_ppt";

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

    async fn ask(&self, request: CompletionRequest) -> Result<String, DeckError> {
        let completion = self
            .llm
            .complete(request.with_temperature(DECK_TEMPERATURE))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Deck outline request failed");
                DeckError::Outline
            })?;
        Ok(completion.text().to_string())
    }

    /// Ask for the outline; on a JSON error, ask the model once to repair it.
    async fn outline(&self, topic: &str, material: &str) -> Result<DeckContext, DeckError> {
        let reply = self
            .ask(CompletionRequest::prompt(
                DECK_SYSTEM_PROMPT,
                format!("발표 주제: {topic}\n\n[참고 자료]:\n{material}"),
            ))
            .await?;

        match parse_json_reply::<DeckContext>(&reply) {
            Ok(context) => return Ok(context),
            Err(e) => {
                tracing::warn!(error = %e, "Deck outline is not valid JSON, asking for a repair");
            }
        }

        let repair = JSON_REPAIR_PROMPT.replace("{malformed_json}", &reply);
        let repaired = self
            .ask(CompletionRequest::new(vec![LlmMessage::user(repair)]))
            .await?;

        parse_json_reply(&repaired).map_err(|e| {
            tracing::error!(error = %e, reply = %repaired, "Deck outline repair failed");
            DeckError::Outline
        })
    }

    async fn write(&self, context: &DeckContext) -> Result<String, DeckError> {
        let bytes = build_deck_pptx(context).map_err(|e| {
            tracing::error!(error = %e, "Deck build failed");
            DeckError::Build
        })?;
        self.store.save("pptx", bytes).await.map_err(|e| {
            tracing::error!(error = %e, "Deck could not be stored");
            DeckError::Build
        })
    }

    async fn generate(&self, topic: &str, ctx: &ChatContext) -> Result<String, DeckError> {
        let material = self
            .gatherer
            .deck_material(topic, ctx)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Deck material collection failed");
                DeckError::Gather
            })?;
        let context = self.outline(topic, &material).await?;
        let filename = self.write(&context).await?;

        let title = if context.presentation_title.trim().is_empty() {
            topic
        } else {
            context.presentation_title.as_str()
        };
        tracing::info!(filename = %filename, slides = context.slides.len(), "Deck generated");
        Ok(format!(
            "'{title}' 발표 자료 초안이 완성되었습니다.\n[여기에서 다운로드]({})하여 내용을 확인하고 발전시키세요.",
            self.links.url(&filename)
        ))
    }
}

#[async_trait]
impl Tool for GeneratePptTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            Self::NAME,
            "AI가 PPT 초안과 '비평 및 개선' 가이드라인을 제안하고, 오류 시 자가 수정을 시도하며, 커스텀 레이아웃으로 .pptx 파일을 생성하여 다운로드 링크를 반환합니다.",
            json!({
                "type": "object",
                "properties": {
                    "topic": { "type": "string", "description": "발표 자료의 주제." }
                },
                "required": ["topic"]
            }),
        )
    }

    async fn call(&self, args: Value, ctx: &ChatContext) -> Result<String, ToolError> {
        let args: TopicArgs = ToolError::parse_args(args)?;
        tracing::info!(user_id = ctx.user_id, topic = %args.topic, "Deck generation started");
        Ok(self
            .generate(&args.topic, ctx)
            .await
            .unwrap_or_else(|e| e.to_string()))
    }
}
