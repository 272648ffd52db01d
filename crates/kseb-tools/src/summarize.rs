//! Channel conversation summary.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Local;
use kseb_core::{BackendPort, ChatContext, LlmPort, Tool, ToolDefinition, ToolError};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::transcript::channel_transcript;

/// System prompt for picking the lines that match a time condition.
///
/// `{today}` is replaced with the current date.
pub const FILTER_SYSTEM_PROMPT: &str = "당신은 대화 로그에서 시간 조건에 맞는 메시지만 정밀하게 추출하는 전문가입니다.\n\
오늘은 {today}입니다. 전체 대화 로그는 아래와 같고, 각 행은 '[YYYY-MM-DD HH:MM] 작성자: 내용' 형태입니다.\n\
사용자가 요청한 시간 조건(time_query)에 맞는 대화만 뽑아서, 원문 그대로 반환하세요.\n\
불필요한 해설, 추가 설명 없이 매칭되는 메시지만 리턴하세요.\n\
만약 매칭되는 메시지가 없다면 'No Match'라고만 적어주세요.";

/// System prompt fixing the meeting-summary layout.
pub const SUMMARY_SYSTEM_PROMPT: &str = "아래는 대학생 협업툴의 채팅/회의 대화입니다.\n\
주요 주제, 논의 내용, 결론, 액션 아이템(담당자, 기한), 질의/우려사항 순으로 \
한국어 공식 보고서 스타일로 요약해 주세요.\n\
아래 포맷을 반드시 지켜서 마크다운 형식으로 출력:\n\
### 회의 요약\n\
**주제:** ...\n\n\
**주요 논의사항:**\n\
- ...\n\n\
**결론:**\n\
- ...\n\n\
**실행 계획:**\n\
- [담당자] ...\n\n\
**질의/우려사항:**\n\
- ...\n";

const NO_MATCH: &str = "No Match";

/// Time condition meaning "the whole conversation".
const ALL: &str = "all";

fn default_time_query() -> String {
    ALL.to_string()
}

#[derive(Debug, Deserialize)]
struct SummarizeArgs {
    #[serde(default = "default_time_query")]
    time_query: String,
}

/// Summarises the current channel, optionally limited to a time span.
pub struct SummarizeChannelTool {
    backend: Arc<dyn BackendPort>,
    llm: Arc<dyn LlmPort>,
}

impl SummarizeChannelTool {
    pub const NAME: &'static str = "summarize_channel_conversations";

    pub fn new(backend: Arc<dyn BackendPort>, llm: Arc<dyn LlmPort>) -> Self {
        Self { backend, llm }
    }

    /// Lines of `conversation` matching `time_query`, or `None`.
    async fn filter_by_time(
        &self,
        conversation: &str,
        time_query: &str,
    ) -> Result<Option<String>, ToolError> {
        let today = Local::now().format("%Y-%m-%d %A").to_string();
        let system = FILTER_SYSTEM_PROMPT.replace("{today}", &today);
        let user = format!("시간 조건: {time_query}\n\n전체 대화:\n---\n{conversation}\n---");

        let reply = self
            .llm
            .ask(&system, &user, 0.0)
            .await
            .map_err(|e| ToolError::Failed(e.to_string()))?;

        if reply.trim().is_empty() || reply.contains(NO_MATCH) {
            return Ok(None);
        }
        Ok(Some(reply))
    }
}

#[async_trait]
impl Tool for SummarizeChannelTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            Self::NAME,
            "채널의 대화 내용을 요약. '회의 요약해줘', '대화 정리해줘' 등과 같이 말할 때 사용.",
            json!({
                "type": "object",
                "properties": {
                    "time_query": {
                        "type": "string",
                        "default": ALL,
                        "description": "요약할 대화의 시간 조건 (예: '오늘', '어제 오후', '지난주'). 전체 대화는 'all'."
                    }
                }
            }),
        )
    }

    async fn call(&self, args: Value, ctx: &ChatContext) -> Result<String, ToolError> {
        let args: SummarizeArgs = ToolError::parse_args(args)?;
        let time_query = args.time_query.trim();
        tracing::info!(
            channel_id = ctx.channel_id,
            time_query,
            "Summarizing channel conversation"
        );

        let conversation = match channel_transcript(self.backend.as_ref(), ctx).await {
            Ok(Some(text)) => text,
            Ok(None) => return Ok("요약할 대화 내용이 없습니다.".to_string()),
            Err(message) => return Ok(message),
        };

        let selected = if time_query.is_empty() || time_query == ALL {
            conversation
        } else {
            match self.filter_by_time(&conversation, time_query).await? {
                Some(lines) => lines,
                None => return Ok(format!("'{time_query}'에 해당하는 대화를 찾지 못했습니다.")),
            }
        };

        let user = format!("다음 대화 내용을 위 포맷에 맞춰 요약해줘:\n{selected}");
        let summary = self
            .llm
            .ask(SUMMARY_SYSTEM_PROMPT, &user, 0.0)
            .await
            .map_err(|e| ToolError::Failed(e.to_string()))?;

        if summary.trim().is_empty() {
            return Ok("요약 보고서 생성에 실패했습니다.".to_string());
        }
        Ok(summary)
    }
}
