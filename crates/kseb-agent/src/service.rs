//! Request-level entry point used by the HTTP layer.

use kseb_core::{ChatContext, ChatRequest, ChatResponse};

use crate::executor::AgentExecutor;

/// Answer when the model ended without any text.
pub const EMPTY_ANSWER: &str = "죄송합니다. 답변을 생성하지 못했습니다.";

/// Answer when the run failed.
pub const ERROR_ANSWER: &str = "죄송합니다, 요청을 처리하는 중에 예상치 못한 오류가 발생했습니다. 질문을 조금 더 구체적으로 바꿔서 다시 시도해 주시겠어요?";

/// Turns chat requests into answers; never fails.
pub struct ChatService {
    executor: AgentExecutor,
}

impl ChatService {
    pub const fn new(executor: AgentExecutor) -> Self {
        Self { executor }
    }

    pub const fn executor(&self) -> &AgentExecutor {
        &self.executor
    }

    /// A `group_id` in the request body takes precedence over the context's.
    pub async fn answer(&self, request: &ChatRequest, ctx: &ChatContext) -> ChatResponse {
        let ctx = ctx.clone().with_group(request.group_id.or(ctx.group_id));
        tracing::info!(
            user_id = ctx.user_id,
            channel_id = ctx.channel_id,
            group_id = ?ctx.group_id,
            "Chat query received"
        );

        let answer = match self.executor.run(&request.query, &ctx).await {
            Ok(run) if run.output.trim().is_empty() => EMPTY_ANSWER.to_string(),
            Ok(run) => run.output,
            Err(e) => {
                tracing::error!(error = %e, user_id = ctx.user_id, "Agent run failed");
                ERROR_ANSWER.to_string()
            }
        };
        ChatResponse { answer }
    }
}
