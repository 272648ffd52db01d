//! Channel transcript lookup shared by the summary and document tools.

use kseb_core::{BackendError, BackendPort, ChatContext, format_transcript};

/// Transcript of the current channel.
///
/// `Ok(None)` when the channel has no messages. `Err` carries a sentence
/// that can be shown to the user as-is.
pub(crate) async fn channel_transcript(
    backend: &dyn BackendPort,
    ctx: &ChatContext,
) -> Result<Option<String>, String> {
    match backend
        .channel_messages(ctx.channel_id, ctx.user_id, &ctx.jwt_token)
        .await
    {
        Ok(messages) if messages.is_empty() => Ok(None),
        Ok(messages) => Ok(Some(format_transcript(&messages))),
        Err(e) => {
            tracing::warn!(channel_id = ctx.channel_id, error = %e, "Transcript fetch failed");
            Err(describe(&e))
        }
    }
}

fn describe(err: &BackendError) -> String {
    match err {
        BackendError::MissingToken => "인증 토큰이 없어 대화 내용을 가져올 수 없습니다.".to_string(),
        BackendError::Transport(_) => "대화 내용을 가져오는 중 서버와 통신할 수 없습니다.".to_string(),
        BackendError::Status { .. } | BackendError::InvalidResponse(_) => {
            format!("대화 내용을 가져오는 데 실패했습니다: {}", err.detail())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe() {
        assert_eq!(
            describe(&BackendError::Status {
                status: 403,
                body: r#"{"message":"권한 없음"}"#.to_string(),
            }),
            "대화 내용을 가져오는 데 실패했습니다: 권한 없음"
        );
        assert!(describe(&BackendError::Transport("reset".into())).contains("통신할 수 없습니다"));
        assert!(describe(&BackendError::MissingToken).starts_with("인증 토큰이 없어"));
    }
}
