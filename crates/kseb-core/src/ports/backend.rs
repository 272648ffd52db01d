//! Main collaboration server port.
//!
//! Every call carries the caller's bearer token; the main server enforces
//! its own authorization.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde_json::Value;
use thiserror::Error;

use crate::domain::{ChannelMessage, EventChanges, NewEvent, ScheduleScope};

/// Errors from the main server.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BackendError {
    /// No bearer token was available for the call.
    #[error("인증 토큰이 없습니다.")]
    MissingToken,

    /// The server answered with a non-success status.
    #[error("API 오류: {status} - {body}")]
    Status { status: u16, body: String },

    /// The request could not be completed.
    #[error("요청 오류: {0}")]
    Transport(String),

    /// The response body was not what we expected.
    #[error("응답 형식 오류: {0}")]
    InvalidResponse(String),
}

impl BackendError {
    /// Human-readable detail: the `message` field of a JSON error body when
    /// there is one.
    pub fn detail(&self) -> String {
        match self {
            Self::Status { body, .. } => serde_json::from_str::<Value>(body)
                .ok()
                .and_then(|v| v.get("message").and_then(Value::as_str).map(String::from))
                .unwrap_or_else(|| "알 수 없는 오류".to_string()),
            other => other.to_string(),
        }
    }
}

/// Operations on the main collaboration server.
#[async_trait]
pub trait BackendPort: Send + Sync {
    /// Full chat history of a channel, oldest first.
    async fn channel_messages(
        &self,
        channel_id: i64,
        user_id: i64,
        token: &str,
    ) -> Result<Vec<ChannelMessage>, BackendError>;

    /// Events of a calendar, optionally limited to `[start, end]`.
    async fn list_events(
        &self,
        scope: ScheduleScope,
        range: Option<(NaiveDateTime, NaiveDateTime)>,
        token: &str,
    ) -> Result<Value, BackendError>;

    async fn create_event(
        &self,
        scope: ScheduleScope,
        event: &NewEvent,
        token: &str,
    ) -> Result<Value, BackendError>;

    async fn update_event(
        &self,
        scope: ScheduleScope,
        event_id: i64,
        changes: &EventChanges,
        token: &str,
    ) -> Result<Value, BackendError>;

    async fn delete_event(
        &self,
        scope: ScheduleScope,
        event_id: i64,
        token: &str,
    ) -> Result<Value, BackendError>;

    /// Personal and group events of every member of a group within `[from, to)`.
    async fn group_schedules(
        &self,
        group_id: i64,
        from: NaiveDateTime,
        to: NaiveDateTime,
        token: &str,
    ) -> Result<Value, BackendError>;
}
