//! In-memory ports for tool tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use kseb_core::{
    BackendError, BackendPort, ChannelMessage, ChatContext, Completion, CompletionRequest,
    CoreError, EventChanges, LlmError, LlmMessage, LlmPort, NewEvent, ScheduleScope,
};
use kseb_tools::Researcher;
use serde_json::{Value, json};

pub fn ctx() -> ChatContext {
    ChatContext::new(7, 42, "jwt-token").with_group(Some(3))
}

pub fn message(hour: u32, user: &str, content: &str) -> ChannelMessage {
    ChannelMessage {
        created_at: NaiveDate::from_ymd_opt(2025, 8, 1)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap(),
        user_name: user.to_string(),
        content: Some(content.to_string()),
    }
}

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Messages { channel_id: i64, user_id: i64 },
    List { scope: ScheduleScope, range: Option<(NaiveDateTime, NaiveDateTime)> },
    Create { scope: ScheduleScope, event: NewEvent },
    Update { scope: ScheduleScope, event_id: i64, changes: EventChanges },
    Delete { scope: ScheduleScope, event_id: i64 },
    Bundle { group_id: i64, from: NaiveDateTime, to: NaiveDateTime },
}

pub struct FakeBackend {
    pub messages: Result<Vec<ChannelMessage>, BackendError>,
    /// Returned by every event operation.
    pub response: Result<Value, BackendError>,
    pub calls: Mutex<Vec<Call>>,
    pub tokens: Mutex<Vec<String>>,
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self {
            messages: Ok(Vec::new()),
            response: Ok(json!({"data": {}})),
            calls: Mutex::new(Vec::new()),
            tokens: Mutex::new(Vec::new()),
        }
    }
}

impl FakeBackend {
    pub fn with_messages(messages: Vec<ChannelMessage>) -> Self {
        Self {
            messages: Ok(messages),
            ..Self::default()
        }
    }

    pub fn responding(response: Result<Value, BackendError>) -> Self {
        Self {
            response,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call, token: &str) {
        self.calls.lock().unwrap().push(call);
        self.tokens.lock().unwrap().push(token.to_string());
    }
}

#[async_trait]
impl BackendPort for FakeBackend {
    async fn channel_messages(
        &self,
        channel_id: i64,
        user_id: i64,
        token: &str,
    ) -> Result<Vec<ChannelMessage>, BackendError> {
        self.record(Call::Messages { channel_id, user_id }, token);
        self.messages.clone()
    }

    async fn list_events(
        &self,
        scope: ScheduleScope,
        range: Option<(NaiveDateTime, NaiveDateTime)>,
        token: &str,
    ) -> Result<Value, BackendError> {
        self.record(Call::List { scope, range }, token);
        self.response.clone()
    }

    async fn create_event(
        &self,
        scope: ScheduleScope,
        event: &NewEvent,
        token: &str,
    ) -> Result<Value, BackendError> {
        self.record(
            Call::Create {
                scope,
                event: event.clone(),
            },
            token,
        );
        self.response.clone()
    }

    async fn update_event(
        &self,
        scope: ScheduleScope,
        event_id: i64,
        changes: &EventChanges,
        token: &str,
    ) -> Result<Value, BackendError> {
        self.record(
            Call::Update {
                scope,
                event_id,
                changes: changes.clone(),
            },
            token,
        );
        self.response.clone()
    }

    async fn delete_event(
        &self,
        scope: ScheduleScope,
        event_id: i64,
        token: &str,
    ) -> Result<Value, BackendError> {
        self.record(Call::Delete { scope, event_id }, token);
        self.response.clone()
    }

    async fn group_schedules(
        &self,
        group_id: i64,
        from: NaiveDateTime,
        to: NaiveDateTime,
        token: &str,
    ) -> Result<Value, BackendError> {
        self.record(Call::Bundle { group_id, from, to }, token);
        self.response.clone()
    }
}

/// LLM that answers from a queue and records every request.
#[derive(Default)]
pub struct ScriptedLlm {
    replies: Mutex<VecDeque<Result<String, LlmError>>>,
    pub requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedLlm {
    pub fn new(replies: impl IntoIterator<Item = &'static str>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().map(|r| Ok(r.to_string())).collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmPort for ScriptedLlm {
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, LlmError> {
        self.requests.lock().unwrap().push(request);
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::InvalidResponse("no scripted reply".into())))?;
        Ok(Completion {
            message: LlmMessage::assistant(reply),
            usage: None,
        })
    }
}

/// Researcher returning a fixed text or error.
pub struct FixedResearch {
    pub result: Result<String, String>,
    pub queries: Mutex<Vec<String>>,
}

impl FixedResearch {
    pub fn ok(text: &str) -> Self {
        Self {
            result: Ok(text.to_string()),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            result: Err(message.to_string()),
            queries: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Researcher for FixedResearch {
    async fn research(&self, query: &str) -> Result<String, CoreError> {
        self.queries.lock().unwrap().push(query.to_string());
        self.result.clone().map_err(CoreError::Internal)
    }
}
