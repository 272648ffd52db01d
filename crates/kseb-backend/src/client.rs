//! Main-server client.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use kseb_core::{
    BackendError, BackendPort, ChannelMessage, EventChanges, NewEvent, ScheduleScope,
};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde_json::{Value, json};

use crate::dto::ChatListResponse;

/// Timeout for chat history reads.
pub const CHAT_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for calendar calls.
pub const EVENT_TIMEOUT: Duration = Duration::from_secs(20);

const QUERY_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// [`BackendPort`] over the main server's REST API.
pub struct MainServerClient {
    client: reqwest::Client,
    base_url: String,
}

impl MainServerClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        Ok(Self::with_client(client, base_url))
    }

    /// Use an existing reqwest client (shared connection pool).
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn request(
        &self,
        method: Method,
        path: &str,
        token: &str,
        timeout: Duration,
    ) -> Result<RequestBuilder, BackendError> {
        if token.trim().is_empty() {
            return Err(BackendError::MissingToken);
        }
        Ok(self
            .client
            .request(method, format!("{}{path}", self.base_url))
            .bearer_auth(token)
            .timeout(timeout))
    }

    /// Send and decode a JSON body. `204 No Content` and empty bodies map to
    /// `{"success": true}`.
    async fn send_json(&self, request: RequestBuilder) -> Result<Value, BackendError> {
        let response = request.send().await.map_err(|e| {
            tracing::warn!(error = %e, "Main server request failed");
            BackendError::Transport(e.to_string())
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), body = %body, "Main server returned an error");
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }

        if status == StatusCode::NO_CONTENT || body.trim().is_empty() {
            return Ok(json!({ "success": true }));
        }

        serde_json::from_str(&body).map_err(|e| BackendError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl BackendPort for MainServerClient {
    async fn channel_messages(
        &self,
        channel_id: i64,
        user_id: i64,
        token: &str,
    ) -> Result<Vec<ChannelMessage>, BackendError> {
        let request = self
            .request(
                Method::GET,
                &format!("/api/channels/{channel_id}/chats"),
                token,
                CHAT_TIMEOUT,
            )?
            .header("X-User-ID", user_id.to_string());

        let value = self.send_json(request).await?;
        let list: ChatListResponse = serde_json::from_value(value)
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))?;

        list.data.into_iter().map(ChannelMessage::try_from).collect()
    }

    async fn list_events(
        &self,
        scope: ScheduleScope,
        range: Option<(NaiveDateTime, NaiveDateTime)>,
        token: &str,
    ) -> Result<Value, BackendError> {
        let mut request = self.request(Method::GET, &scope.events_path(), token, EVENT_TIMEOUT)?;
        if let Some((start, end)) = range {
            request = request.query(&[
                ("startDate", start.format(QUERY_TIME_FORMAT).to_string()),
                ("endDate", end.format(QUERY_TIME_FORMAT).to_string()),
            ]);
        }
        self.send_json(request).await
    }

    async fn create_event(
        &self,
        scope: ScheduleScope,
        event: &NewEvent,
        token: &str,
    ) -> Result<Value, BackendError> {
        let request = self
            .request(Method::POST, &scope.events_path(), token, EVENT_TIMEOUT)?
            .json(event);
        self.send_json(request).await
    }

    async fn update_event(
        &self,
        scope: ScheduleScope,
        event_id: i64,
        changes: &EventChanges,
        token: &str,
    ) -> Result<Value, BackendError> {
        let request = self
            .request(Method::PATCH, &scope.event_path(event_id), token, EVENT_TIMEOUT)?
            .json(changes);
        self.send_json(request).await
    }

    async fn delete_event(
        &self,
        scope: ScheduleScope,
        event_id: i64,
        token: &str,
    ) -> Result<Value, BackendError> {
        let request =
            self.request(Method::DELETE, &scope.event_path(event_id), token, EVENT_TIMEOUT)?;
        self.send_json(request).await
    }

    async fn group_schedules(
        &self,
        group_id: i64,
        from: NaiveDateTime,
        to: NaiveDateTime,
        token: &str,
    ) -> Result<Value, BackendError> {
        let request = self
            .request(
                Method::GET,
                &format!("/api/groups/{group_id}/events/all-schedules"),
                token,
                EVENT_TIMEOUT,
            )?
            .query(&[
                ("from", from.format(QUERY_TIME_FORMAT).to_string()),
                ("to", to.format(QUERY_TIME_FORMAT).to_string()),
            ]);
        self.send_json(request).await
    }
}
