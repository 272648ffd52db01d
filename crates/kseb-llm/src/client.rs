//! OpenAI-compatible chat-completions client.
//!
//! Implements exponential backoff for transient server errors (5xx) and
//! network errors; 4xx responses fail immediately.

use std::time::Duration;

use async_trait::async_trait;
use kseb_core::{Completion, CompletionRequest, LlmError, LlmPort};

use crate::config::OpenAiConfig;
use crate::error::{OpenAiError, OpenAiResult};
use crate::wire::{ChatRequestBody, ChatResponseBody, error_message};

/// Chat-completions client implementing [`LlmPort`].
pub struct OpenAiClient {
    client: reqwest::Client,
    config: OpenAiConfig,
}

impl OpenAiClient {
    /// Create a new client with the given configuration.
    pub fn new(config: OpenAiConfig) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::Transport(e.to_string()))?;

        Ok(Self { client, config })
    }

    pub fn model(&self) -> &str {
        self.config.model()
    }

    /// POST the body with automatic retry for transient errors.
    async fn post_with_retry(&self, body: &ChatRequestBody<'_>) -> OpenAiResult<reqwest::Response> {
        let url = self.config.completions_url();
        let mut last_error: Option<OpenAiError> = None;

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                let base_ms =
                    u64::try_from(self.config.retry_base_delay.as_millis()).unwrap_or(u64::MAX);
                let delay = Duration::from_millis(
                    base_ms.saturating_mul(2u64.pow(u32::from(attempt) - 1)),
                );
                tracing::debug!(attempt, ?delay, "Retrying chat completion");
                tokio::time::sleep(delay).await;
            }

            let result = self
                .client
                .post(&url)
                .bearer_auth(&self.config.api_key)
                .json(body)
                .send()
                .await;

            match result {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(response);
                    }

                    let text = response.text().await.unwrap_or_default();
                    let err = OpenAiError::ApiRequestFailed {
                        status: status.as_u16(),
                        message: error_message(&text),
                    };

                    // 5xx errors are retryable (server-side issues)
                    if status.is_server_error() && attempt < self.config.max_retries {
                        last_error = Some(err);
                        continue;
                    }

                    // 4xx errors or final attempt - fail immediately
                    return Err(err);
                }
                Err(e) => {
                    // Network errors are retryable
                    if attempt < self.config.max_retries {
                        last_error = Some(e.into());
                        continue;
                    }
                    return Err(e.into());
                }
            }
        }

        Err(last_error.unwrap_or_else(|| OpenAiError::InvalidResponse {
            message: "Unknown error during request".to_string(),
        }))
    }

    async fn complete_inner(&self, request: &CompletionRequest) -> OpenAiResult<Completion> {
        let body = ChatRequestBody::from_request(&self.config.model, request);
        let response = self.post_with_retry(&body).await?;
        let text = response.text().await?;
        let parsed: ChatResponseBody = serde_json::from_str(&text)?;
        parsed.into_completion()
    }
}

#[async_trait]
impl LlmPort for OpenAiClient {
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, LlmError> {
        let completion = self.complete_inner(&request).await.map_err(|e| {
            tracing::warn!(error = %e, model = %self.config.model, "Chat completion failed");
            LlmError::from(e)
        })?;

        if let Some(usage) = completion.usage {
            tracing::debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Chat completion finished"
            );
        }
        Ok(completion)
    }
}
