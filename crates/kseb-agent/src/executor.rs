//! The tool-calling loop.

use std::sync::Arc;

use chrono::Local;
use kseb_core::settings::DEFAULT_AGENT_MAX_ITERATIONS;
use kseb_core::{ChatContext, CompletionRequest, LlmMessage, LlmPort, TokenUsage};

use crate::error::AgentError;
use crate::prompt::system_prompt;
use crate::registry::ToolRegistry;

/// Sampling temperature for tool selection.
pub const AGENT_TEMPERATURE: f32 = 0.0;

/// Outcome of a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentRun {
    /// The model's final text; empty if it sent none.
    pub output: String,
    /// Model calls made, including the final one.
    pub iterations: u32,
    pub usage: TokenUsage,
}

/// Drives the model until it answers without requesting tools.
pub struct AgentExecutor {
    llm: Arc<dyn LlmPort>,
    tools: Arc<ToolRegistry>,
    max_iterations: u32,
}

impl AgentExecutor {
    pub fn new(llm: Arc<dyn LlmPort>, tools: Arc<ToolRegistry>) -> Self {
        Self {
            llm,
            tools,
            max_iterations: DEFAULT_AGENT_MAX_ITERATIONS,
        }
    }

    #[must_use]
    pub const fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub const fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Answer one user query.
    ///
    /// Each iteration sends the whole conversation so far with every tool
    /// definition. Tool calls are executed in the order the model listed them
    /// and their results appended as `tool` messages.
    pub async fn run(&self, query: &str, ctx: &ChatContext) -> Result<AgentRun, AgentError> {
        let definitions = self.tools.definitions();
        let mut messages = vec![
            LlmMessage::system(system_prompt(ctx, Local::now().date_naive())),
            LlmMessage::user(query),
        ];
        let mut usage = TokenUsage::default();

        for iteration in 1..=self.max_iterations {
            let request = CompletionRequest::new(messages.clone())
                .with_tools(definitions.clone())
                .with_temperature(AGENT_TEMPERATURE);

            let completion = match self.llm.complete(request).await {
                Ok(completion) => completion,
                Err(e) => {
                    log_usage(&usage);
                    return Err(e.into());
                }
            };
            if let Some(step) = completion.usage {
                usage += step;
            }

            let reply = completion.message;
            if reply.tool_calls.is_empty() {
                log_usage(&usage);
                tracing::debug!(iterations = iteration, "Agent finished");
                return Ok(AgentRun {
                    output: reply.content.unwrap_or_default(),
                    iterations: iteration,
                    usage,
                });
            }

            let calls = reply.tool_calls.clone();
            messages.push(reply);
            for call in &calls {
                tracing::debug!(iteration, tool = %call.name, arguments = %call.arguments, "Tool call");
                let result = self.tools.execute(call, ctx).await;
                messages.push(LlmMessage::tool_result(&call.id, result));
            }
        }

        log_usage(&usage);
        tracing::warn!(max_iterations = self.max_iterations, "Agent hit the iteration limit");
        Err(AgentError::IterationLimit(self.max_iterations))
    }
}

fn log_usage(usage: &TokenUsage) {
    tracing::info!(
        total_tokens = usage.total_tokens,
        prompt_tokens = usage.prompt_tokens,
        completion_tokens = usage.completion_tokens,
        "Token usage"
    );
}
