//! Named tool lookup and dispatch.

use std::sync::Arc;

use kseb_core::{ChatContext, Tool, ToolCall, ToolDefinition};
use serde_json::Value;

/// Tools available to the agent, in registration order.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: Vec<(String, Arc<dyn Tool>)>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool under its definition name, replacing any tool with the same name.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.definition().name;
        if let Some(slot) = self.tools.iter_mut().find(|(n, _)| *n == name) {
            tracing::warn!(tool = %name, "Replacing registered tool");
            slot.1 = tool;
        } else {
            self.tools.push((name, tool));
        }
    }

    #[must_use]
    pub fn with(mut self, tool: Arc<dyn Tool>) -> Self {
        self.register(tool);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|(n, _)| n == name).map(|(_, t)| t)
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|(_, t)| t.definition()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Run one model-requested call and return the text the model sees.
    ///
    /// Never fails: unknown tools, malformed arguments and tool errors are
    /// reported back to the model as text so it can recover or apologise.
    pub async fn execute(&self, call: &ToolCall, ctx: &ChatContext) -> String {
        let Some(tool) = self.get(&call.name) else {
            tracing::warn!(tool = %call.name, "Model requested an unknown tool");
            return format!(
                "{} is not a valid tool, try one of [{}].",
                call.name,
                self.names().join(", ")
            );
        };

        let args = match parse_arguments(&call.arguments) {
            Ok(args) => args,
            Err(e) => {
                tracing::warn!(tool = %call.name, error = %e, "Tool arguments are not valid JSON");
                return format!("오류: '{}' 도구의 인자를 해석할 수 없습니다: {e}", call.name);
            }
        };

        tracing::info!(tool = %call.name, user_id = ctx.user_id, "Executing tool");
        match tool.call(args, ctx).await {
            Ok(output) => output,
            Err(e) => {
                tracing::error!(tool = %call.name, error = %e, "Tool execution failed");
                format!("오류: '{}' 도구 실행에 실패했습니다: {e}", call.name)
            }
        }
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}

/// Models send `""` for tools without parameters.
fn parse_arguments(raw: &str) -> Result<Value, serde_json::Error> {
    if raw.trim().is_empty() {
        return Ok(Value::Object(serde_json::Map::new()));
    }
    serde_json::from_str(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use kseb_core::ToolError;
    use serde_json::json;

    struct Echo(&'static str);

    #[async_trait]
    impl Tool for Echo {
        fn definition(&self) -> ToolDefinition {
            ToolDefinition::new("echo", "Echo the text argument", json!({"type": "object"}))
        }

        async fn call(&self, args: Value, _ctx: &ChatContext) -> Result<String, ToolError> {
            match args.get("text").and_then(Value::as_str) {
                Some(text) => Ok(format!("{}{text}", self.0)),
                None => Err(ToolError::InvalidArguments("missing field `text`".into())),
            }
        }
    }

    fn call(name: &str, arguments: &str) -> ToolCall {
        ToolCall {
            id: "call_1".into(),
            name: name.into(),
            arguments: arguments.into(),
        }
    }

    fn ctx() -> ChatContext {
        ChatContext::new(1, 2, "token")
    }

    #[tokio::test]
    async fn test_execute_dispatches_by_name() {
        let registry = ToolRegistry::new().with(Arc::new(Echo("> ")));
        let out = registry.execute(&call("echo", r#"{"text":"hi"}"#), &ctx()).await;
        assert_eq!(out, "> hi");
    }

    #[tokio::test]
    async fn test_unknown_tool_lists_alternatives() {
        let registry = ToolRegistry::new().with(Arc::new(Echo("")));
        let out = registry.execute(&call("nope", "{}"), &ctx()).await;
        assert_eq!(out, "nope is not a valid tool, try one of [echo].");
    }

    #[tokio::test]
    async fn test_failures_become_text() {
        let registry = ToolRegistry::new().with(Arc::new(Echo("")));

        let out = registry.execute(&call("echo", "{not json"), &ctx()).await;
        assert!(out.starts_with("오류: 'echo' 도구의 인자를 해석할 수 없습니다"));

        let out = registry.execute(&call("echo", ""), &ctx()).await;
        assert_eq!(
            out,
            "오류: 'echo' 도구 실행에 실패했습니다: Invalid arguments: missing field `text`"
        );
    }

    #[test]
    fn test_register_replaces_same_name() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(Echo("a")));
        registry.register(Arc::new(Echo("b")));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.definitions()[0].name, "echo");
    }
}
