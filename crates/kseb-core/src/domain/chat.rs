//! Chat request/response types and the authenticated request context.

use serde::{Deserialize, Serialize};

/// Body of a chatbot query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatRequest {
    pub query: String,
    /// Group the channel belongs to, when the client knows it.
    #[serde(default, alias = "groupId", skip_serializing_if = "Option::is_none")]
    pub group_id: Option<i64>,
}

/// Reply to a chatbot query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatResponse {
    pub answer: String,
}

/// Identity and scope of the request being served.
///
/// Built by the HTTP layer after token verification and handed to tools
/// directly; none of it is taken from model output.
#[derive(Clone, PartialEq, Eq)]
pub struct ChatContext {
    pub user_id: i64,
    pub group_id: Option<i64>,
    pub channel_id: i64,
    /// Raw bearer token, forwarded to the main server.
    pub jwt_token: String,
}

impl ChatContext {
    pub fn new(user_id: i64, channel_id: i64, jwt_token: impl Into<String>) -> Self {
        Self {
            user_id,
            group_id: None,
            channel_id,
            jwt_token: jwt_token.into(),
        }
    }

    #[must_use]
    pub const fn with_group(mut self, group_id: Option<i64>) -> Self {
        self.group_id = group_id;
        self
    }
}

impl std::fmt::Debug for ChatContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatContext")
            .field("user_id", &self.user_id)
            .field("group_id", &self.group_id)
            .field("channel_id", &self.channel_id)
            .field("jwt_token", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_accepts_camel_case_group() {
        let req: ChatRequest =
            serde_json::from_str(r#"{"query":"hi","groupId":7}"#).unwrap();
        assert_eq!(req.group_id, Some(7));

        let req: ChatRequest = serde_json::from_str(r#"{"query":"hi"}"#).unwrap();
        assert_eq!(req.group_id, None);
    }

    #[test]
    fn test_context_debug_hides_token() {
        let ctx = ChatContext::new(1, 2, "secret-token").with_group(Some(3));
        let printed = format!("{ctx:?}");
        assert!(!printed.contains("secret-token"));
        assert!(printed.contains("group_id: Some(3)"));
    }
}
