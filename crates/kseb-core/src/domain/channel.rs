//! Channel chat history as returned by the main server.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One chat message from a channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelMessage {
    pub created_at: NaiveDateTime,
    pub user_name: String,
    /// `None` for file-only messages.
    pub content: Option<String>,
}

impl ChannelMessage {
    /// Render as `[YYYY-MM-DD HH:MM] user: content`.
    pub fn transcript_line(&self) -> String {
        let content = self
            .content
            .as_deref()
            .filter(|c| !c.is_empty())
            .unwrap_or("(파일)");
        format!(
            "[{}] {}: {}",
            self.created_at.format("%Y-%m-%d %H:%M"),
            self.user_name,
            content
        )
    }
}
