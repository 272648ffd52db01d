//! Response shapes of the main server.

use kseb_core::{BackendError, ChannelMessage, parse_datetime};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct ChatListResponse {
    #[serde(default)]
    pub data: Vec<ChatDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChatDto {
    pub created_at: String,
    pub user_name: String,
    #[serde(default)]
    pub content: Option<String>,
}

impl TryFrom<ChatDto> for ChannelMessage {
    type Error = BackendError;

    fn try_from(dto: ChatDto) -> Result<Self, Self::Error> {
        let created_at = parse_datetime(&dto.created_at).ok_or_else(|| {
            BackendError::InvalidResponse(format!("invalid createdAt '{}'", dto.created_at))
        })?;
        Ok(Self {
            created_at,
            user_name: dto.user_name,
            content: dto.content,
        })
    }
}
