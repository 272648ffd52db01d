//! Chatbot query handler.

use axum::Json;
use axum::extract::{Path, State};
use kseb_core::{ChatContext, ChatRequest, ChatResponse};

use crate::auth::AuthUser;
use crate::state::AppState;

/// Run the agent for one question asked in a channel.
pub async fn query(
    State(state): State<AppState>,
    Path(channel_id): Path<i64>,
    user: AuthUser,
    Json(request): Json<ChatRequest>,
) -> Json<ChatResponse> {
    let ctx = ChatContext::new(user.user_id, channel_id, user.token).with_group(request.group_id);
    Json(state.chat.answer(&request, &ctx).await)
}
