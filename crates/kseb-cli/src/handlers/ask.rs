//! Ask command handler: one agent turn from the terminal.

use anyhow::{Context, Result};
use kseb_axum::bootstrap;
use kseb_core::{ChatContext, ChatRequest, Settings};

/// Verify `token`, run the agent once and print its answer.
///
/// The token is checked exactly as the HTTP route checks it, and is then
/// forwarded to the main server by the schedule and channel tools.
pub async fn execute(
    settings: &Settings,
    channel_id: i64,
    token: String,
    group_id: Option<i64>,
    query: &[String],
) -> Result<()> {
    let ctx = bootstrap(settings)?;
    let user_id = ctx.auth.verify(&token).context("Token rejected")?;

    let request = ChatRequest {
        query: query.join(" "),
        group_id,
    };
    let chat = ChatContext::new(user_id, channel_id, token).with_group(group_id);

    tracing::debug!(user_id, channel_id, ?group_id, "Running agent turn");
    let response = ctx.chat.answer(&request, &chat).await;
    println!("{}", response.answer);
    Ok(())
}
