//! Route definitions and router construction.

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::bootstrap::{AxumContext, CorsConfig};
use crate::handlers;
use crate::state::AppState;

/// Build CORS layer from configuration.
fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    match config {
        CorsConfig::AllowAll => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
        CorsConfig::AllowOrigins(origins) => {
            let allowed: Vec<HeaderValue> =
                origins.iter().filter_map(|o| o.parse().ok()).collect();
            CorsLayer::new()
                .allow_origin(allowed)
                .allow_methods(Any)
                .allow_headers(Any)
        }
    }
}

/// Versioned API routes, nested under the configured prefix.
pub(crate) fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/chatbot/channels/{channel_id}/query",
            post(handlers::chat::query),
        )
        .route("/download/{filename}", get(handlers::download::download))
}

/// Create the main router.
///
/// `/` and `/health` stay at the root; everything else lives under the
/// context's API prefix (`/api/v1` by default).
pub fn create_router(ctx: AxumContext, cors_config: &CorsConfig) -> Router {
    let prefix = ctx.api_prefix.clone();
    let state: AppState = Arc::new(ctx);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest(&prefix, api_routes())
        .with_state(state)
        .layer(build_cors_layer(cors_config))
        .layer(TraceLayer::new_for_http())
}

async fn root() -> Json<Value> {
    Json(json!({"status": "AI Server is running"}))
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
