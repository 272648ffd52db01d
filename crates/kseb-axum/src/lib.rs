//! Axum web adapter for the KSEB chatbot server.
//!
//! | Route | Auth | Handler |
//! |-------|------|---------|
//! | `GET /` | - | liveness JSON |
//! | `GET /health` | - | `OK` |
//! | `POST {prefix}/chatbot/channels/{channel_id}/query` | JWT | agent answer |
//! | `GET {prefix}/download/{filename}` | - | generated document |
//!
//! [`bootstrap`] is the composition root: it builds every adapter from
//! [`kseb_core::Settings`] and hands the agent only ports.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

pub mod auth;
pub mod bootstrap;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

// Re-export primary types
pub use auth::{AuthError, AuthUser, JwtVerifier};
pub use bootstrap::{
    AxumContext, CorsConfig, ServerConfig, ToolDeps, assemble, bootstrap, build_tool_registry,
    spawn_artifact_sweeper, start_server,
};
pub use error::HttpError;
pub use routes::create_router;
pub use state::AppState;

// Silence unused dev-dependency warnings
#[cfg(test)]
use async_trait as _;
#[cfg(test)]
use http_body_util as _;
#[cfg(test)]
use tempfile as _;
#[cfg(test)]
use tower as _;
