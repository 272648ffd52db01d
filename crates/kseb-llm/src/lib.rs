//! OpenAI-compatible LLM adapter.
//!
//! Provides [`OpenAiClient`], the production implementation of
//! `kseb_core::LlmPort`, plus helpers for prompts that expect JSON replies.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

mod client;
mod config;
mod error;
mod json;
mod wire;

// ============================================================================
// Public API
// ============================================================================

pub use client::OpenAiClient;
pub use config::OpenAiConfig;
pub use json::{parse_json_reply, strip_code_fences};

// Silence unused dev-dependency warnings
#[cfg(test)]
use wiremock as _;
