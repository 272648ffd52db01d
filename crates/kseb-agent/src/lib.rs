//! Tool-calling agent for the KSEB chatbot server.
//!
//! This crate owns the orchestration only: it sees the model through
//! [`kseb_core::LlmPort`] and the tools through [`kseb_core::Tool`]. The
//! concrete clients are injected by the composition root.
//!
//! ```text
//! ChatService::answer
//!   └─ AgentExecutor::run ──► LlmPort::complete ◄──┐
//!                               │ tool calls       │ tool results
//!                               ▼                  │
//!                          ToolRegistry::execute ──┘
//! ```

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

mod error;
mod executor;
mod prompt;
mod registry;
mod service;

pub use error::AgentError;
pub use executor::{AGENT_TEMPERATURE, AgentExecutor, AgentRun};
pub use prompt::system_prompt;
pub use registry::ToolRegistry;
pub use service::{ChatService, EMPTY_ANSWER, ERROR_ANSWER};

// Silence unused dev-dependency warnings
#[cfg(test)]
use mockall as _;
