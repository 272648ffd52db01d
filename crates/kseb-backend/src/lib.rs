//! Client for the KSEB main collaboration server.
//!
//! [`MainServerClient`] implements `kseb_core::BackendPort`: channel chat
//! history and personal/group calendar operations, authenticated with the
//! caller's bearer token.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

mod client;
mod dto;

pub use client::{CHAT_TIMEOUT, EVENT_TIMEOUT, MainServerClient};

// Silence unused dev-dependency warnings
#[cfg(test)]
use tokio as _;
#[cfg(test)]
use wiremock as _;
