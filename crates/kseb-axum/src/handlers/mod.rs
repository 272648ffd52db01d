//! HTTP request handlers.
//!
//! Handlers are thin: chat queries go to `ChatService`, downloads to the
//! artifact store.

pub mod chat;
pub mod download;
