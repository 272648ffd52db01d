//! Core domain types.
//!
//! These types represent the pure domain model, independent of any
//! infrastructure concerns (HTTP, LLM vendors, file formats).
//!
//! # Structure
//!
//! - `chat` - Chat request/response and the per-request identity
//! - `llm` - LLM conversation messages, tool calls and token usage
//! - `channel` - Messages fetched from a collaboration channel
//! - `schedule` - Event scopes, busy intervals and meeting slots
//! - `paper` - Academic paper metadata
//! - `document` - Report and slide-deck content models

pub mod channel;
pub mod chat;
pub mod document;
pub mod llm;
pub mod paper;
pub mod schedule;

pub use channel::ChannelMessage;
pub use chat::{ChatContext, ChatRequest, ChatResponse};
pub use document::{
    DeckContext, ReportContext, ReportSection, ReportSubSection, ReportTable, SlideLayout,
    SlideSpec, TextBlock,
};
pub use llm::{
    Completion, CompletionRequest, LlmMessage, MessageRole, TokenUsage, ToolCall, ToolDefinition,
};
pub use paper::Paper;
pub use schedule::{
    BusyInterval, EventChanges, NewEvent, ScheduleScope, TimeSlot, parse_datetime,
};
