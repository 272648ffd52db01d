//! Core domain types, ports and pure services for the KSEB chatbot server.
//!
//! Adapters (LLM client, main-server client, research clients, document
//! writers, HTTP server) depend on this crate; it depends on none of them.

#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod ports;
pub mod services;
pub mod settings;

// Re-export commonly used types for convenience
pub use domain::{
    BusyInterval, ChannelMessage, ChatContext, ChatRequest, ChatResponse, Completion,
    CompletionRequest, DeckContext, EventChanges, LlmMessage, MessageRole, NewEvent, Paper,
    ReportContext, ReportSection, ReportSubSection, ReportTable, ScheduleScope, SlideLayout,
    SlideSpec, TextBlock, TimeSlot, TokenUsage, ToolCall, ToolDefinition, parse_datetime,
};
pub use ports::{
    ArtifactError, ArtifactStore, BackendError, BackendPort, CoreError, LlmError, LlmPort,
    PageReaderPort, PaperSearchPort, PdfTextPort, ResearchError, SearchHit, Tool, ToolError,
    WebSearchPort, is_safe_name,
};
pub use services::{find_available_slots, format_transcript};
pub use settings::{Settings, SettingsError, validate_settings};

#[cfg(test)]
use tokio as _;
