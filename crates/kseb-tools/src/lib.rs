//! Agent tools for the KSEB chatbot server.
//!
//! Every tool implements [`kseb_core::Tool`]: it publishes a JSON Schema for
//! its arguments and always answers with text for the model. Identity
//! (user, channel, bearer token) comes from the [`kseb_core::ChatContext`]
//! the agent passes in, never from model arguments.
//!
//! | Tool | Purpose |
//! |------|---------|
//! | `get_schedule` .. `recommend_meeting_time` | calendar operations on the main server |
//! | `summarize_channel_conversations` | meeting-style summary of the channel |
//! | `generate_report` / `generate_ppt` | Word / PowerPoint drafts with download links |
//! | `deep_search`, `advanced_arxiv_search`, `semantic_scholar_search` | research |
//! | `read_web_page` | raw page text in chunks |

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

mod deck;
mod gather;
mod output;
mod report;
mod research;
mod schedule;
mod summarize;
mod transcript;

// ============================================================================
// Public API
// ============================================================================

pub use deck::{DECK_SYSTEM_PROMPT, GeneratePptTool, JSON_REPAIR_PROMPT};
pub use gather::Gatherer;
pub use output::DownloadLinks;
pub use report::{GenerateReportTool, REPORT_SYSTEM_PROMPT};
pub use research::{ReadWebPageTool, ResearchTool, Researcher};
pub use schedule::{
    CreateScheduleTool, DeleteScheduleTool, GetScheduleTool, RecommendMeetingTimeTool,
    UpdateScheduleTool,
};
pub use summarize::{FILTER_SYSTEM_PROMPT, SUMMARY_SYSTEM_PROMPT, SummarizeChannelTool};

// Silence unused dev-dependency warnings
#[cfg(test)]
use tempfile as _;
#[cfg(test)]
use zip as _;
