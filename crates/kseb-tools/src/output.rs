//! Result envelopes and download links.

use kseb_core::Settings;
use serde_json::{Value, json};

/// `{"tool": name, "data": data}`
pub(crate) fn data(tool: &str, data: Value) -> String {
    json!({ "tool": tool, "data": data }).to_string()
}

/// `{"tool": name, "error": message}`
pub(crate) fn error(tool: &str, message: impl Into<String>) -> String {
    json!({ "tool": tool, "error": message.into() }).to_string()
}

/// Builds public links to generated documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadLinks {
    prefix: String,
}

impl DownloadLinks {
    /// `prefix` is everything before the file name, e.g.
    /// `http://localhost:8001/api/v1/download/`.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.download_url(""))
    }

    pub fn url(&self, filename: &str) -> String {
        format!("{}{filename}", self.prefix)
    }
}
