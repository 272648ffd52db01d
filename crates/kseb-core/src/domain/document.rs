//! Content models for generated documents.
//!
//! Both models are deserialized from LLM-produced JSON, so every field is
//! lenient: missing values fall back to defaults, text may arrive as a
//! string or a list of lines, and table cells may be any JSON scalar.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

fn untitled() -> String {
    "제목 없음".to_string()
}

/// Text given either as one string or as a list of lines.
///
/// `null` reads as empty text and other scalars as their JSON rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TextBlock {
    Lines(Vec<String>),
    Text(String),
}

impl Default for TextBlock {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl TextBlock {
    /// Individual lines; a single string is split on newlines.
    pub fn lines(&self) -> Vec<&str> {
        match self {
            Self::Lines(lines) => lines.iter().map(String::as_str).collect(),
            Self::Text(text) => text.split('\n').collect(),
        }
    }

    /// All lines joined with newlines.
    pub fn joined(&self) -> String {
        match self {
            Self::Lines(lines) => lines.join("\n"),
            Self::Text(text) => text.clone(),
        }
    }
}

/// Render any JSON scalar as display text.
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

impl From<Value> for TextBlock {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(items) => Self::Lines(items.iter().map(value_text).collect()),
            Value::String(text) => Self::Text(text),
            other => Self::Text(value_text(&other)),
        }
    }
}

impl<'de> Deserialize<'de> for TextBlock {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(Self::from)
    }
}

/// Any JSON value as text; lists become newline-separated lines.
fn lossy_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    TextBlock::deserialize(deserializer).map(|block| block.joined())
}

/// Like [`lossy_text`], with `null` and blank text read as absent.
fn lossy_opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    lossy_text(deserializer).map(|text| Some(text).filter(|t| !t.trim().is_empty()))
}

fn lossy_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Vec::<Value>::deserialize(deserializer)?;
    Ok(values.iter().map(value_text).collect())
}

fn lossy_rows<'de, D>(deserializer: D) -> Result<Vec<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let rows = Vec::<Vec<Value>>::deserialize(deserializer)?;
    Ok(rows
        .iter()
        .map(|row| row.iter().map(value_text).collect())
        .collect())
}

/// A data table inside a report sub-section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportTable {
    #[serde(default, deserialize_with = "lossy_strings")]
    pub headers: Vec<String>,
    #[serde(default, deserialize_with = "lossy_rows")]
    pub rows: Vec<Vec<String>>,
}

impl ReportTable {
    /// A table is rendered only with both a header and at least one row.
    pub fn is_renderable(&self) -> bool {
        !self.headers.is_empty() && !self.rows.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSubSection {
    #[serde(default, deserialize_with = "lossy_text")]
    pub title: String,
    #[serde(default, deserialize_with = "lossy_text")]
    pub content: String,
    #[serde(default, deserialize_with = "lossy_opt_text")]
    pub guideline: Option<String>,
    #[serde(default)]
    pub table: Option<ReportTable>,
}

/// A top-level report section; either plain content or a list of sub-sections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSection {
    #[serde(default, deserialize_with = "lossy_text")]
    pub title: String,
    #[serde(default, deserialize_with = "lossy_text")]
    pub content: String,
    #[serde(default, deserialize_with = "lossy_opt_text")]
    pub guideline: Option<String>,
    #[serde(default)]
    pub sub_sections: Vec<ReportSubSection>,
}

/// Full report outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportContext {
    #[serde(default = "untitled")]
    pub report_title: String,
    #[serde(default)]
    pub main_sections: Vec<ReportSection>,
}

/// Named slide layouts on the deck's slide master.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SlideLayout {
    Title,
    #[default]
    Body,
    SectionHeader,
    Toc,
    Conclusion,
    Qna,
    ImageRight,
}

impl SlideLayout {
    pub const ALL: [Self; 7] = [
        Self::Title,
        Self::Body,
        Self::SectionHeader,
        Self::Toc,
        Self::Conclusion,
        Self::Qna,
        Self::ImageRight,
    ];

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Title => "Layout_Title",
            Self::Body => "Layout_Body",
            Self::SectionHeader => "Layout_Section_Header",
            Self::Toc => "Layout_TOC",
            Self::Conclusion => "Layout_Conclusion",
            Self::Qna => "Layout_QNA",
            Self::ImageRight => "Layout_Image_Right",
        }
    }

    /// Unknown names fall back to the body layout.
    pub fn from_name(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|layout| layout.name() == name)
            .unwrap_or_default()
    }
}

impl From<String> for SlideLayout {
    fn from(value: String) -> Self {
        Self::from_name(&value)
    }
}

impl From<SlideLayout> for String {
    fn from(value: SlideLayout) -> Self {
        value.name().to_string()
    }
}

/// One generated slide.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideSpec {
    #[serde(default)]
    pub layout: SlideLayout,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: TextBlock,
    /// Speaker-notes guidance.
    #[serde(default)]
    pub guideline: Option<TextBlock>,
    #[serde(default)]
    pub image_description: Option<String>,
}

/// Full deck outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckContext {
    #[serde(default = "untitled")]
    pub presentation_title: String,
    #[serde(default)]
    pub presenter: String,
    #[serde(default)]
    pub team_members: String,
    #[serde(default)]
    pub major: String,
    #[serde(default)]
    pub slides: Vec<SlideSpec>,
}
