//! Academic paper metadata shared by the arXiv and Semantic Scholar clients.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paper {
    pub title: String,
    pub authors: Vec<String>,
    /// Publication date (arXiv) or year (Semantic Scholar), as display text.
    pub published: Option<String>,
    /// Landing page.
    pub link: Option<String>,
    /// Abstract.
    pub summary: Option<String>,
    /// Direct PDF link, when one is openly available.
    pub pdf_url: Option<String>,
}

impl Paper {
    /// Comma-separated author list.
    pub fn author_line(&self) -> String {
        self.authors.join(", ")
    }
}
