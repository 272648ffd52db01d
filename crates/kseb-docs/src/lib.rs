//! Office document writers and artifact storage.
//!
//! The `.docx` and `.pptx` files are written directly as Office Open XML
//! packages with the `zip` crate; no templates are read from disk.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

mod docx;
mod error;
mod package;
mod pptx;
mod store;
mod xml;

pub use docx::{DRAFT_LABEL, GUIDELINE_LABEL, INFO_LABELS, TOC_TITLE, build_report_docx};
pub use error::{DocumentError, DocumentResult};
pub use pptx::{CLOSING_SLIDE_TITLE, GUIDE_SLIDE_TITLE, IMAGE_PLACEHOLDER_TEXT, build_deck_pptx};
pub use store::FsArtifactStore;
