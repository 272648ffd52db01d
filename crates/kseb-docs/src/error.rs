//! Document writer errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Failed to write document archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("I/O error while writing document: {0}")]
    Io(#[from] std::io::Error),
}

pub type DocumentResult<T> = Result<T, DocumentError>;
