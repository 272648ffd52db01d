//! Generated document downloads.

use axum::extract::{Path, State};
use axum::http::{HeaderValue, header};
use axum::response::{IntoResponse, Response};
use kseb_core::is_safe_name;

use crate::error::{FILE_NOT_FOUND, HttpError, INVALID_FILENAME};
use crate::state::AppState;

const DOCX_TYPE: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
const PPTX_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation";

/// Content type for a stored artifact, by extension.
pub fn content_type(filename: &str) -> &'static str {
    match filename.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase()) {
        Some(ext) if ext == "docx" => DOCX_TYPE,
        Some(ext) if ext == "pptx" => PPTX_TYPE,
        _ => "application/octet-stream",
    }
}

/// Serve a generated document as an attachment.
pub async fn download(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, HttpError> {
    if !is_safe_name(&filename) {
        tracing::warn!(filename = %filename, "Rejected download name");
        return Err(HttpError::BadRequest(INVALID_FILENAME.to_string()));
    }

    let Some(bytes) = state.artifacts.load(&filename).await? else {
        tracing::info!(filename = %filename, "Download not found");
        return Err(HttpError::NotFound(FILE_NOT_FOUND.to_string()));
    };

    tracing::info!(filename = %filename, size = bytes.len(), "Serving download");
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{filename}\""))
        .map_err(|e| HttpError::Internal(e.to_string()))?;

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(content_type(&filename))),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}
