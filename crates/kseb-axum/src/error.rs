//! HTTP error type and mappings.
//!
//! Every failure leaves the server as `{"error": message, "status": code}`.

use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use kseb_core::ArtifactError;
use serde::Serialize;
use thiserror::Error;

use crate::auth::AuthError;

#[derive(Debug, Error)]
pub enum HttpError {
    /// Missing or rejected bearer token.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    status: u16,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = ErrorBody {
            error: message,
            status: status.as_u16(),
        };
        let mut response = (status, axum::Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

impl From<AuthError> for HttpError {
    fn from(err: AuthError) -> Self {
        Self::Unauthorized(err.to_string())
    }
}

impl From<ArtifactError> for HttpError {
    fn from(err: ArtifactError) -> Self {
        match err {
            ArtifactError::InvalidName(_) => Self::BadRequest(INVALID_FILENAME.to_string()),
            ArtifactError::Io(msg) => Self::Internal(msg),
        }
    }
}

/// Rejection text for download names with path components.
pub const INVALID_FILENAME: &str = "잘못된 파일 이름입니다.";

/// Rejection text for download names that are not in the store.
pub const FILE_NOT_FOUND: &str = "파일을 찾을 수 없거나 만료되었습니다.";
