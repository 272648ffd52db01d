//! JWT bearer authentication.
//!
//! Tokens are issued by the main collaboration server; this server only
//! verifies them with the shared secret and reads the user id.

use std::str::FromStr;

use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use kseb_core::Settings;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::error::HttpError;
use crate::state::AppState;

/// Claim names that may carry the user id, in priority order.
pub const USER_ID_CLAIMS: [&str; 3] = ["userId", "id", "sub"];

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Not authenticated")]
    MissingCredentials,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Invalid token: user_id not found")]
    MissingUserId,

    #[error("Token has expired or invalid")]
    Expired,

    #[error("Unsupported JWT algorithm '{0}'")]
    UnsupportedAlgorithm(String),
}

/// Verifies tokens signed with the shared HMAC secret.
#[derive(Clone)]
pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(secret: &str, algorithm: &str) -> Result<Self, AuthError> {
        let algorithm = Algorithm::from_str(algorithm)
            .ok()
            .filter(|a| matches!(a, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512))
            .ok_or_else(|| AuthError::UnsupportedAlgorithm(algorithm.to_string()))?;

        // `exp` is checked after the user id so each failure gets its own message.
        let mut validation = Validation::new(algorithm);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        Ok(Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, AuthError> {
        Self::new(&settings.jwt_secret, &settings.jwt_algorithm)
    }

    /// Verify `token` and return the user id it was issued for.
    pub fn verify(&self, token: &str) -> Result<i64, AuthError> {
        let claims = decode::<Map<String, Value>>(token, &self.key, &self.validation)
            .map_err(|e| {
                tracing::debug!(error = %e, "JWT rejected");
                AuthError::InvalidToken
            })?
            .claims;

        let user_id = USER_ID_CLAIMS
            .iter()
            .find_map(|name| claims.get(*name).and_then(user_id_value))
            .ok_or(AuthError::MissingUserId)?;

        let expires_at = claims
            .get("exp")
            .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)))
            .ok_or(AuthError::Expired)?;
        if expires_at < Utc::now().timestamp() {
            return Err(AuthError::Expired);
        }

        Ok(user_id)
    }
}

impl std::fmt::Debug for JwtVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtVerifier")
            .field("algorithms", &self.validation.algorithms)
            .finish_non_exhaustive()
    }
}

/// Numbers and numeric strings are accepted; the main server uses both.
fn user_id_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// The token of an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// The authenticated caller of a request.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: i64,
    /// The raw token, forwarded to the main server on the user's behalf.
    pub token: String,
}

impl std::fmt::Debug for AuthUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthUser")
            .field("user_id", &self.user_id)
            .finish_non_exhaustive()
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = HttpError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(&parts.headers) else {
            tracing::warn!(path = %parts.uri.path(), "Request without bearer token");
            return Err(AuthError::MissingCredentials.into());
        };

        let user_id = state.auth.verify(token).inspect_err(|e| {
            tracing::warn!(path = %parts.uri.path(), error = %e, "Bearer token rejected");
        })?;

        Ok(Self {
            user_id,
            token: token.to_string(),
        })
    }
}
