//! Server settings loaded from the environment, plus validation.
//!
//! `Settings::from_env` reads the process environment. Tests and callers
//! that already hold values use `Settings::from_lookup` with any key lookup.

use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;
use url::Url;

/// Default base URL of the main collaboration server.
pub const DEFAULT_MAIN_SERVER_URL: &str = "http://localhost:8080";

/// Default public base URL of this server (used in download links).
pub const DEFAULT_CHATBOT_SERVER_URL: &str = "http://localhost:8001";

/// Default API prefix for versioned routes.
pub const DEFAULT_API_V1_STR: &str = "/api/v1";

/// Default OpenAI-compatible API base URL.
pub const DEFAULT_OPENAI_API_BASE_URL: &str = "https://api.openai.com/v1";

/// Default chat model.
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4.1";

/// Default listening port.
pub const DEFAULT_SERVER_PORT: u16 = 8001;

/// Default agent iteration cap.
pub const DEFAULT_AGENT_MAX_ITERATIONS: u32 = 10;

/// Default lifetime of generated documents, in hours.
pub const DEFAULT_ARTIFACT_TTL_HOURS: u64 = 24;

/// JWT algorithms accepted with a shared secret.
pub const SUPPORTED_JWT_ALGORITHMS: &[&str] = &["HS256", "HS384", "HS512"];

/// Application settings.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Settings {
    pub openai_api_key: String,
    pub openai_api_base_url: String,
    pub openai_model: String,
    pub main_server_url: String,
    /// Public base URL of this server, used to build download links.
    pub chatbot_server_url: String,
    pub jwt_secret: String,
    pub jwt_algorithm: String,
    pub api_v1_str: String,
    pub google_api_key: String,
    pub google_cse_id: String,
    pub semantic_scholar_api_key: Option<String>,
    pub server_host: String,
    pub server_port: u16,
    /// Directory where generated documents are written.
    pub artifact_dir: PathBuf,
    /// Hours a generated document stays downloadable. Zero keeps them forever.
    pub artifact_ttl_hours: u64,
    pub agent_max_iterations: u32,
    /// Allowed CORS origins. Empty means allow all.
    pub cors_origins: Vec<String>,
}

impl Settings {
    /// Load settings from the process environment.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through an arbitrary key lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &'static str| get(key).ok_or(SettingsError::Missing(key));
        let or_default = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let server_port = match get("SERVER_PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| SettingsError::InvalidNumber {
                key: "SERVER_PORT",
                value: raw,
            })?,
            None => DEFAULT_SERVER_PORT,
        };

        let agent_max_iterations = match get("AGENT_MAX_ITERATIONS") {
            Some(raw) => raw.trim().parse().map_err(|_| SettingsError::InvalidNumber {
                key: "AGENT_MAX_ITERATIONS",
                value: raw,
            })?,
            None => DEFAULT_AGENT_MAX_ITERATIONS,
        };

        let artifact_ttl_hours = match get("ARTIFACT_TTL_HOURS") {
            Some(raw) => raw.trim().parse().map_err(|_| SettingsError::InvalidNumber {
                key: "ARTIFACT_TTL_HOURS",
                value: raw,
            })?,
            None => DEFAULT_ARTIFACT_TTL_HOURS,
        };

        let artifact_dir = get("ARTIFACT_DIR")
            .map_or_else(|| std::env::temp_dir().join("kseb-artifacts"), PathBuf::from);

        let cors_origins = get("CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            openai_api_key: required("OPENAI_API_KEY")?,
            openai_api_base_url: or_default("OPENAI_API_BASE_URL", DEFAULT_OPENAI_API_BASE_URL),
            openai_model: or_default("OPENAI_MODEL", DEFAULT_OPENAI_MODEL),
            main_server_url: or_default("MAIN_SERVER_URL", DEFAULT_MAIN_SERVER_URL),
            chatbot_server_url: or_default("CHATBOT_SERVER_URL", DEFAULT_CHATBOT_SERVER_URL),
            jwt_secret: required("JWT_SECRET")?,
            jwt_algorithm: required("JWT_ALGORITHM")?,
            api_v1_str: or_default("API_V1_STR", DEFAULT_API_V1_STR),
            google_api_key: required("GOOGLE_API_KEY")?,
            google_cse_id: required("GOOGLE_CSE_ID")?,
            semantic_scholar_api_key: get("SEMANTIC_SCHOLAR_API_KEY"),
            server_host: or_default("SERVER_HOST", "0.0.0.0"),
            server_port,
            artifact_dir,
            artifact_ttl_hours,
            agent_max_iterations,
            cors_origins,
        })
    }

    /// How long generated documents are kept, or `None` to keep them.
    pub fn artifact_ttl(&self) -> Option<Duration> {
        (self.artifact_ttl_hours > 0)
            .then(|| Duration::from_secs(self.artifact_ttl_hours.saturating_mul(3600)))
    }

    /// Public download link for a generated artifact.
    pub fn download_url(&self, filename: &str) -> String {
        format!(
            "{}{}/download/{}",
            self.chatbot_server_url.trim_end_matches('/'),
            self.api_v1_str,
            filename
        )
    }

    /// Copy with every secret replaced, suitable for printing.
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mask = |s: &str| if s.is_empty() { String::new() } else { "***".to_string() };
        Self {
            openai_api_key: mask(&self.openai_api_key),
            jwt_secret: mask(&self.jwt_secret),
            google_api_key: mask(&self.google_api_key),
            semantic_scholar_api_key: self.semantic_scholar_api_key.as_deref().map(mask),
            ..self.clone()
        }
    }
}

/// Settings validation error.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("Required environment variable {0} is not set")]
    Missing(&'static str),

    #[error("{key} must be a number, got '{value}'")]
    InvalidNumber { key: &'static str, value: String },

    #[error("JWT secret cannot be empty")]
    EmptySecret,

    #[error("Unsupported JWT algorithm '{0}' (expected one of HS256, HS384, HS512)")]
    UnsupportedAlgorithm(String),

    #[error("API prefix must start with '/' and not end with '/', got '{0}'")]
    InvalidApiPrefix(String),

    #[error("{key} is not a valid URL: '{value}'")]
    InvalidUrl { key: &'static str, value: String },

    #[error("Agent iteration limit must be at least 1")]
    ZeroIterations,
}

/// Validate settings.
pub fn validate_settings(settings: &Settings) -> Result<(), SettingsError> {
    if settings.jwt_secret.trim().is_empty() {
        return Err(SettingsError::EmptySecret);
    }

    if !SUPPORTED_JWT_ALGORITHMS.contains(&settings.jwt_algorithm.as_str()) {
        return Err(SettingsError::UnsupportedAlgorithm(
            settings.jwt_algorithm.clone(),
        ));
    }

    if !settings.api_v1_str.starts_with('/') || settings.api_v1_str.ends_with('/') {
        return Err(SettingsError::InvalidApiPrefix(settings.api_v1_str.clone()));
    }

    for (key, value) in [
        ("MAIN_SERVER_URL", &settings.main_server_url),
        ("CHATBOT_SERVER_URL", &settings.chatbot_server_url),
        ("OPENAI_API_BASE_URL", &settings.openai_api_base_url),
    ] {
        if Url::parse(value).is_err() {
            return Err(SettingsError::InvalidUrl {
                key,
                value: value.clone(),
            });
        }
    }

    if settings.agent_max_iterations == 0 {
        return Err(SettingsError::ZeroIterations);
    }

    Ok(())
}
