//! Serve command handler.

use anyhow::Result;
use kseb_axum::{ServerConfig, start_server};
use kseb_core::Settings;

/// Run the HTTP server until the process is stopped.
pub async fn execute(settings: &Settings, host: Option<String>, port: Option<u16>) -> Result<()> {
    let mut config = ServerConfig::from_settings(settings);
    if let Some(host) = host {
        config = config.with_host(host);
    }
    if let Some(port) = port {
        config = config.with_port(port);
    }

    start_server(settings, config).await
}
