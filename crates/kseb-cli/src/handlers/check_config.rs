//! Check-config command handler.

use anyhow::{Context, Result};
use kseb_core::{Settings, validate_settings};

/// Validate `settings` and print them with secrets masked.
pub fn execute(settings: &Settings) -> Result<()> {
    validate_settings(settings).context("Invalid settings")?;

    let rendered = serde_json::to_string_pretty(&settings.redacted())?;
    println!("{rendered}");
    println!("Configuration OK");
    Ok(())
}
