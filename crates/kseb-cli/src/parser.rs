//! Root CLI structure with global options.

use clap::Parser;

use crate::commands::Commands;

/// AI chatbot server for the KSEB collaboration tool.
#[derive(Parser)]
#[command(name = "kseb-server")]
#[command(about = "AI chatbot server for the KSEB collaboration tool")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}
