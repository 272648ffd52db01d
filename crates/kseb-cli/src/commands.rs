//! Available subcommands.

use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server
    Serve {
        /// Bind address (defaults to SERVER_HOST)
        #[arg(long)]
        host: Option<String>,
        /// Port (defaults to SERVER_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Validate the environment and print the settings with secrets masked
    CheckConfig,

    /// Ask the agent one question from the terminal
    Ask {
        /// Channel the question is asked in
        #[arg(long)]
        channel: i64,
        /// JWT issued by the main server
        #[arg(long, env = "KSEB_TOKEN", hide_env_values = true)]
        token: String,
        /// Group the channel belongs to
        #[arg(long)]
        group: Option<i64>,
        /// The question
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
}
