use anyhow::Result;
use clap::{CommandFactory, Parser};
use kseb_cli::logging::init_logging;
use kseb_cli::{Cli, Commands, handlers};
use kseb_core::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let settings = Settings::from_env()?;

    match command {
        Commands::Serve { host, port } => {
            handlers::serve::execute(&settings, host, port).await?;
        }
        Commands::CheckConfig => {
            handlers::check_config::execute(&settings)?;
        }
        Commands::Ask {
            channel,
            token,
            group,
            query,
        } => {
            handlers::ask::execute(&settings, channel, token, group, &query).await?;
        }
    }

    Ok(())
}
