mod artwork;
mod cli;
mod config;
mod daemon;
mod mixer;
mod mocp;
mod models;
mod mpris;
mod properties;
mod publish;
mod state;
#[cfg(test)]
mod testing;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{App, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let app = App::new(&cli)?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            app.run().await?;
        }
        Commands::Status { json } => {
            app.status(json).await?;
        }
    }

    Ok(())
}
