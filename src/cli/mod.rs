use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
pub use commands::*;

#[derive(Parser)]
#[command(name = "moc-mpris")]
#[command(about = "Expose MOC (Music On Console) over the MPRIS D-Bus interface")]
#[command(
    long_about = "A small bridge that implements the MediaPlayer2 D-Bus interface for MOC.\n\nIt is best run as a systemd user service."
)]
#[command(version)]
pub struct Cli {
    /// Configuration file (defaults to ~/.config/moc-mpris/config.toml)
    #[arg(short, long, global = true, env = "MOC_MPRIS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Bus name suffix, registered as org.mpris.MediaPlayer2.<NAME>
    #[arg(long, global = true)]
    pub name: Option<String>,

    /// How often to poll the player, in milliseconds
    #[arg(long, global = true)]
    pub poll_interval_ms: Option<u64>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the bridge (default)
    Run,

    /// Query the player once and print the properties the bridge would publish
    Status {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}
