use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

use crate::models::{Field, PlayerCommand, StatusReport};

#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("failed to run {binary}: {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{binary} {args}` exited with {status}: {stderr}")]
    Failed {
        binary: String,
        args: String,
        status: std::process::ExitStatus,
        stderr: String,
    },
}

/// Control surface of the external player.
#[async_trait]
pub trait PlayerAdapter: Send + Sync {
    /// Query the player's status report. An error means the player could not
    /// be queried at all, usually because its server is not running.
    async fn refresh(&self) -> Result<StatusReport, AdapterError>;

    async fn execute(&self, command: PlayerCommand) -> Result<(), AdapterError>;
}

/// Drives MOC through its `mocp` command line client.
pub struct MocpAdapter {
    binary: PathBuf,
}

impl MocpAdapter {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    async fn run(&self, args: &[String]) -> Result<Vec<u8>, AdapterError> {
        let binary = self.binary.display().to_string();
        let output = Command::new(&self.binary)
            .args(args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| AdapterError::Spawn {
                binary: binary.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(AdapterError::Failed {
                binary,
                args: args.join(" "),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(output.stdout)
    }
}

#[async_trait]
impl PlayerAdapter for MocpAdapter {
    async fn refresh(&self) -> Result<StatusReport, AdapterError> {
        let stdout = self.run(&["-i".to_string()]).await?;
        Ok(parse_info(&String::from_utf8_lossy(&stdout)))
    }

    async fn execute(&self, command: PlayerCommand) -> Result<(), AdapterError> {
        let args = command_args(command);
        debug!("{command}: mocp {}", args.join(" "));
        self.run(&args).await.map(|_| ())
    }
}

/// Parse `key: value` lines. The first colon splits key from value, so
/// values like `CurrentTime: 01:02` keep their own colons.
pub fn parse_info(output: &str) -> StatusReport {
    output
        .lines()
        .filter_map(|line| line.split_once(':'))
        .filter_map(|(key, value)| {
            Field::from_key(key.trim()).map(|field| (field, value.trim().to_string()))
        })
        .collect()
}

pub fn command_args(command: PlayerCommand) -> Vec<String> {
    match command {
        PlayerCommand::Next => vec!["-f".into()],
        PlayerCommand::Previous => vec!["-r".into()],
        PlayerCommand::Play => vec!["-p".into()],
        PlayerCommand::Pause => vec!["-P".into()],
        PlayerCommand::Unpause => vec!["-U".into()],
        PlayerCommand::Stop => vec!["-s".into()],
        PlayerCommand::Exit => vec!["-x".into()],
        PlayerCommand::SeekRelative(seconds) => vec!["--seek".into(), seconds.to_string()],
        PlayerCommand::SeekAbsolute(seconds) => vec!["--jump".into(), format!("{seconds}s")],
        PlayerCommand::SetVolume(volume) => vec!["--volume".into(), volume.min(100).to_string()],
        PlayerCommand::SetShuffle(on) => vec![toggle_flag(on), "shuffle".into()],
        PlayerCommand::SetRepeat(on) => vec![toggle_flag(on), "repeat".into()],
    }
}

fn toggle_flag(on: bool) -> String {
    if on { "-o".into() } else { "-u".into() }
}
