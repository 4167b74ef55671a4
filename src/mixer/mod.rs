use async_trait::async_trait;
use regex::Regex;
use std::path::PathBuf;
use std::sync::LazyLock;
use thiserror::Error;
use tokio::process::Command;

static CHANNEL_VOLUME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([0-9]+)%\]").expect("valid channel volume pattern"));

#[derive(Debug, Error)]
pub enum MixerError {
    #[error("failed to query mixer: {0}")]
    Io(#[from] std::io::Error),
    #[error("mixer exited with {0}")]
    Failed(std::process::ExitStatus),
    #[error("no channel volume in mixer output")]
    NoVolume,
}

/// System output volume, as a 0-100 percentage.
#[async_trait]
pub trait Mixer: Send + Sync {
    async fn volume_average(&self) -> Result<u8, MixerError>;
}

/// ALSA mixer queried through `amixer get <control>`.
pub struct AmixerMixer {
    binary: PathBuf,
    control: String,
}

impl AmixerMixer {
    pub fn new(binary: impl Into<PathBuf>, control: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            control: control.into(),
        }
    }
}

#[async_trait]
impl Mixer for AmixerMixer {
    async fn volume_average(&self) -> Result<u8, MixerError> {
        let output = Command::new(&self.binary)
            .arg("get")
            .arg(&self.control)
            .kill_on_drop(true)
            .output()
            .await?;
        if !output.status.success() {
            return Err(MixerError::Failed(output.status));
        }
        parse_volume_average(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Average every `[NN%]` channel reading, rounding down.
pub fn parse_volume_average(output: &str) -> Result<u8, MixerError> {
    let volumes: Vec<u32> = CHANNEL_VOLUME
        .captures_iter(output)
        .filter_map(|caps| caps[1].parse().ok())
        .collect();

    if volumes.is_empty() {
        return Err(MixerError::NoVolume);
    }

    let average = volumes.iter().sum::<u32>() / volumes.len() as u32;
    Ok(average.min(100) as u8)
}
