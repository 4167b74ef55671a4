use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub mixer: MixerConfig,
    #[serde(default)]
    pub bridge: BridgeConfig,
    #[serde(default)]
    pub artwork: ArtworkConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub binary: PathBuf,
    /// Delay after next/previous before the new track shows up in `mocp -i`.
    pub settle_ms: u64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("mocp"),
            settle_ms: 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MixerConfig {
    pub binary: PathBuf,
    pub control: String,
}

impl Default for MixerConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("amixer"),
            control: "Master".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Bus name suffix, registered as `org.mpris.MediaPlayer2.<name>`.
    pub name: String,
    pub identity: String,
    pub poll_interval_ms: u64,
    pub track_id: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            name: "moc".to_string(),
            identity: "Media On Console".to_string(),
            poll_interval_ms: 1000,
            track_id: "/org/moc_mpris_bridge/track/1".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtworkConfig {
    pub enabled: bool,
}

impl Default for ArtworkConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Config {
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("moc-mpris")
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Load from `path`, or from the default location. A missing file means defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = path.map_or_else(Self::config_path, Path::to_path_buf);

        if config_path.exists() {
            let content = fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| format!("Failed to parse {}", config_path.display()))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.bridge.poll_interval_ms.max(1))
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.player.settle_ms)
    }
}
