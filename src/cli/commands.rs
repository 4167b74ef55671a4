use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use crate::artwork::{ArtworkSource, EmbeddedArtwork, NoArtwork};
use crate::config::Config;
use crate::daemon::{self, Daemon, DaemonOptions};
use crate::mixer::AmixerMixer;
use crate::mocp::{MocpAdapter, PlayerAdapter};
use crate::mpris::{MprisPlayer, MprisPublisher};
use crate::properties::{PropertyComputer, SharedProperties};
use crate::publish::{self, SyncEngine};
use crate::state::StateCache;

use super::Cli;

const COMMAND_QUEUE: usize = 16;

pub struct App {
    pub config: Config,
}

impl App {
    pub fn new(cli: &Cli) -> Result<Self> {
        let mut config = Config::load(cli.config.as_deref())?;
        if let Some(name) = &cli.name {
            config.bridge.name = name.clone();
        }
        if let Some(interval) = cli.poll_interval_ms {
            config.bridge.poll_interval_ms = interval;
        }
        Ok(Self { config })
    }

    fn adapter(&self) -> Arc<dyn PlayerAdapter> {
        Arc::new(MocpAdapter::new(self.config.player.binary.clone()))
    }

    fn state_cache(&self, adapter: Arc<dyn PlayerAdapter>) -> StateCache {
        let mixer = Arc::new(AmixerMixer::new(
            self.config.mixer.binary.clone(),
            self.config.mixer.control.clone(),
        ));
        let artwork: Arc<dyn ArtworkSource> = if self.config.artwork.enabled {
            Arc::new(EmbeddedArtwork)
        } else {
            Arc::new(NoArtwork)
        };
        StateCache::new(adapter, mixer, artwork)
    }

    fn computer(&self) -> PropertyComputer {
        PropertyComputer::new(&self.config.bridge.track_id)
    }

    // Command implementations

    pub async fn run(&self) -> Result<()> {
        let adapter = self.adapter();
        let cache = self.state_cache(Arc::clone(&adapter));
        let computer = self.computer();
        let published = SharedProperties::default();

        publish::prime(&cache, &computer, &published)
            .await
            .context("Failed to read the initial player status")?;
        info!("Player is {}", published.read(|p| p.playback_status()));

        let (handle, commands) = daemon::channel(COMMAND_QUEUE);
        let player = MprisPlayer::new(&self.config.bridge.identity, handle, published.clone());
        let publisher = MprisPublisher::export(&self.config.bridge.name, player)
            .await
            .context("Failed to register on the session bus")?;

        let engine = SyncEngine::new(cache, computer, published, Box::new(publisher));
        let options = DaemonOptions {
            poll_interval: self.config.poll_interval(),
            settle: self.config.settle(),
        };

        Daemon::new(engine, adapter, commands, options)
            .run(async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::error!("Failed to listen for interrupts: {e}");
                    std::future::pending::<()>().await;
                }
            })
            .await?;

        Ok(())
    }

    pub async fn status(&self, json: bool) -> Result<()> {
        let cache = self.state_cache(self.adapter());
        let published = SharedProperties::default();
        publish::prime(&cache, &self.computer(), &published)
            .await
            .context("Failed to read the player status")?;
        let properties = published.snapshot();

        if json {
            println!("{}", serde_json::to_string_pretty(&properties)?);
            return Ok(());
        }

        for (name, value) in properties.iter() {
            println!("{:>16}  {value}", name.to_string());
        }
        Ok(())
    }
}
