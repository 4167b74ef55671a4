use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::mocp::{AdapterError, PlayerAdapter};
use crate::models::{Field, LoopStatus, PlaybackStatus, PlayerCommand, PropertyName};
use crate::publish::{SyncEngine, SyncError};
use crate::state::StatusError;

/// Requests coming from the bus side.
#[derive(Debug, Clone, PartialEq)]
pub enum BridgeCommand {
    Next,
    Previous,
    Pause,
    PlayPause,
    Stop,
    Play,
    /// Relative seek, in microseconds.
    Seek { offset: i64 },
    /// Absolute position, in microseconds.
    SetPosition { track_id: String, position: i64 },
    SetVolume(f64),
    SetLoopStatus(LoopStatus),
    SetShuffle(bool),
    SetRate(f64),
    Quit,
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Adapter(#[from] AdapterError),
    #[error("the bridge is shutting down")]
    Stopped,
}

pub struct CommandRequest {
    command: BridgeCommand,
    reply: oneshot::Sender<Result<(), AdapterError>>,
}

/// Cloneable sender used by the bus interface to reach the daemon loop.
#[derive(Clone)]
pub struct CommandHandle {
    tx: mpsc::Sender<CommandRequest>,
}

impl CommandHandle {
    /// Queue a command and wait for the player's answer.
    pub async fn send(&self, command: BridgeCommand) -> Result<(), CommandError> {
        let (reply, outcome) = oneshot::channel();
        self.tx
            .send(CommandRequest { command, reply })
            .await
            .map_err(|_| CommandError::Stopped)?;
        outcome.await.map_err(|_| CommandError::Stopped)?.map_err(CommandError::from)
    }
}

pub fn channel(capacity: usize) -> (CommandHandle, mpsc::Receiver<CommandRequest>) {
    let (tx, rx) = mpsc::channel(capacity);
    (CommandHandle { tx }, rx)
}

#[derive(Debug, Clone)]
pub struct DaemonOptions {
    pub poll_interval: Duration,
    /// Wait after a track change before the status report reflects it.
    pub settle: Duration,
}

#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("player status could not be read: {0}")]
    Status(#[from] StatusError),
}

/// What a command did, beyond succeeding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Done,
    Ignored,
    Seeked(i64),
    Quit,
}

enum Event {
    Command(CommandRequest),
    Tick,
}

/// The single loop that owns the player state. Commands and polls are handled
/// one at a time, each followed by a full sync.
pub struct Daemon {
    engine: SyncEngine,
    adapter: Arc<dyn PlayerAdapter>,
    commands: mpsc::Receiver<CommandRequest>,
    options: DaemonOptions,
}

impl Daemon {
    pub fn new(
        engine: SyncEngine,
        adapter: Arc<dyn PlayerAdapter>,
        commands: mpsc::Receiver<CommandRequest>,
        options: DaemonOptions,
    ) -> Self {
        Self {
            engine,
            adapter,
            commands,
            options,
        }
    }

    /// Run until `shutdown` resolves, a Quit command is handled, or the
    /// player reports something unparseable. Shutdown also interrupts a
    /// cycle in flight.
    pub async fn run(mut self, shutdown: impl Future<Output = ()>) -> Result<(), DaemonError> {
        tokio::pin!(shutdown);

        // The caller primes the published set, so the first poll waits a full period.
        let period = self.options.poll_interval;
        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!("Polling every {:?}", self.options.poll_interval);

        loop {
            let event = tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!("Interrupted");
                    break;
                }
                Some(request) = self.commands.recv() => Event::Command(request),
                _ = ticker.tick() => Event::Tick,
            };

            let handled = tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!("Interrupted during a cycle");
                    break;
                }
                handled = self.handle(event) => handled,
            };

            match handled {
                Ok(Outcome::Quit) => {
                    info!("Player asked to quit");
                    break;
                }
                Ok(_) => {}
                Err(SyncError::Publish(e)) => warn!("Publishing failed, will retry: {e}"),
                Err(SyncError::Status(e)) => {
                    error!("{e}");
                    return Err(e.into());
                }
            }
        }

        info!("Daemon stopped");
        Ok(())
    }

    async fn handle(&self, event: Event) -> Result<Outcome, SyncError> {
        match event {
            Event::Tick => self.engine.sync_once().await.map(|_| Outcome::Done),
            Event::Command(CommandRequest { command, reply }) => {
                info!("{command:?} requested");
                let result = self.execute(&command).await;
                let outcome = match &result {
                    Ok(outcome) => *outcome,
                    Err(e) => {
                        warn!("{command:?} failed: {e}");
                        Outcome::Done
                    }
                };
                // The caller may have given up waiting.
                let _ = reply.send(result.map(|_| ()));

                // A failed notification must not lose the command's outcome.
                match self.engine.sync_once().await {
                    Ok(_) => {}
                    Err(SyncError::Publish(e)) => warn!("Publishing failed, will retry: {e}"),
                    Err(e) => return Err(e),
                }

                if let Outcome::Seeked(position) = outcome {
                    if let Err(e) = self.engine.seeked(position).await {
                        warn!("Failed to emit Seeked: {e}");
                    }
                }
                Ok(outcome)
            }
        }
    }

    /// Check the command's precondition against the current state and run it.
    /// Commands that are not possible right now succeed without doing anything.
    async fn execute(&self, command: &BridgeCommand) -> Result<Outcome, AdapterError> {
        let current = self.engine.current();
        let allowed = |name| current.flag(name);

        match command {
            BridgeCommand::Next | BridgeCommand::Previous => {
                let (capability, verb) = match command {
                    BridgeCommand::Next => (PropertyName::CanGoNext, PlayerCommand::Next),
                    _ => (PropertyName::CanGoPrevious, PlayerCommand::Previous),
                };
                if !allowed(capability) {
                    return Ok(self.ignore(command));
                }
                self.adapter.execute(verb).await?;
                time::sleep(self.options.settle).await;
                Ok(Outcome::Done)
            }
            BridgeCommand::Pause => {
                if !allowed(PropertyName::CanPause) {
                    return Ok(self.ignore(command));
                }
                self.run_verb(PlayerCommand::Pause).await
            }
            BridgeCommand::PlayPause => {
                if !allowed(PropertyName::CanPlay) || !allowed(PropertyName::CanPause) {
                    return Ok(self.ignore(command));
                }
                match current.playback_status() {
                    PlaybackStatus::Playing => self.run_verb(PlayerCommand::Pause).await,
                    PlaybackStatus::Paused => self.run_verb(PlayerCommand::Unpause).await,
                    PlaybackStatus::Stopped => Ok(self.ignore(command)),
                }
            }
            BridgeCommand::Play => {
                if !allowed(PropertyName::CanPlay) {
                    return Ok(self.ignore(command));
                }
                match current.playback_status() {
                    PlaybackStatus::Paused => self.run_verb(PlayerCommand::Unpause).await,
                    PlaybackStatus::Stopped => self.run_verb(PlayerCommand::Play).await,
                    PlaybackStatus::Playing => Ok(self.ignore(command)),
                }
            }
            BridgeCommand::Stop => self.run_verb(PlayerCommand::Stop).await,
            BridgeCommand::Seek { offset } => {
                if !allowed(PropertyName::CanSeek) {
                    return Ok(self.ignore(command));
                }
                let seconds = offset / 1_000_000;
                let position = self.seconds(Field::CurrentSec);
                let total = self.seconds(Field::TotalSec);
                self.adapter
                    .execute(PlayerCommand::SeekRelative(seconds))
                    .await?;

                let mut target = (position.unwrap_or(0) + seconds).max(0);
                if let Some(total) = total {
                    target = target.min(total);
                }
                Ok(Outcome::Seeked(target.saturating_mul(1_000_000)))
            }
            BridgeCommand::SetPosition { track_id, position } => {
                if !allowed(PropertyName::CanSeek) {
                    return Ok(self.ignore(command));
                }
                let current_track = self
                    .engine
                    .published()
                    .read(|p| p.metadata().is_some_and(|m| m.track_id == *track_id));
                if !current_track {
                    debug!("SetPosition for stale track {track_id}");
                    return Ok(Outcome::Ignored);
                }
                let Some(total) = self.seconds(Field::TotalSec) else {
                    return Ok(self.ignore(command));
                };
                if *position < 0 || *position > total * 1_000_000 {
                    debug!("SetPosition {position}us is outside the track");
                    return Ok(Outcome::Ignored);
                }
                self.adapter
                    .execute(PlayerCommand::SeekAbsolute(position / 1_000_000))
                    .await?;
                Ok(Outcome::Seeked(*position))
            }
            BridgeCommand::SetVolume(volume) => {
                let percent = (volume * 100.0).round().clamp(0.0, 100.0) as u8;
                self.run_verb(PlayerCommand::SetVolume(percent)).await
            }
            BridgeCommand::SetLoopStatus(status) => {
                let repeat = !matches!(status, LoopStatus::None);
                self.run_verb(PlayerCommand::SetRepeat(repeat)).await
            }
            BridgeCommand::SetShuffle(shuffle) => {
                self.run_verb(PlayerCommand::SetShuffle(*shuffle)).await
            }
            BridgeCommand::SetRate(rate) => {
                if *rate == 0.0 {
                    self.run_verb(PlayerCommand::Pause).await
                } else {
                    Ok(self.ignore(command))
                }
            }
            BridgeCommand::Quit => {
                self.adapter.execute(PlayerCommand::Exit).await?;
                Ok(Outcome::Quit)
            }
        }
    }

    async fn run_verb(&self, verb: PlayerCommand) -> Result<Outcome, AdapterError> {
        self.adapter.execute(verb).await?;
        Ok(Outcome::Done)
    }

    fn seconds(&self, field: Field) -> Option<i64> {
        self.engine.cache().get(field)?.as_seconds()
    }

    fn ignore(&self, command: &BridgeCommand) -> Outcome {
        info!("{command:?} is not allowed right now");
        Outcome::Ignored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PropertyValue;
    use crate::properties::{PropertyComputer, SharedProperties};
    use crate::publish::{PropertyPublisher, PublishError};
    use crate::state::StateCache;
    use crate::testing::{
        CountingArtwork, FakeAdapter, FakeMixer, RecordingPublisher, playing_report,
    };
    use async_trait::async_trait;
    use std::sync::atomic::Ordering;
    use tokio::task::JoinHandle;

    const TRACK_ID: &str = "/org/moc_mpris_bridge/track/1";

    struct SharedPublisher(Arc<RecordingPublisher>);

    #[async_trait]
    impl PropertyPublisher for SharedPublisher {
        async fn property_changed(
            &self,
            name: PropertyName,
            value: &PropertyValue,
        ) -> Result<(), PublishError> {
            self.0.property_changed(name, value).await
        }

        async fn seeked(&self, position: i64) -> Result<(), PublishError> {
            self.0.seeked(position).await
        }
    }

    struct Running {
        adapter: Arc<FakeAdapter>,
        publisher: Arc<RecordingPublisher>,
        published: SharedProperties,
        handle: CommandHandle,
        stop: oneshot::Sender<()>,
        task: JoinHandle<Result<(), DaemonError>>,
    }

    impl Running {
        async fn shutdown(self) -> Result<(), DaemonError> {
            let _ = self.stop.send(());
            self.task.await.unwrap()
        }
    }

    async fn start(adapter: FakeAdapter) -> Running {
        start_with(
            adapter,
            DaemonOptions {
                // Long enough that only commands drive the tests.
                poll_interval: Duration::from_secs(3600),
                settle: Duration::ZERO,
            },
        )
        .await
    }

    async fn start_with(adapter: FakeAdapter, options: DaemonOptions) -> Running {
        let adapter = Arc::new(adapter);
        let publisher = Arc::new(RecordingPublisher::default());
        let cache = StateCache::new(
            adapter.clone(),
            Arc::new(FakeMixer::new(Some(55))),
            Arc::new(CountingArtwork::default()),
        );
        let computer = PropertyComputer::new(TRACK_ID);
        let published = SharedProperties::default();
        crate::publish::prime(&cache, &computer, &published)
            .await
            .unwrap();
        let engine = SyncEngine::new(
            cache,
            computer,
            published.clone(),
            Box::new(SharedPublisher(publisher.clone())),
        );
        let (handle, rx) = channel(8);
        let daemon = Daemon::new(engine, adapter.clone(), rx, options);
        let (stop, stopped) = oneshot::channel::<()>();
        let task = tokio::spawn(daemon.run(async move {
            let _ = stopped.await;
        }));

        Running {
            adapter,
            publisher,
            published,
            handle,
            stop,
            task,
        }
    }

    #[tokio::test]
    async fn test_command_is_followed_by_sync() {
        let r = start(FakeAdapter::playing()).await;

        r.handle.send(BridgeCommand::Pause).await.unwrap();

        assert_eq!(r.adapter.executed(), vec![PlayerCommand::Pause]);
        // The reply is sent before the sync, so wait for the loop to finish it.
        r.handle.send(BridgeCommand::SetShuffle(false)).await.unwrap();
        assert_eq!(
            r.published.read(|p| p.playback_status()),
            PlaybackStatus::Paused
        );
        assert!(r.publisher.changed_names().contains(&PropertyName::PlaybackStatus));
        r.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_seek_while_paused_is_a_no_op() {
        let mut paused = playing_report();
        paused.insert(Field::State, "PAUSE".into());
        let r = start(FakeAdapter::with_report(paused)).await;

        r.handle
            .send(BridgeCommand::Seek { offset: 10_000_000 })
            .await
            .unwrap();

        assert!(r.adapter.executed().is_empty());
        assert!(r.publisher.seeks().is_empty());
        r.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_seek_emits_seeked() {
        let r = start(FakeAdapter::playing()).await;

        r.handle
            .send(BridgeCommand::Seek { offset: 10_500_000 })
            .await
            .unwrap();
        r.handle
            .send(BridgeCommand::Seek { offset: -60_000_000 })
            .await
            .unwrap();
        r.handle.send(BridgeCommand::SetShuffle(false)).await.unwrap();

        assert_eq!(
            r.adapter.executed()[..2],
            [PlayerCommand::SeekRelative(10), PlayerCommand::SeekRelative(-60)]
        );
        assert_eq!(r.publisher.seeks(), vec![47_000_000, 0]);
        assert_eq!(r.published.read(|p| p.int(PropertyName::Position)), 0);
        r.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_set_position() {
        let r = start(FakeAdapter::playing()).await;

        r.handle
            .send(BridgeCommand::SetPosition {
                track_id: "/org/other/track".into(),
                position: 5_000_000,
            })
            .await
            .unwrap();
        r.handle
            .send(BridgeCommand::SetPosition {
                track_id: TRACK_ID.into(),
                position: 500_000_000,
            })
            .await
            .unwrap();
        // Past the end by half a second.
        r.handle
            .send(BridgeCommand::SetPosition {
                track_id: TRACK_ID.into(),
                position: 151_500_000,
            })
            .await
            .unwrap();
        r.handle
            .send(BridgeCommand::SetPosition {
                track_id: TRACK_ID.into(),
                position: 90_000_000,
            })
            .await
            .unwrap();
        r.handle.send(BridgeCommand::SetShuffle(false)).await.unwrap();

        assert_eq!(r.adapter.executed()[0], PlayerCommand::SeekAbsolute(90));
        assert_eq!(r.publisher.seeks(), vec![90_000_000]);
        assert_eq!(r.published.read(|p| p.int(PropertyName::Position)), 90_000_000);
        r.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_play_pause_toggles() {
        let r = start(FakeAdapter::playing()).await;

        r.handle.send(BridgeCommand::PlayPause).await.unwrap();
        r.handle.send(BridgeCommand::PlayPause).await.unwrap();
        r.handle.send(BridgeCommand::Play).await.unwrap();

        assert_eq!(
            r.adapter.executed(),
            vec![PlayerCommand::Pause, PlayerCommand::Unpause]
        );
        r.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_play_from_stopped_without_track_is_ignored() {
        let r = start(FakeAdapter::stopped()).await;

        r.handle.send(BridgeCommand::Play).await.unwrap();
        r.handle.send(BridgeCommand::Next).await.unwrap();
        r.handle.send(BridgeCommand::PlayPause).await.unwrap();

        assert!(r.adapter.executed().is_empty());
        r.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_writable_properties() {
        let r = start(FakeAdapter::playing()).await;

        r.handle.send(BridgeCommand::SetVolume(0.8)).await.unwrap();
        r.handle.send(BridgeCommand::SetVolume(1.7)).await.unwrap();
        r.handle
            .send(BridgeCommand::SetLoopStatus(LoopStatus::Playlist))
            .await
            .unwrap();
        r.handle
            .send(BridgeCommand::SetLoopStatus(LoopStatus::None))
            .await
            .unwrap();
        r.handle.send(BridgeCommand::SetShuffle(true)).await.unwrap();
        r.handle.send(BridgeCommand::SetRate(1.5)).await.unwrap();
        r.handle.send(BridgeCommand::SetRate(0.0)).await.unwrap();

        assert_eq!(
            r.adapter.executed(),
            vec![
                PlayerCommand::SetVolume(80),
                PlayerCommand::SetVolume(100),
                PlayerCommand::SetRepeat(true),
                PlayerCommand::SetRepeat(false),
                PlayerCommand::SetShuffle(true),
                PlayerCommand::Pause,
            ]
        );
        r.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_next_publishes_new_track() {
        let r = start(FakeAdapter::playing()).await;

        r.handle.send(BridgeCommand::Next).await.unwrap();
        r.handle.send(BridgeCommand::SetShuffle(false)).await.unwrap();

        let title = r
            .published
            .read(|p| p.metadata().and_then(|m| m.title.clone()));
        assert_eq!(title.as_deref(), Some("Olson"));
        r.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_failed_command_still_syncs() {
        let r = start(FakeAdapter::playing()).await;
        let refreshes = r.adapter.refreshes.load(Ordering::SeqCst);
        r.adapter.fail_commands(true);

        let err = r.handle.send(BridgeCommand::Stop).await.unwrap_err();
        assert!(matches!(err, CommandError::Adapter(_)));

        r.adapter.fail_commands(false);
        r.handle.send(BridgeCommand::SetShuffle(false)).await.unwrap();
        r.handle.send(BridgeCommand::Quit).await.unwrap();
        r.task.await.unwrap().unwrap();

        // Each command triggers exactly one refresh.
        assert_eq!(r.adapter.refreshes.load(Ordering::SeqCst), refreshes + 3);
    }

    #[tokio::test]
    async fn test_quit_stops_player_and_loop() {
        let r = start(FakeAdapter::playing()).await;

        r.handle.send(BridgeCommand::Quit).await.unwrap();
        let result = r.task.await.unwrap();

        assert!(result.is_ok());
        assert_eq!(r.adapter.executed(), vec![PlayerCommand::Exit]);
        assert_eq!(
            r.published.read(|p| p.playback_status()),
            PlaybackStatus::Stopped
        );
        let err = r.handle.send(BridgeCommand::Play).await.unwrap_err();
        assert!(matches!(err, CommandError::Stopped));
    }

    #[tokio::test]
    async fn test_malformed_report_ends_loop() {
        let r = start(FakeAdapter::playing()).await;
        r.adapter.set_field("CurrentSec", "soon");

        let reply = r.handle.send(BridgeCommand::Pause).await;
        assert!(reply.is_ok());
        let result = r.task.await.unwrap();

        assert!(matches!(result, Err(DaemonError::Status(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_poll_the_player() {
        let r = start(FakeAdapter::playing()).await;
        let refreshes = r.adapter.refreshes.load(Ordering::SeqCst);

        r.adapter.set_field("CurrentSec", "38");
        time::sleep(Duration::from_secs(3600 * 2 + 1)).await;
        // Round-trip through the loop so every pending tick has been handled.
        r.handle.send(BridgeCommand::SetShuffle(false)).await.unwrap();

        assert!(r.adapter.refreshes.load(Ordering::SeqCst) >= refreshes + 2);
        assert_eq!(r.published.read(|p| p.int(PropertyName::Position)), 38_000_000);
        r.shutdown().await.unwrap();
    }

    fn published_title(r: &Running) -> Option<String> {
        r.published
            .read(|p| p.metadata().and_then(|m| m.title.clone()))
    }

    #[tokio::test]
    async fn test_quit_ends_loop_when_publishing_fails() {
        let r = start(FakeAdapter::playing()).await;
        r.publisher.set_failing(true);

        r.handle.send(BridgeCommand::Quit).await.unwrap();
        let result = time::timeout(Duration::from_secs(5), r.task)
            .await
            .expect("loop should end after Quit")
            .unwrap();

        assert!(result.is_ok());
        assert_eq!(r.adapter.executed(), vec![PlayerCommand::Exit]);
        // Stopped never reached the bus, so it was not recorded either.
        assert_eq!(
            r.published.read(|p| p.playback_status()),
            PlaybackStatus::Playing
        );
    }

    #[tokio::test]
    async fn test_seeked_is_emitted_when_publishing_fails() {
        let r = start(FakeAdapter::playing()).await;
        r.adapter.set_field("Album", "Geogaddi");
        r.publisher.set_failing(true);

        r.handle
            .send(BridgeCommand::Seek { offset: 10_000_000 })
            .await
            .unwrap();
        r.handle.send(BridgeCommand::SetShuffle(false)).await.unwrap();
        assert_eq!(r.publisher.seeks(), vec![47_000_000]);

        // The failed metadata change goes out on a later cycle.
        r.publisher.set_failing(false);
        r.handle.send(BridgeCommand::SetShuffle(false)).await.unwrap();
        r.handle.send(BridgeCommand::SetShuffle(false)).await.unwrap();
        let album = r
            .published
            .read(|p| p.metadata().and_then(|m| m.album.clone()));
        assert_eq!(album.as_deref(), Some("Geogaddi"));
        r.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_tick_waits_for_command_in_flight() {
        let r = start_with(
            FakeAdapter::playing(),
            DaemonOptions {
                poll_interval: Duration::from_secs(5),
                settle: Duration::from_secs(10),
            },
        )
        .await;
        let refreshes = r.adapter.refreshes.load(Ordering::SeqCst);

        let handle = r.handle.clone();
        let next = tokio::spawn(async move { handle.send(BridgeCommand::Next).await });

        // The tick fell due at 5s while Next is still settling.
        time::sleep(Duration::from_secs(7)).await;
        assert_eq!(r.adapter.executed(), vec![PlayerCommand::Next]);
        assert_eq!(r.adapter.refreshes.load(Ordering::SeqCst), refreshes);
        assert_eq!(published_title(&r).as_deref(), Some("Roygbiv"));

        next.await.unwrap().unwrap();
        r.handle.send(BridgeCommand::SetShuffle(false)).await.unwrap();
        assert_eq!(published_title(&r).as_deref(), Some("Olson"));
        assert!(r.adapter.refreshes.load(Ordering::SeqCst) > refreshes);
        r.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_command_checks_state_left_by_tick() {
        let r = start_with(
            FakeAdapter::playing(),
            DaemonOptions {
                poll_interval: Duration::from_secs(5),
                settle: Duration::ZERO,
            },
        )
        .await;

        // Paused from the player's own interface.
        r.adapter.set_field("State", "PAUSE");
        time::sleep(Duration::from_secs(6)).await;
        assert_eq!(
            r.published.read(|p| p.playback_status()),
            PlaybackStatus::Paused
        );

        r.handle
            .send(BridgeCommand::Seek { offset: 10_000_000 })
            .await
            .unwrap();

        assert!(r.adapter.executed().is_empty());
        assert!(r.publisher.seeks().is_empty());
        r.shutdown().await.unwrap();
    }
}
