//! In-memory stand-ins for the player, mixer, artwork and bus used by unit tests.

use async_trait::async_trait;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::artwork::ArtworkSource;
use crate::mixer::{Mixer, MixerError};
use crate::mocp::{AdapterError, PlayerAdapter};
use crate::models::{Field, PlayerCommand, PropertyName, PropertyValue, StatusReport};
use crate::publish::{PropertyPublisher, PublishError};

pub fn report(pairs: &[(&str, &str)]) -> StatusReport {
    pairs
        .iter()
        .map(|(key, value)| {
            let field = Field::from_key(key).unwrap_or_else(|| panic!("unknown field {key}"));
            (field, value.to_string())
        })
        .collect()
}

pub fn playing_report() -> StatusReport {
    report(&[
        ("State", "PLAY"),
        ("File", "/music/roygbiv.flac"),
        ("Title", "Boards of Canada - Roygbiv"),
        ("Artist", "Boards of Canada"),
        ("SongTitle", "Roygbiv"),
        ("Album", "Music Has the Right to Children"),
        ("TotalTime", "02:31"),
        ("TimeLeft", "01:54"),
        ("TotalSec", "151"),
        ("CurrentTime", "00:37"),
        ("CurrentSec", "37"),
        ("Bitrate", "1024kbps"),
        ("AvgBitrate", "980kbps"),
        ("Rate", "44kHz"),
    ])
}

fn spawn_error() -> AdapterError {
    AdapterError::Spawn {
        binary: "mocp".to_string(),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "server not running"),
    }
}

/// Scripted player. Commands are recorded and applied to the report the way
/// MOC would apply them.
pub struct FakeAdapter {
    report: Mutex<StatusReport>,
    running: AtomicBool,
    fail_commands: AtomicBool,
    pub commands: Mutex<Vec<PlayerCommand>>,
    pub refreshes: AtomicUsize,
}

impl FakeAdapter {
    pub fn with_report(report: StatusReport) -> Self {
        Self {
            report: Mutex::new(report),
            running: AtomicBool::new(true),
            fail_commands: AtomicBool::new(false),
            commands: Mutex::new(Vec::new()),
            refreshes: AtomicUsize::new(0),
        }
    }

    pub fn playing() -> Self {
        Self::with_report(playing_report())
    }

    pub fn stopped() -> Self {
        Self::with_report(report(&[("State", "STOP")]))
    }

    pub fn set_running(&self, running: bool) {
        self.running.store(running, Ordering::SeqCst);
    }

    pub fn fail_commands(&self, fail: bool) {
        self.fail_commands.store(fail, Ordering::SeqCst);
    }

    pub fn set_field(&self, key: &str, value: &str) {
        let field = Field::from_key(key).unwrap_or_else(|| panic!("unknown field {key}"));
        self.report.lock().unwrap().insert(field, value.to_string());
    }

    pub fn executed(&self) -> Vec<PlayerCommand> {
        self.commands.lock().unwrap().clone()
    }
}

#[async_trait]
impl PlayerAdapter for FakeAdapter {
    async fn refresh(&self) -> Result<StatusReport, AdapterError> {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
        if !self.running.load(Ordering::SeqCst) {
            return Err(spawn_error());
        }
        Ok(self.report.lock().unwrap().clone())
    }

    async fn execute(&self, command: PlayerCommand) -> Result<(), AdapterError> {
        self.commands.lock().unwrap().push(command);
        if self.fail_commands.load(Ordering::SeqCst) || !self.running.load(Ordering::SeqCst) {
            return Err(spawn_error());
        }

        let mut report = self.report.lock().unwrap();
        match command {
            PlayerCommand::Pause => {
                report.insert(Field::State, "PAUSE".into());
            }
            PlayerCommand::Play | PlayerCommand::Unpause => {
                report.insert(Field::State, "PLAY".into());
            }
            PlayerCommand::Stop => {
                report.insert(Field::State, "STOP".into());
                report.remove(&Field::CurrentSec);
            }
            PlayerCommand::Exit => {
                self.running.store(false, Ordering::SeqCst);
            }
            PlayerCommand::SeekRelative(seconds) => {
                let current: i64 = report
                    .get(&Field::CurrentSec)
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(0);
                report.insert(Field::CurrentSec, (current + seconds).max(0).to_string());
            }
            PlayerCommand::SeekAbsolute(seconds) => {
                report.insert(Field::CurrentSec, seconds.to_string());
            }
            PlayerCommand::Next => {
                report.insert(Field::SongTitle, "Olson".into());
                report.insert(Field::File, "/music/olson.flac".into());
                report.insert(Field::CurrentSec, "0".into());
            }
            _ => {}
        }
        Ok(())
    }
}

pub struct FakeMixer {
    volume: Mutex<Option<u8>>,
}

impl FakeMixer {
    pub fn new(volume: Option<u8>) -> Self {
        Self {
            volume: Mutex::new(volume),
        }
    }
}

#[async_trait]
impl Mixer for FakeMixer {
    async fn volume_average(&self) -> Result<u8, MixerError> {
        (*self.volume.lock().unwrap()).ok_or(MixerError::NoVolume)
    }
}

/// Encodes the file path itself as the artwork payload and counts lookups.
#[derive(Default)]
pub struct CountingArtwork {
    pub lookups: AtomicUsize,
}

impl ArtworkSource for CountingArtwork {
    fn data_uri(&self, path: &Path) -> Option<String> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Some(format!("data:image/png;base64,{}", path.display()))
    }
}

#[derive(Default)]
pub struct RecordingPublisher {
    pub changes: Mutex<Vec<(PropertyName, PropertyValue)>>,
    pub seeks: Mutex<Vec<i64>>,
    failing: AtomicBool,
}

impl RecordingPublisher {
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn take_changes(&self) -> Vec<(PropertyName, PropertyValue)> {
        std::mem::take(&mut *self.changes.lock().unwrap())
    }

    pub fn changed_names(&self) -> Vec<PropertyName> {
        self.changes.lock().unwrap().iter().map(|(name, _)| *name).collect()
    }

    pub fn seeks(&self) -> Vec<i64> {
        self.seeks.lock().unwrap().clone()
    }
}

#[async_trait]
impl PropertyPublisher for RecordingPublisher {
    async fn property_changed(
        &self,
        name: PropertyName,
        value: &PropertyValue,
    ) -> Result<(), PublishError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(PublishError::Bus("connection closed".into()));
        }
        self.changes.lock().unwrap().push((name, value.clone()));
        Ok(())
    }

    async fn seeked(&self, position: i64) -> Result<(), PublishError> {
        self.seeks.lock().unwrap().push(position);
        Ok(())
    }
}
