use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::artwork::ArtworkSource;
use crate::mixer::Mixer;
use crate::mocp::PlayerAdapter;
use crate::models::{ArtworkMemo, Field, FieldKind, FieldValue, StatusReport, StatusSnapshot};

#[derive(Debug, Error)]
pub enum StatusError {
    #[error("malformed {field} field: {value:?}")]
    MalformedField { field: Field, value: String },
}

/// Holds the latest status snapshot. Only the daemon loop refreshes it;
/// every read and the wholesale replacement go through the same mutex.
pub struct StateCache {
    adapter: Arc<dyn PlayerAdapter>,
    mixer: Arc<dyn Mixer>,
    artwork: Arc<dyn ArtworkSource>,
    snapshot: Mutex<StatusSnapshot>,
}

impl StateCache {
    pub fn new(
        adapter: Arc<dyn PlayerAdapter>,
        mixer: Arc<dyn Mixer>,
        artwork: Arc<dyn ArtworkSource>,
    ) -> Self {
        Self {
            adapter,
            mixer,
            artwork,
            snapshot: Mutex::new(StatusSnapshot::default()),
        }
    }

    /// Replace the snapshot with a fresh report. A player that cannot be
    /// queried leaves an empty snapshot behind; only unparseable values fail.
    pub async fn refresh(&self) -> Result<(), StatusError> {
        let volume = match self.mixer.volume_average().await {
            Ok(volume) => Some(volume),
            Err(e) => {
                debug!("Mixer unavailable: {e}");
                None
            }
        };

        let report = match self.adapter.refresh().await {
            Ok(report) => report,
            Err(e) => {
                debug!("Player not running: {e}");
                *self.lock() = StatusSnapshot {
                    volume,
                    ..StatusSnapshot::default()
                };
                return Ok(());
            }
        };

        let fields = convert_report(report)?;
        let previous = self.lock().artwork.clone();
        let artwork = self.artwork_for(&fields, previous).await;

        *self.lock() = StatusSnapshot {
            fields,
            artwork,
            volume,
        };
        Ok(())
    }

    /// Typed value of one field, `None` when the player did not report it.
    pub fn get(&self, field: Field) -> Option<FieldValue> {
        self.lock().get(field).cloned()
    }

    /// Run `f` against the snapshot while holding the gate.
    pub fn with_snapshot<R>(&self, f: impl FnOnce(&StatusSnapshot) -> R) -> R {
        f(&self.lock())
    }

    async fn artwork_for(
        &self,
        fields: &BTreeMap<Field, FieldValue>,
        previous: Option<ArtworkMemo>,
    ) -> Option<ArtworkMemo> {
        let Some(FieldValue::Text(file)) = fields.get(&Field::File) else {
            return None;
        };

        if let Some(memo) = previous.filter(|memo| &memo.file == file) {
            return Some(memo);
        }

        let source = Arc::clone(&self.artwork);
        let path = PathBuf::from(file);
        let uri = match tokio::task::spawn_blocking(move || source.data_uri(&path)).await {
            Ok(uri) => uri,
            Err(e) => {
                warn!("Artwork lookup for {file} failed: {e}");
                None
            }
        };

        Some(ArtworkMemo {
            file: file.clone(),
            uri,
        })
    }

    fn lock(&self) -> MutexGuard<'_, StatusSnapshot> {
        self.snapshot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn convert_report(report: StatusReport) -> Result<BTreeMap<Field, FieldValue>, StatusError> {
    let mut fields = BTreeMap::new();
    for (field, value) in report {
        let converted = match field.kind() {
            FieldKind::Text => FieldValue::Text(value),
            // Streams report empty numbers; those are unknown.
            _ if value.is_empty() => continue,
            FieldKind::Seconds => FieldValue::Seconds(
                parse_seconds(&value).ok_or(StatusError::MalformedField { field, value })?,
            ),
            FieldKind::Duration => FieldValue::Duration(
                parse_duration(&value).ok_or(StatusError::MalformedField { field, value })?,
            ),
        };
        fields.insert(field, converted);
    }
    Ok(fields)
}

/// Whole seconds, limited to what still fits in microseconds.
fn parse_seconds(value: &str) -> Option<i64> {
    let seconds: i64 = value.parse().ok()?;
    seconds.checked_mul(1_000_000).map(|_| seconds)
}

/// Parse `SS`, `MM:SS` or `HH:MM:SS`.
pub fn parse_duration(value: &str) -> Option<Duration> {
    let parts: Vec<&str> = value.split(':').collect();
    if parts.len() > 3 {
        return None;
    }

    let mut seconds: u64 = 0;
    for part in parts {
        let part: u64 = part.trim().parse().ok()?;
        seconds = seconds.checked_mul(60)?.checked_add(part)?;
    }
    Some(Duration::from_secs(seconds))
}
