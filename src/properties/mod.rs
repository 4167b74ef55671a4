//! Mapping from a status snapshot to the values of the MPRIS player properties.
//!
//! Everything here is a pure function of the snapshot. MOC exposes no
//! capability information of its own, so most `Can*` flags collapse onto
//! "is a track loaded".

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::models::{
    Field, LoopStatus, PlaybackStatus, PlayerState, PropertyName, PropertyValue, StatusSnapshot,
    TrackMetadata,
};

const MICROS_PER_SECOND: i64 = 1_000_000;

/// One value per player property.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PropertySet(BTreeMap<PropertyName, PropertyValue>);

impl PropertySet {
    pub fn get(&self, name: PropertyName) -> Option<&PropertyValue> {
        self.0.get(&name)
    }

    pub fn insert(&mut self, name: PropertyName, value: PropertyValue) {
        self.0.insert(name, value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (PropertyName, &PropertyValue)> {
        self.0.iter().map(|(name, value)| (*name, value))
    }

    /// Boolean property, `false` when unset.
    pub fn flag(&self, name: PropertyName) -> bool {
        matches!(self.get(name), Some(PropertyValue::Bool(true)))
    }

    pub fn playback_status(&self) -> PlaybackStatus {
        match self.get(PropertyName::PlaybackStatus) {
            Some(PropertyValue::Status(status)) => *status,
            _ => PlaybackStatus::Stopped,
        }
    }

    pub fn loop_status(&self) -> LoopStatus {
        match self.get(PropertyName::LoopStatus) {
            Some(PropertyValue::Loop(status)) => *status,
            _ => LoopStatus::None,
        }
    }

    pub fn float(&self, name: PropertyName) -> f64 {
        match self.get(name) {
            Some(PropertyValue::Float(value)) => *value,
            _ => 0.0,
        }
    }

    pub fn int(&self, name: PropertyName) -> i64 {
        match self.get(name) {
            Some(PropertyValue::Int(value)) => *value,
            _ => 0,
        }
    }

    pub fn metadata(&self) -> Option<&TrackMetadata> {
        match self.get(PropertyName::Metadata) {
            Some(PropertyValue::Metadata(metadata)) => Some(metadata),
            _ => None,
        }
    }
}

impl FromIterator<(PropertyName, PropertyValue)> for PropertySet {
    fn from_iter<I: IntoIterator<Item = (PropertyName, PropertyValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// The last published property set, written by the sync engine and read by
/// the bus getters.
#[derive(Debug, Clone, Default)]
pub struct SharedProperties(Arc<RwLock<PropertySet>>);

impl SharedProperties {
    pub fn read<R>(&self, f: impl FnOnce(&PropertySet) -> R) -> R {
        f(&self.0.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub(crate) fn update(&self, name: PropertyName, value: PropertyValue) {
        self.0
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name, value);
    }

    pub fn snapshot(&self) -> PropertySet {
        self.read(PropertySet::clone)
    }
}

/// Derives the property set from a snapshot.
#[derive(Debug, Clone)]
pub struct PropertyComputer {
    track_id: String,
}

impl PropertyComputer {
    pub fn new(track_id: impl Into<String>) -> Self {
        Self {
            track_id: track_id.into(),
        }
    }

    pub fn compute(&self, snapshot: &StatusSnapshot) -> PropertySet {
        PropertyName::ALL
            .into_iter()
            .map(|name| (name, self.value(name, snapshot)))
            .collect()
    }

    pub fn value(&self, name: PropertyName, snapshot: &StatusSnapshot) -> PropertyValue {
        match name {
            PropertyName::PlaybackStatus => PropertyValue::Status(playback_status(snapshot)),
            PropertyName::LoopStatus => PropertyValue::Loop(loop_status(snapshot)),
            PropertyName::Rate | PropertyName::MinimumRate | PropertyName::MaximumRate => {
                PropertyValue::Float(1.0)
            }
            PropertyName::Shuffle => PropertyValue::Bool(shuffle(snapshot)),
            PropertyName::Metadata => PropertyValue::Metadata(self.metadata(snapshot)),
            PropertyName::Volume => PropertyValue::Float(volume(snapshot)),
            PropertyName::Position => PropertyValue::Int(position(snapshot)),
            PropertyName::CanGoNext
            | PropertyName::CanGoPrevious
            | PropertyName::CanPlay
            | PropertyName::CanPause => PropertyValue::Bool(has_track(snapshot)),
            PropertyName::CanSeek => PropertyValue::Bool(can_seek(snapshot)),
            PropertyName::CanControl => PropertyValue::Bool(true),
        }
    }

    pub fn metadata(&self, snapshot: &StatusSnapshot) -> TrackMetadata {
        let text = |field| snapshot.text(field).map(str::to_string);
        TrackMetadata {
            track_id: self.track_id.clone(),
            length: snapshot
                .seconds(Field::TotalSec)
                .map(|seconds| seconds * MICROS_PER_SECOND),
            url: snapshot.text(Field::File).map(file_url),
            art_url: snapshot.art_uri().map(str::to_string),
            title: text(Field::SongTitle),
            artist: text(Field::Artist),
            album: text(Field::Album),
        }
    }
}

pub fn player_state(snapshot: &StatusSnapshot) -> Option<PlayerState> {
    snapshot.text(Field::State).and_then(PlayerState::from_report)
}

pub fn playback_status(snapshot: &StatusSnapshot) -> PlaybackStatus {
    match player_state(snapshot) {
        Some(PlayerState::Play) => PlaybackStatus::Playing,
        Some(PlayerState::Pause) => PlaybackStatus::Paused,
        Some(PlayerState::Stop) | None => PlaybackStatus::Stopped,
    }
}

// mocp -i reports neither repeat nor shuffle.
pub fn loop_status(_snapshot: &StatusSnapshot) -> LoopStatus {
    LoopStatus::None
}

pub fn shuffle(_snapshot: &StatusSnapshot) -> bool {
    false
}

/// Current position in microseconds.
pub fn position(snapshot: &StatusSnapshot) -> i64 {
    snapshot
        .seconds(Field::CurrentSec)
        .map_or(0, |seconds| seconds * MICROS_PER_SECOND)
}

pub fn volume(snapshot: &StatusSnapshot) -> f64 {
    snapshot.volume.map_or(0.0, |percent| f64::from(percent) / 100.0)
}

pub fn has_track(snapshot: &StatusSnapshot) -> bool {
    snapshot.has(Field::SongTitle)
}

/// MOC only seeks while actually playing.
pub fn can_seek(snapshot: &StatusSnapshot) -> bool {
    snapshot.has(Field::CurrentSec) && player_state(snapshot) == Some(PlayerState::Play)
}

fn file_url(file: &str) -> String {
    if file.starts_with('/') {
        format!("file://{file}")
    } else {
        file.to_string()
    }
}
