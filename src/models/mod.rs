use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Keys of the `mocp -i` report that the bridge keeps. Anything else the
/// player prints is dropped while parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    State,
    File,
    Title,
    Artist,
    SongTitle,
    Album,
    TotalTime,
    TimeLeft,
    TotalSec,
    CurrentTime,
    CurrentSec,
    Bitrate,
    AvgBitrate,
    Rate,
}

impl Field {
    pub const ALL: [Field; 14] = [
        Field::State,
        Field::File,
        Field::Title,
        Field::Artist,
        Field::SongTitle,
        Field::Album,
        Field::TotalTime,
        Field::TimeLeft,
        Field::TotalSec,
        Field::CurrentTime,
        Field::CurrentSec,
        Field::Bitrate,
        Field::AvgBitrate,
        Field::Rate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::State => "State",
            Field::File => "File",
            Field::Title => "Title",
            Field::Artist => "Artist",
            Field::SongTitle => "SongTitle",
            Field::Album => "Album",
            Field::TotalTime => "TotalTime",
            Field::TimeLeft => "TimeLeft",
            Field::TotalSec => "TotalSec",
            Field::CurrentTime => "CurrentTime",
            Field::CurrentSec => "CurrentSec",
            Field::Bitrate => "Bitrate",
            Field::AvgBitrate => "AvgBitrate",
            Field::Rate => "Rate",
        }
    }

    pub fn from_key(key: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|field| field.as_str() == key)
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            Field::TotalTime | Field::TimeLeft | Field::CurrentTime => FieldKind::Duration,
            Field::TotalSec | Field::CurrentSec => FieldKind::Seconds,
            _ => FieldKind::Text,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Seconds,
    Duration,
}

/// A typed field value, converted from the raw report text by the state cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Seconds(i64),
    Duration(std::time::Duration),
}

impl FieldValue {
    pub fn as_seconds(&self) -> Option<i64> {
        match self {
            FieldValue::Seconds(seconds) => Some(*seconds),
            _ => None,
        }
    }
}

/// Raw report as returned by the player adapter, before type conversion.
pub type StatusReport = BTreeMap<Field, String>;

/// Artwork computed for a given file, carried across refreshes while the
/// file stays the same.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtworkMemo {
    pub file: String,
    pub uri: Option<String>,
}

/// Everything known about the player at the instant of the last refresh.
/// A missing field means "unknown".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusSnapshot {
    pub fields: BTreeMap<Field, FieldValue>,
    pub artwork: Option<ArtworkMemo>,
    pub volume: Option<u8>,
}

impl StatusSnapshot {
    pub fn get(&self, field: Field) -> Option<&FieldValue> {
        self.fields.get(&field)
    }

    pub fn has(&self, field: Field) -> bool {
        self.fields.contains_key(&field)
    }

    pub fn text(&self, field: Field) -> Option<&str> {
        match self.fields.get(&field) {
            Some(FieldValue::Text(value)) => Some(value),
            _ => None,
        }
    }

    pub fn seconds(&self, field: Field) -> Option<i64> {
        self.fields.get(&field).and_then(FieldValue::as_seconds)
    }

    pub fn art_uri(&self) -> Option<&str> {
        self.artwork.as_ref().and_then(|memo| memo.uri.as_deref())
    }
}

/// Player state as printed in the `State` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    Stop,
    Play,
    Pause,
}

impl PlayerState {
    pub fn from_report(value: &str) -> Option<Self> {
        match value {
            "STOP" => Some(PlayerState::Stop),
            "PLAY" => Some(PlayerState::Play),
            "PAUSE" => Some(PlayerState::Pause),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PlaybackStatus {
    Playing,
    Paused,
    Stopped,
}

impl fmt::Display for PlaybackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackStatus::Playing => write!(f, "Playing"),
            PlaybackStatus::Paused => write!(f, "Paused"),
            PlaybackStatus::Stopped => write!(f, "Stopped"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub enum LoopStatus {
    #[default]
    None,
    Track,
    Playlist,
}

impl fmt::Display for LoopStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoopStatus::None => write!(f, "None"),
            LoopStatus::Track => write!(f, "Track"),
            LoopStatus::Playlist => write!(f, "Playlist"),
        }
    }
}

/// Properties of `org.mpris.MediaPlayer2.Player`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum PropertyName {
    PlaybackStatus,
    LoopStatus,
    Rate,
    Shuffle,
    Metadata,
    Volume,
    Position,
    MinimumRate,
    MaximumRate,
    CanGoNext,
    CanGoPrevious,
    CanPlay,
    CanPause,
    CanSeek,
    CanControl,
}

impl PropertyName {
    pub const ALL: [PropertyName; 15] = [
        PropertyName::PlaybackStatus,
        PropertyName::LoopStatus,
        PropertyName::Rate,
        PropertyName::Shuffle,
        PropertyName::Metadata,
        PropertyName::Volume,
        PropertyName::Position,
        PropertyName::MinimumRate,
        PropertyName::MaximumRate,
        PropertyName::CanGoNext,
        PropertyName::CanGoPrevious,
        PropertyName::CanPlay,
        PropertyName::CanPause,
        PropertyName::CanSeek,
        PropertyName::CanControl,
    ];

    /// Position moves on its own; clients extrapolate it and re-sync on `Seeked`.
    /// CanControl may never change while the object is exported.
    pub fn emits_change(&self) -> bool {
        !matches!(self, PropertyName::Position | PropertyName::CanControl)
    }
}

impl fmt::Display for PropertyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// `Metadata` property contents. Lengths are in microseconds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TrackMetadata {
    pub track_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub art_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
}

/// One value per property type of the MPRIS player schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Status(PlaybackStatus),
    Loop(LoopStatus),
    Float(f64),
    Int(i64),
    Bool(bool),
    Metadata(TrackMetadata),
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Status(status) => write!(f, "{status}"),
            PropertyValue::Loop(status) => write!(f, "{status}"),
            PropertyValue::Float(value) => write!(f, "{value}"),
            PropertyValue::Int(value) => write!(f, "{value}"),
            PropertyValue::Bool(value) => write!(f, "{value}"),
            PropertyValue::Metadata(metadata) => match &metadata.title {
                Some(title) => write!(f, "{title} ({})", metadata.track_id),
                None => write!(f, "({})", metadata.track_id),
            },
        }
    }
}

/// Verbs understood by the player adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerCommand {
    Next,
    Previous,
    Play,
    Pause,
    Unpause,
    Stop,
    Exit,
    SeekRelative(i64),
    SeekAbsolute(i64),
    SetVolume(u8),
    SetShuffle(bool),
    SetRepeat(bool),
}

impl fmt::Display for PlayerCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerCommand::Next => write!(f, "next"),
            PlayerCommand::Previous => write!(f, "previous"),
            PlayerCommand::Play => write!(f, "play"),
            PlayerCommand::Pause => write!(f, "pause"),
            PlayerCommand::Unpause => write!(f, "unpause"),
            PlayerCommand::Stop => write!(f, "stop"),
            PlayerCommand::Exit => write!(f, "exit"),
            PlayerCommand::SeekRelative(seconds) => write!(f, "seek {seconds:+}s"),
            PlayerCommand::SeekAbsolute(seconds) => write!(f, "jump {seconds}s"),
            PlayerCommand::SetVolume(volume) => write!(f, "volume {volume}"),
            PlayerCommand::SetShuffle(on) => write!(f, "shuffle {}", on_off(*on)),
            PlayerCommand::SetRepeat(on) => write!(f, "repeat {}", on_off(*on)),
        }
    }
}

fn on_off(on: bool) -> &'static str {
    if on { "on" } else { "off" }
}
