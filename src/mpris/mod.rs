//! `org.mpris.MediaPlayer2` and `org.mpris.MediaPlayer2.Player` on the session bus.
//!
//! Getters answer from the last published property set; methods and property
//! writes are forwarded to the daemon loop and wait for its answer.

use async_trait::async_trait;
use mpris_server::zbus::{self, fdo};
use mpris_server::{
    LoopStatus as BusLoopStatus, Metadata, PlaybackRate, PlaybackStatus as BusPlaybackStatus,
    PlayerInterface, Property, RootInterface, Server, Signal, Time, TrackId, Volume,
};
use tracing::{debug, info};

use crate::daemon::{BridgeCommand, CommandHandle};
use crate::models::{LoopStatus, PlaybackStatus, PropertyName, PropertyValue, TrackMetadata};
use crate::properties::{PropertySet, SharedProperties};
use crate::publish::{PropertyPublisher, PublishError};

pub struct MprisPlayer {
    identity: String,
    commands: CommandHandle,
    properties: SharedProperties,
}

impl MprisPlayer {
    pub fn new(
        identity: impl Into<String>,
        commands: CommandHandle,
        properties: SharedProperties,
    ) -> Self {
        Self {
            identity: identity.into(),
            commands,
            properties,
        }
    }

    async fn dispatch(&self, command: BridgeCommand) -> fdo::Result<()> {
        self.commands
            .send(command)
            .await
            .map_err(|e| fdo::Error::Failed(e.to_string()))
    }

    async fn write(&self, command: BridgeCommand) -> zbus::Result<()> {
        self.dispatch(command).await.map_err(zbus::Error::from)
    }

    fn read<R>(&self, f: impl FnOnce(&PropertySet) -> R) -> fdo::Result<R> {
        Ok(self.properties.read(f))
    }
}

impl RootInterface for MprisPlayer {
    async fn raise(&self) -> fdo::Result<()> {
        Ok(())
    }

    async fn quit(&self) -> fdo::Result<()> {
        info!("Quit requested over the bus");
        self.dispatch(BridgeCommand::Quit).await
    }

    async fn can_quit(&self) -> fdo::Result<bool> {
        Ok(true)
    }

    async fn fullscreen(&self) -> fdo::Result<bool> {
        Ok(false)
    }

    async fn set_fullscreen(&self, _fullscreen: bool) -> zbus::Result<()> {
        Ok(())
    }

    async fn can_set_fullscreen(&self) -> fdo::Result<bool> {
        Ok(false)
    }

    async fn can_raise(&self) -> fdo::Result<bool> {
        Ok(false)
    }

    async fn has_track_list(&self) -> fdo::Result<bool> {
        Ok(false)
    }

    async fn identity(&self) -> fdo::Result<String> {
        Ok(self.identity.clone())
    }

    async fn desktop_entry(&self) -> fdo::Result<String> {
        Ok(String::new())
    }

    async fn supported_uri_schemes(&self) -> fdo::Result<Vec<String>> {
        Ok(Vec::new())
    }

    async fn supported_mime_types(&self) -> fdo::Result<Vec<String>> {
        Ok(Vec::new())
    }
}

impl PlayerInterface for MprisPlayer {
    async fn next(&self) -> fdo::Result<()> {
        self.dispatch(BridgeCommand::Next).await
    }

    async fn previous(&self) -> fdo::Result<()> {
        self.dispatch(BridgeCommand::Previous).await
    }

    async fn pause(&self) -> fdo::Result<()> {
        self.dispatch(BridgeCommand::Pause).await
    }

    async fn play_pause(&self) -> fdo::Result<()> {
        self.dispatch(BridgeCommand::PlayPause).await
    }

    async fn stop(&self) -> fdo::Result<()> {
        self.dispatch(BridgeCommand::Stop).await
    }

    async fn play(&self) -> fdo::Result<()> {
        self.dispatch(BridgeCommand::Play).await
    }

    async fn seek(&self, offset: Time) -> fdo::Result<()> {
        self.dispatch(BridgeCommand::Seek {
            offset: offset.as_micros(),
        })
        .await
    }

    async fn set_position(&self, track_id: TrackId, position: Time) -> fdo::Result<()> {
        self.dispatch(BridgeCommand::SetPosition {
            track_id: track_id.as_str().to_string(),
            position: position.as_micros(),
        })
        .await
    }

    async fn open_uri(&self, uri: String) -> fdo::Result<()> {
        debug!("Ignoring OpenUri({uri})");
        Ok(())
    }

    async fn playback_status(&self) -> fdo::Result<BusPlaybackStatus> {
        self.read(|p| bus_playback_status(p.playback_status()))
    }

    async fn loop_status(&self) -> fdo::Result<BusLoopStatus> {
        self.read(|p| bus_loop_status(p.loop_status()))
    }

    async fn set_loop_status(&self, loop_status: BusLoopStatus) -> zbus::Result<()> {
        let status = match loop_status {
            BusLoopStatus::None => LoopStatus::None,
            BusLoopStatus::Track => LoopStatus::Track,
            BusLoopStatus::Playlist => LoopStatus::Playlist,
        };
        self.write(BridgeCommand::SetLoopStatus(status)).await
    }

    async fn rate(&self) -> fdo::Result<PlaybackRate> {
        self.read(|p| p.float(PropertyName::Rate))
    }

    async fn set_rate(&self, rate: PlaybackRate) -> zbus::Result<()> {
        self.write(BridgeCommand::SetRate(rate)).await
    }

    async fn shuffle(&self) -> fdo::Result<bool> {
        self.read(|p| p.flag(PropertyName::Shuffle))
    }

    async fn set_shuffle(&self, shuffle: bool) -> zbus::Result<()> {
        self.write(BridgeCommand::SetShuffle(shuffle)).await
    }

    async fn metadata(&self) -> fdo::Result<Metadata> {
        let metadata = self.properties.read(|p| p.metadata().cloned());
        match metadata {
            Some(metadata) => {
                bus_metadata(&metadata).map_err(|e| fdo::Error::Failed(e.to_string()))
            }
            None => Ok(Metadata::new()),
        }
    }

    async fn volume(&self) -> fdo::Result<Volume> {
        self.read(|p| p.float(PropertyName::Volume))
    }

    async fn set_volume(&self, volume: Volume) -> zbus::Result<()> {
        self.write(BridgeCommand::SetVolume(volume)).await
    }

    async fn position(&self) -> fdo::Result<Time> {
        self.read(|p| Time::from_micros(p.int(PropertyName::Position)))
    }

    async fn minimum_rate(&self) -> fdo::Result<PlaybackRate> {
        self.read(|p| p.float(PropertyName::MinimumRate))
    }

    async fn maximum_rate(&self) -> fdo::Result<PlaybackRate> {
        self.read(|p| p.float(PropertyName::MaximumRate))
    }

    async fn can_go_next(&self) -> fdo::Result<bool> {
        self.read(|p| p.flag(PropertyName::CanGoNext))
    }

    async fn can_go_previous(&self) -> fdo::Result<bool> {
        self.read(|p| p.flag(PropertyName::CanGoPrevious))
    }

    async fn can_play(&self) -> fdo::Result<bool> {
        self.read(|p| p.flag(PropertyName::CanPlay))
    }

    async fn can_pause(&self) -> fdo::Result<bool> {
        self.read(|p| p.flag(PropertyName::CanPause))
    }

    async fn can_seek(&self) -> fdo::Result<bool> {
        self.read(|p| p.flag(PropertyName::CanSeek))
    }

    async fn can_control(&self) -> fdo::Result<bool> {
        self.read(|p| p.flag(PropertyName::CanControl))
    }
}

/// Sends `PropertiesChanged` and `Seeked` through the exported server.
pub struct MprisPublisher {
    server: Server<MprisPlayer>,
}

impl MprisPublisher {
    /// Claim `org.mpris.MediaPlayer2.<name>` and export both interfaces.
    pub async fn export(name: &str, player: MprisPlayer) -> Result<Self, PublishError> {
        let server = Server::new(name, player).await.map_err(bus_error)?;
        info!("Exported org.mpris.MediaPlayer2.{name}");
        Ok(Self { server })
    }
}

#[async_trait]
impl PropertyPublisher for MprisPublisher {
    async fn property_changed(
        &self,
        name: PropertyName,
        value: &PropertyValue,
    ) -> Result<(), PublishError> {
        let property = bus_property(name, value)?;
        self.server
            .properties_changed([property])
            .await
            .map_err(bus_error)
    }

    async fn seeked(&self, position: i64) -> Result<(), PublishError> {
        self.server
            .emit(Signal::Seeked {
                position: Time::from_micros(position),
            })
            .await
            .map_err(bus_error)
    }
}

fn bus_error(e: zbus::Error) -> PublishError {
    PublishError::Bus(e.to_string())
}

fn bus_playback_status(status: PlaybackStatus) -> BusPlaybackStatus {
    match status {
        PlaybackStatus::Playing => BusPlaybackStatus::Playing,
        PlaybackStatus::Paused => BusPlaybackStatus::Paused,
        PlaybackStatus::Stopped => BusPlaybackStatus::Stopped,
    }
}

fn bus_loop_status(status: LoopStatus) -> BusLoopStatus {
    match status {
        LoopStatus::None => BusLoopStatus::None,
        LoopStatus::Track => BusLoopStatus::Track,
        LoopStatus::Playlist => BusLoopStatus::Playlist,
    }
}

fn bus_metadata(metadata: &TrackMetadata) -> Result<Metadata, PublishError> {
    let track_id =
        TrackId::try_from(metadata.track_id.as_str()).map_err(|_| PublishError::Schema {
            name: PropertyName::Metadata,
            value: PropertyValue::Metadata(metadata.clone()),
        })?;

    let mut out = Metadata::new();
    out.set_trackid(Some(track_id));
    out.set_length(metadata.length.map(Time::from_micros));
    out.set_url(metadata.url.clone());
    out.set_art_url(metadata.art_url.clone());
    out.set_title(metadata.title.clone());
    out.set_artist(metadata.artist.clone().map(|artist| vec![artist]));
    out.set_album(metadata.album.clone());
    Ok(out)
}

/// Match a value against the property's type in the MPRIS schema.
pub fn bus_property(name: PropertyName, value: &PropertyValue) -> Result<Property, PublishError> {
    let property = match (name, value) {
        (PropertyName::PlaybackStatus, PropertyValue::Status(status)) => {
            Property::PlaybackStatus(bus_playback_status(*status))
        }
        (PropertyName::LoopStatus, PropertyValue::Loop(status)) => {
            Property::LoopStatus(bus_loop_status(*status))
        }
        (PropertyName::Rate, PropertyValue::Float(rate)) => Property::Rate(*rate),
        (PropertyName::MinimumRate, PropertyValue::Float(rate)) => Property::MinimumRate(*rate),
        (PropertyName::MaximumRate, PropertyValue::Float(rate)) => Property::MaximumRate(*rate),
        (PropertyName::Volume, PropertyValue::Float(volume)) => Property::Volume(*volume),
        (PropertyName::Shuffle, PropertyValue::Bool(on)) => Property::Shuffle(*on),
        (PropertyName::Metadata, PropertyValue::Metadata(metadata)) => {
            Property::Metadata(bus_metadata(metadata)?)
        }
        (PropertyName::CanGoNext, PropertyValue::Bool(can)) => Property::CanGoNext(*can),
        (PropertyName::CanGoPrevious, PropertyValue::Bool(can)) => Property::CanGoPrevious(*can),
        (PropertyName::CanPlay, PropertyValue::Bool(can)) => Property::CanPlay(*can),
        (PropertyName::CanPause, PropertyValue::Bool(can)) => Property::CanPause(*can),
        (PropertyName::CanSeek, PropertyValue::Bool(can)) => Property::CanSeek(*can),
        // Position and CanControl have no change signal.
        _ => {
            return Err(PublishError::Schema {
                name,
                value: value.clone(),
            });
        }
    };
    Ok(property)
}
