use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{PropertyName, PropertyValue};
use crate::properties::{PropertyComputer, PropertySet, SharedProperties};
use crate::state::{StateCache, StatusError};

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("{name} cannot carry {value:?}")]
    Schema {
        name: PropertyName,
        value: PropertyValue,
    },
    #[error("bus error: {0}")]
    Bus(String),
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Status(#[from] StatusError),
    #[error(transparent)]
    Publish(#[from] PublishError),
}

/// Receiver of property change notifications.
#[async_trait]
pub trait PropertyPublisher: Send + Sync {
    async fn property_changed(
        &self,
        name: PropertyName,
        value: &PropertyValue,
    ) -> Result<(), PublishError>;

    async fn seeked(&self, position: i64) -> Result<(), PublishError>;
}

/// Refreshes the state cache, diffs the derived properties against the last
/// published ones and notifies only what changed.
pub struct SyncEngine {
    cache: StateCache,
    computer: PropertyComputer,
    published: SharedProperties,
    publisher: Box<dyn PropertyPublisher>,
}

impl SyncEngine {
    pub fn new(
        cache: StateCache,
        computer: PropertyComputer,
        published: SharedProperties,
        publisher: Box<dyn PropertyPublisher>,
    ) -> Self {
        Self {
            cache,
            computer,
            published,
            publisher,
        }
    }

    /// One refresh, derive, diff, publish pass. Returns the number of change
    /// notifications sent.
    ///
    /// A failing refresh aborts before anything is published. A property whose
    /// notification fails keeps its old published value, so the next pass
    /// retries it.
    pub async fn sync_once(&self) -> Result<usize, SyncError> {
        self.cache.refresh().await?;
        let current = self.current();
        let changes: Vec<(PropertyName, PropertyValue)> = self.published.read(|published| {
            current
                .iter()
                .filter(|(name, value)| published.get(*name) != Some(*value))
                .map(|(name, value)| (name, value.clone()))
                .collect()
        });

        let mut notified = 0;
        let mut failure = None;
        for (name, value) in changes {
            if name.emits_change() {
                if let Err(e) = self.publisher.property_changed(name, &value).await {
                    warn!("Failed to publish {name}: {e}");
                    failure.get_or_insert(e);
                    continue;
                }
                debug!("{name} changed to {value}");
                notified += 1;
            }
            self.published.update(name, value);
        }

        match failure {
            Some(e) => Err(e.into()),
            None => Ok(notified),
        }
    }

    /// Properties derived from the cache as it stands, without refreshing.
    pub fn current(&self) -> PropertySet {
        self.cache.with_snapshot(|snapshot| self.computer.compute(snapshot))
    }

    pub fn cache(&self) -> &StateCache {
        &self.cache
    }

    pub fn published(&self) -> &SharedProperties {
        &self.published
    }

    pub async fn seeked(&self, position: i64) -> Result<(), PublishError> {
        debug!("Seeked to {position}us");
        self.publisher.seeked(position).await
    }
}

/// Fill the published set from a first refresh, before anything listens.
pub async fn prime(
    cache: &StateCache,
    computer: &PropertyComputer,
    published: &SharedProperties,
) -> Result<(), StatusError> {
    cache.refresh().await?;
    let current = cache.with_snapshot(|snapshot| computer.compute(snapshot));
    for (name, value) in current.iter() {
        published.update(name, value.clone());
    }
    Ok(())
}
