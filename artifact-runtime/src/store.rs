//! Versioned property store with change notification.
//!
//! Properties live in a `HashMap` behind a `RwLock`. Each property owns a
//! broadcast channel for its own watchers; every update is also published
//! on the artifact-wide [`EventBus`]. Both sends happen while the write
//! lock is held, so a watcher sees one property's versions in order.

use crate::bus::EventBus;
use crate::config::MAX_CAPACITY;
use artifact_core::{ArtifactEvent, PropertyError, PropertySnapshot, PropertyUpdate, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::{RwLock, broadcast};

struct PropertyCell {
    snapshot: PropertySnapshot,
    watchers: broadcast::Sender<PropertyUpdate>,
}

/// The observable properties of one artifact.
///
/// Reads take the read lock and clone the value together with its version,
/// so they never observe a torn pair. Callers are expected to serialize
/// writers; [`Artifact`](crate::Artifact) does so with its guard.
pub struct PropertyStore {
    cells: RwLock<HashMap<String, PropertyCell>>,
    bus: Arc<EventBus>,
    watch_capacity: usize,
}

impl PropertyStore {
    /// Create an empty store publishing updates on `bus`. The watch
    /// capacity is clamped to `1..=MAX_CAPACITY`.
    pub fn new(bus: Arc<EventBus>, watch_capacity: usize) -> Self {
        Self {
            cells: RwLock::new(HashMap::new()),
            bus,
            watch_capacity: watch_capacity.clamp(1, MAX_CAPACITY),
        }
    }

    /// Define a property at version 0. Defining is not updating, so
    /// nobody is notified.
    pub async fn define(&self, name: &str, initial: Value) -> Result<(), PropertyError> {
        let mut cells = self.cells.write().await;
        if cells.contains_key(name) {
            return Err(PropertyError::Duplicate(name.to_string()));
        }
        let (watchers, _) = broadcast::channel(self.watch_capacity);
        cells.insert(
            name.to_string(),
            PropertyCell {
                snapshot: PropertySnapshot::new(initial, 0),
                watchers,
            },
        );
        tracing::debug!(property = name, "artifact.property.define");
        Ok(())
    }

    /// Read the latest committed value and its version.
    pub async fn get(&self, name: &str) -> Result<PropertySnapshot, PropertyError> {
        let cells = self.cells.read().await;
        cells
            .get(name)
            .map(|cell| cell.snapshot.clone())
            .ok_or_else(|| PropertyError::Unknown(name.to_string()))
    }

    /// Replace a property's value, bump its version, and notify.
    pub async fn update(&self, name: &str, value: Value) -> Result<PropertyUpdate, PropertyError> {
        let mut cells = self.cells.write().await;
        let cell = cells
            .get_mut(name)
            .ok_or_else(|| PropertyError::Unknown(name.to_string()))?;

        cell.snapshot.version += 1;
        cell.snapshot.value = value;
        let update = PropertyUpdate {
            name: name.to_string(),
            value: cell.snapshot.value.clone(),
            version: cell.snapshot.version,
        };

        // Nobody watching is fine.
        let _ = cell.watchers.send(update.clone());
        self.bus.publish(ArtifactEvent::PropertyUpdated(update.clone()));

        tracing::debug!(
            property = name,
            version = update.version,
            value = %update.value,
            "artifact.property.update"
        );
        Ok(update)
    }

    /// Names of all defined properties, sorted.
    pub async fn names(&self) -> Vec<String> {
        let cells = self.cells.read().await;
        let mut names: Vec<String> = cells.keys().cloned().collect();
        names.sort();
        names
    }

    /// Snapshot every property under one read lock.
    pub async fn snapshot_all(&self) -> BTreeMap<String, PropertySnapshot> {
        let cells = self.cells.read().await;
        cells
            .iter()
            .map(|(name, cell)| (name.clone(), cell.snapshot.clone()))
            .collect()
    }

    /// Subscribe to updates of one property, starting after its current version.
    pub async fn watch(&self, name: &str) -> Result<PropertyWatch, PropertyError> {
        let cells = self.cells.read().await;
        let cell = cells
            .get(name)
            .ok_or_else(|| PropertyError::Unknown(name.to_string()))?;
        Ok(PropertyWatch {
            name: name.to_string(),
            receiver: cell.watchers.subscribe(),
        })
    }

    /// Drop every property. Open watches see the end of their stream.
    pub(crate) async fn clear(&self) {
        self.cells.write().await.clear();
    }
}

/// A stream of updates to one property.
pub struct PropertyWatch {
    name: String,
    receiver: broadcast::Receiver<PropertyUpdate>,
}

impl PropertyWatch {
    /// The property being watched.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Wait for the next update.
    ///
    /// Returns `None` once the property is gone. If this watch fell behind,
    /// the missed updates are skipped and the oldest buffered one is returned.
    pub async fn recv(&mut self) -> Option<PropertyUpdate> {
        loop {
            match self.receiver.recv().await {
                Ok(update) => return Some(update),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(property = %self.name, skipped, "artifact.watch.lagged");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Take the next buffered update without waiting.
    pub fn try_recv(&mut self) -> Option<PropertyUpdate> {
        loop {
            match self.receiver.try_recv() {
                Ok(update) => return Some(update),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(property = %self.name, skipped, "artifact.watch.lagged");
                }
                Err(_) => return None,
            }
        }
    }
}
