//! The Observer interface — outbound callbacks from an artifact to its host.

use crate::error::ObserverError;
use crate::event::{ArtifactEvent, PropertyUpdate, Signal};
use crate::id::ArtifactId;
use async_trait::async_trait;

/// Receives property updates and signals from one or more artifacts.
///
/// Observers are driven from their own task, never from inside an
/// operation body, so a slow observer cannot stall the artifact. It can
/// fall behind, in which case it misses events.
///
/// Returning an error does NOT stop delivery; the runtime logs it and
/// moves on to the next event.
#[async_trait]
pub trait Observer: Send + Sync {
    /// A property changed.
    async fn on_property_update(
        &self,
        artifact: &ArtifactId,
        update: &PropertyUpdate,
    ) -> Result<(), ObserverError>;

    /// A signal was emitted.
    async fn on_signal(&self, artifact: &ArtifactId, signal: &Signal)
    -> Result<(), ObserverError>;

    /// Route an event to the matching callback.
    async fn on_event(
        &self,
        artifact: &ArtifactId,
        event: &ArtifactEvent,
    ) -> Result<(), ObserverError> {
        match event {
            ArtifactEvent::PropertyUpdated(update) => {
                self.on_property_update(artifact, update).await
            }
            ArtifactEvent::Signal(signal) => self.on_signal(artifact, signal).await,
        }
    }
}
