//! Concrete [`Observer`] using the [`tracing`] crate.
//!
//! Emits one structured `tracing` event per property update and signal.
//! Wire to any `tracing`-compatible subscriber.

use artifact_core::{ArtifactId, Observer, ObserverError, PropertyUpdate, Signal};
use async_trait::async_trait;

/// An [`Observer`] that emits structured [`tracing`] events.
///
/// Never fails. Both callbacks log at `DEBUG`.
///
/// # Example
///
/// ```no_run
/// use artifact_runtime::TracingObserver;
/// use std::sync::Arc;
///
/// let observer = Arc::new(TracingObserver::new());
/// // artifact.attach(observer);
/// ```
pub struct TracingObserver;

impl TracingObserver {
    /// Create a new `TracingObserver`.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Observer for TracingObserver {
    async fn on_property_update(
        &self,
        artifact: &ArtifactId,
        update: &PropertyUpdate,
    ) -> Result<(), ObserverError> {
        tracing::debug!(
            artifact = %artifact,
            property = %update.name,
            value = %update.value,
            version = update.version,
            "artifact.observed.update"
        );
        Ok(())
    }

    async fn on_signal(&self, artifact: &ArtifactId, signal: &Signal) -> Result<(), ObserverError> {
        tracing::debug!(artifact = %artifact, signal = %signal.name, "artifact.observed.signal");
        Ok(())
    }
}
