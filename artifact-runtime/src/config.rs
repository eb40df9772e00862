//! Configuration for an Artifact.

use serde::{Deserialize, Serialize};

/// Largest buffer size accepted for any event or watch stream.
pub const MAX_CAPACITY: usize = 1 << 20;

/// Static configuration for an [`Artifact`](crate::Artifact) instance.
///
/// Capacities bound how far a subscriber may fall behind before it starts
/// missing events. Emitters never wait on subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactConfig {
    /// Buffer size of the artifact-wide event stream.
    pub event_capacity: usize,

    /// Buffer size of each per-property watch stream.
    pub watch_capacity: usize,
}

impl ArtifactConfig {
    /// Set the artifact-wide event buffer size, clamped to `1..=MAX_CAPACITY`.
    #[must_use]
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity.clamp(1, MAX_CAPACITY);
        self
    }

    /// Set the per-property watch buffer size, clamped to `1..=MAX_CAPACITY`.
    #[must_use]
    pub fn with_watch_capacity(mut self, capacity: usize) -> Self {
        self.watch_capacity = capacity.clamp(1, MAX_CAPACITY);
        self
    }

    /// Check that both capacities lie in `1..=MAX_CAPACITY`.
    ///
    /// Deserialized configs bypass the clamping setters, so
    /// [`Artifact::create_with_config`](crate::Artifact::create_with_config)
    /// calls this before building any channel.
    pub fn validate(&self) -> Result<(), String> {
        for (field, capacity) in [
            ("event_capacity", self.event_capacity),
            ("watch_capacity", self.watch_capacity),
        ] {
            if !(1..=MAX_CAPACITY).contains(&capacity) {
                return Err(format!(
                    "{field} must be between 1 and {MAX_CAPACITY}, got {capacity}"
                ));
            }
        }
        Ok(())
    }
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            event_capacity: 256,
            watch_capacity: 64,
        }
    }
}
