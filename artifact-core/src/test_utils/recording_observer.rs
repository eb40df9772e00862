//! RecordingObserver — records every callback for later inspection.

use crate::error::ObserverError;
use crate::event::{PropertyUpdate, Signal};
use crate::id::ArtifactId;
use crate::observer::Observer;
use async_trait::async_trait;
use std::sync::Mutex;

/// A recorded observer callback.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedEvent {
    /// `on_property_update` fired.
    Update {
        /// The artifact that published it.
        artifact: ArtifactId,
        /// The update.
        update: PropertyUpdate,
    },
    /// `on_signal` fired.
    Signal {
        /// The artifact that published it.
        artifact: ArtifactId,
        /// The signal name.
        name: String,
    },
}

/// An observer that records every callback and never fails.
/// Use `.events()` to inspect what was recorded.
pub struct RecordingObserver {
    events: Mutex<Vec<RecordedEvent>>,
}

impl RecordingObserver {
    /// Create a new empty recorder.
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    /// Return a snapshot of all recorded events.
    pub fn events(&self) -> Vec<RecordedEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Names of the recorded signals, in order.
    pub fn signal_names(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| match e {
                RecordedEvent::Signal { name, .. } => Some(name.clone()),
                RecordedEvent::Update { .. } => None,
            })
            .collect()
    }
}

impl Default for RecordingObserver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Observer for RecordingObserver {
    async fn on_property_update(
        &self,
        artifact: &ArtifactId,
        update: &PropertyUpdate,
    ) -> Result<(), ObserverError> {
        self.events.lock().unwrap().push(RecordedEvent::Update {
            artifact: artifact.clone(),
            update: update.clone(),
        });
        Ok(())
    }

    async fn on_signal(
        &self,
        artifact: &ArtifactId,
        signal: &Signal,
    ) -> Result<(), ObserverError> {
        self.events.lock().unwrap().push(RecordedEvent::Signal {
            artifact: artifact.clone(),
            name: signal.name.clone(),
        });
        Ok(())
    }
}
