//! Artifact-wide event stream.

use crate::config::MAX_CAPACITY;
use artifact_core::ArtifactEvent;
use std::sync::{PoisonError, RwLock};
use tokio::sync::broadcast;

/// Broadcasts every property update and signal of one artifact.
///
/// Sending never blocks. A subscriber that falls more than `capacity`
/// events behind misses the oldest ones. Closing the bus drops the sender,
/// so subscribers drain what is buffered and then see the end of the stream.
pub struct EventBus {
    sender: RwLock<Option<broadcast::Sender<ArtifactEvent>>>,
}

impl EventBus {
    /// Create a bus buffering up to `capacity` events per subscriber,
    /// clamped to `1..=MAX_CAPACITY`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.clamp(1, MAX_CAPACITY));
        Self {
            sender: RwLock::new(Some(sender)),
        }
    }

    /// Publish an event. Returns how many subscribers it reached.
    pub fn publish(&self, event: ArtifactEvent) -> usize {
        let sender = self.sender.read().unwrap_or_else(PoisonError::into_inner);
        match sender.as_ref() {
            // No subscribers is not an error.
            Some(tx) => tx.send(event).unwrap_or(0),
            None => 0,
        }
    }

    /// Subscribe to events published from now on.
    ///
    /// On a closed bus the returned receiver is already at its end.
    pub fn subscribe(&self) -> broadcast::Receiver<ArtifactEvent> {
        let sender = self.sender.read().unwrap_or_else(PoisonError::into_inner);
        match sender.as_ref() {
            Some(tx) => tx.subscribe(),
            None => broadcast::channel(1).1,
        }
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        let sender = self.sender.read().unwrap_or_else(PoisonError::into_inner);
        sender.as_ref().map_or(0, broadcast::Sender::receiver_count)
    }

    /// Drop the sender. Publishing afterwards is a no-op.
    pub fn close(&self) {
        self.sender
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }

    /// Whether [`EventBus::close`] has been called.
    pub fn is_closed(&self) -> bool {
        self.sender
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }
}
