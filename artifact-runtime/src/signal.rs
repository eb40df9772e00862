//! Signal channel — stateless events published next to property updates.

use crate::bus::EventBus;
use artifact_core::{ArtifactEvent, ArtifactId, Signal};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Emits signals onto an artifact's event stream.
pub struct SignalChannel {
    artifact: ArtifactId,
    bus: Arc<EventBus>,
}

impl SignalChannel {
    /// Create a channel publishing `artifact`'s signals on `bus`.
    pub fn new(artifact: ArtifactId, bus: Arc<EventBus>) -> Self {
        Self { artifact, bus }
    }

    /// Push a signal to every current subscriber without waiting on any.
    pub fn emit(&self, name: &str) -> Signal {
        let signal = Signal::new(name);
        let reached = self.bus.publish(ArtifactEvent::Signal(signal.clone()));
        tracing::debug!(
            artifact = %self.artifact,
            signal = name,
            reached,
            "artifact.signal.emit"
        );
        signal
    }

    /// Subscribe to signals only.
    pub fn subscribe(&self) -> SignalSubscription {
        SignalSubscription {
            artifact: self.artifact.clone(),
            receiver: self.bus.subscribe(),
        }
    }
}

/// A stream of the signals of one artifact, with property updates filtered out.
pub struct SignalSubscription {
    artifact: ArtifactId,
    receiver: broadcast::Receiver<ArtifactEvent>,
}

impl SignalSubscription {
    /// The artifact these signals come from.
    pub fn artifact(&self) -> &ArtifactId {
        &self.artifact
    }

    /// Wait for the next signal. Returns `None` once the artifact is disposed.
    pub async fn recv(&mut self) -> Option<Signal> {
        loop {
            match self.receiver.recv().await {
                Ok(ArtifactEvent::Signal(signal)) => return Some(signal),
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(artifact = %self.artifact, skipped, "artifact.signals.lagged");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Take the next buffered signal without waiting.
    pub fn try_recv(&mut self) -> Option<Signal> {
        loop {
            match self.receiver.try_recv() {
                Ok(ArtifactEvent::Signal(signal)) => return Some(signal),
                Ok(_) => continue,
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(artifact = %self.artifact, skipped, "artifact.signals.lagged");
                }
                Err(_) => return None,
            }
        }
    }
}
