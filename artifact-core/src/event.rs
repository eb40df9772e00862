//! Events an artifact publishes, and the result of one invocation.
//!
//! Property updates and signals share one event type so a subscriber
//! sees them interleaved in the order the operation body performed them.

use crate::value::Value;
use serde::{Deserialize, Serialize};

/// A consistent read of one property: value and version taken together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySnapshot {
    /// The committed value.
    pub value: Value,
    /// Starts at 0 on define, incremented by every update.
    pub version: u64,
}

impl PropertySnapshot {
    /// Create a new snapshot.
    pub fn new(value: Value, version: u64) -> Self {
        Self { value, version }
    }
}

/// A committed change to one property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyUpdate {
    /// The property that changed.
    pub name: String,
    /// Its new value.
    pub value: Value,
    /// Its new version.
    pub version: u64,
}

/// A stateless event. Signals carry no payload and are never stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signal {
    /// The signal name, e.g. `"tick"`.
    pub name: String,
}

impl Signal {
    /// Create a new signal.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// One observable effect of an operation.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ArtifactEvent {
    /// A property was updated.
    PropertyUpdated(PropertyUpdate),
    /// A signal was emitted.
    Signal(Signal),
}

impl ArtifactEvent {
    /// The signal name, if this event is a signal.
    pub fn signal_name(&self) -> Option<&str> {
        match self {
            ArtifactEvent::Signal(s) => Some(&s.name),
            _ => None,
        }
    }

    /// The update, if this event is a property update.
    pub fn as_update(&self) -> Option<&PropertyUpdate> {
        match self {
            ArtifactEvent::PropertyUpdated(u) => Some(u),
            _ => None,
        }
    }
}

/// The result of a successful invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Invocation {
    /// The value the body handed back, if any.
    pub feedback: Option<Value>,
    /// Effects in the order the body performed them.
    pub events: Vec<ArtifactEvent>,
}

impl Invocation {
    /// Names of the signals emitted, in order.
    pub fn signals(&self) -> Vec<&str> {
        self.events.iter().filter_map(ArtifactEvent::signal_name).collect()
    }
}
