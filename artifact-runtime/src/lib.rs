#![deny(missing_docs)]
//! In-process runtime for artifact-core.
//!
//! An [`Artifact`] owns a [`PropertyStore`], a [`SignalChannel`], and an
//! [`OperationRegistry`], all behind one exclusive guard. Property updates
//! and signals go out on a single [`EventBus`] built on
//! `tokio::sync::broadcast`, so emitters never wait on subscribers and
//! subscribers see effects in the order they happened.

mod artifact;
mod bus;
mod config;
mod context;
mod registry;
mod signal;
mod store;
mod tracing_observer;

pub use artifact::Artifact;
pub use bus::EventBus;
pub use config::{ArtifactConfig, MAX_CAPACITY};
pub use registry::OperationRegistry;
pub use signal::{SignalChannel, SignalSubscription};
pub use store::{PropertyStore, PropertyWatch};
pub use tracing_observer::TracingObserver;
