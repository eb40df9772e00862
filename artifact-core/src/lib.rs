//! # artifact-core — Protocol types for observable shared-state artifacts
//!
//! An artifact is a stateful object that many callers share. It exposes
//! observable properties that anyone can read and subscribe to, and
//! operations that callers invoke to change them. Operations may also
//! emit signals, which are events that leave no state behind.
//!
//! ## The pieces
//!
//! | Piece | Types | What it does |
//! |-------|-------|-------------|
//! | Values | [`Value`], [`ValueKind`] | Everything crossing the host boundary |
//! | Properties | [`PropertySnapshot`], [`PropertyUpdate`] | Versioned, observable state |
//! | Signals | [`Signal`] | Stateless events |
//! | Operations | [`Operation`], [`OperationContext`], [`OperationSignature`] | Guarded units of work |
//! | Templates | [`ArtifactTemplate`] | Initial properties plus operations |
//! | Observers | [`Observer`] | Outbound callbacks to the host |
//!
//! This crate only defines the protocol. `artifact-runtime` implements it.

#![deny(missing_docs)]

pub mod error;
pub mod event;
pub mod id;
pub mod observer;
pub mod operation;
pub mod template;
pub mod value;

#[cfg(feature = "test-utils")]
pub mod test_utils;

// Re-exports for convenience
pub use error::{ArtifactError, InvokeError, ObserverError, OperationError, PropertyError};
pub use event::{ArtifactEvent, Invocation, PropertySnapshot, PropertyUpdate, Signal};
pub use id::ArtifactId;
pub use observer::Observer;
pub use operation::{
    Operation, OperationContext, OperationSignature, ParamSpec, check_params,
};
pub use template::ArtifactTemplate;
pub use value::{Value, ValueKind};
