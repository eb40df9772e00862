//! Error types for each part of the artifact protocol.

use crate::event::ArtifactEvent;
use crate::value::ValueKind;
use thiserror::Error;

/// Property store errors.
#[non_exhaustive]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PropertyError {
    /// A property with this name is already defined.
    #[error("property already defined: {0}")]
    Duplicate(String),

    /// No property with this name is defined.
    #[error("unknown property: {0}")]
    Unknown(String),
}

/// Faults raised inside an operation body or an `init`.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum OperationError {
    /// A property read, update, or define failed.
    #[error(transparent)]
    Property(#[from] PropertyError),

    /// The feedback value was already set during this invocation.
    #[error("feedback already set")]
    FeedbackAlreadySet,

    /// The feedback value doesn't match the declared kind.
    #[error("feedback kind mismatch: expected {expected:?}, got {actual}")]
    FeedbackKind {
        /// The declared feedback kind, or `None` if the operation declares none.
        expected: Option<ValueKind>,
        /// The kind that was supplied.
        actual: ValueKind,
    },

    /// The body gave up with a message.
    #[error("{0}")]
    Failed(String),

    /// Catch-all. Include context.
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Errors returned to the host from `invoke`.
///
/// None of these leave the artifact unusable; the guard is always
/// released before the error is returned.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum InvokeError {
    /// No operation with this name is registered.
    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    /// The arguments don't match the operation's signature.
    /// The caller may retry with corrected arguments.
    #[error("argument mismatch for {operation}: {reason}")]
    ArgumentMismatch {
        /// The operation that was invoked.
        operation: String,
        /// What didn't match.
        reason: String,
    },

    /// The body failed. Effects in `applied` were already committed
    /// and are not rolled back.
    #[error("operation {operation} failed: {source}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// Effects committed before the failure.
        applied: Vec<ArtifactEvent>,
        /// The underlying fault.
        #[source]
        source: OperationError,
    },

    /// The artifact has been disposed.
    #[error("artifact disposed: {0}")]
    Disposed(String),
}

/// Errors creating an artifact.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// The template registers two operations under one name.
    #[error("duplicate operation: {0}")]
    DuplicateOperation(String),

    /// The init parameters don't match the template.
    #[error("invalid init params for {kind}: {reason}")]
    InvalidParams {
        /// The template kind.
        kind: String,
        /// What didn't match.
        reason: String,
    },

    /// The runtime configuration is out of range.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// The template's `init` failed or panicked.
    #[error("init failed for {kind}: {source}")]
    Init {
        /// The template kind.
        kind: String,
        /// The underlying fault.
        #[source]
        source: OperationError,
    },
}

/// Observer errors. These are logged but never stop delivery
/// and never reach the artifact.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ObserverError {
    /// The observer callback failed.
    #[error("observer failed: {0}")]
    Failed(String),

    /// Catch-all.
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}
