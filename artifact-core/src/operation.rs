//! The Operation protocol — named units of work that run under the guard.

use crate::error::{OperationError, PropertyError};
use crate::event::PropertySnapshot;
use crate::id::ArtifactId;
use crate::value::{Value, ValueKind};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One declared parameter of an operation or template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamSpec {
    /// Parameter name, for error messages and introspection.
    pub name: String,
    /// The kind an argument in this position must have.
    pub kind: ValueKind,
}

impl ParamSpec {
    /// Create a new parameter spec.
    pub fn new(name: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Check positional arguments against a parameter list.
///
/// Returns a human-readable reason on mismatch.
pub fn check_params(params: &[ParamSpec], args: &[Value]) -> Result<(), String> {
    if params.len() != args.len() {
        return Err(format!(
            "expected {} argument(s), got {}",
            params.len(),
            args.len()
        ));
    }
    for (spec, arg) in params.iter().zip(args) {
        if spec.kind != arg.kind() {
            return Err(format!(
                "parameter {} expects {}, got {}",
                spec.name,
                spec.kind,
                arg.kind()
            ));
        }
    }
    Ok(())
}

/// The shape of an operation as seen by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationSignature {
    /// Operation name, unique within an artifact.
    pub name: String,
    /// Positional parameters.
    pub params: Vec<ParamSpec>,
    /// Kind of the feedback value, if the operation hands one back.
    pub feedback: Option<ValueKind>,
}

impl OperationSignature {
    /// A signature with no parameters and no feedback.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            feedback: None,
        }
    }

    /// Append a parameter.
    pub fn param(mut self, name: impl Into<String>, kind: ValueKind) -> Self {
        self.params.push(ParamSpec::new(name, kind));
        self
    }

    /// Declare the feedback kind.
    pub fn feedback(mut self, kind: ValueKind) -> Self {
        self.feedback = Some(kind);
        self
    }

    /// Check arguments against this signature.
    pub fn check_args(&self, args: &[Value]) -> Result<(), String> {
        check_params(&self.params, args)
    }
}

/// What an operation body (or a template's `init`) can do to its artifact.
///
/// A context only exists while the artifact's guard is held, so every
/// write made through it is serialized with every other write.
#[async_trait]
pub trait OperationContext: Send + Sync {
    /// The artifact this context belongs to.
    fn artifact_id(&self) -> &ArtifactId;

    /// Define a new property at version 0. Does not notify.
    async fn define(&mut self, name: &str, initial: Value) -> Result<(), PropertyError>;

    /// Read a property.
    async fn get(&self, name: &str) -> Result<PropertySnapshot, PropertyError>;

    /// Replace a property's value and notify. Returns the new version.
    async fn update(&mut self, name: &str, value: Value) -> Result<u64, PropertyError>;

    /// Emit a signal. Never blocks.
    fn emit(&mut self, signal: &str);

    /// Hand a value back to the caller. At most once per invocation.
    fn set_feedback(&mut self, value: Value) -> Result<(), OperationError>;

    /// Read a property that must hold an integer.
    async fn get_int(&self, name: &str) -> Result<i64, OperationError> {
        let snapshot = self.get(name).await?;
        snapshot.value.as_int().ok_or_else(|| {
            OperationError::Failed(format!(
                "property {name} holds {}, not an int",
                snapshot.value.kind()
            ))
        })
    }
}

/// A named, synchronous-from-the-caller's-view unit of work.
///
/// Arguments have already been checked against [`Operation::signature`]
/// when `execute` is called. Bodies run to completion while holding the
/// artifact's guard; anything they commit before returning an error stays
/// committed.
#[async_trait]
pub trait Operation: Send + Sync {
    /// Name, parameters, and feedback kind.
    fn signature(&self) -> &OperationSignature;

    /// Run the body.
    async fn execute(
        &self,
        ctx: &mut dyn OperationContext,
        args: &[Value],
    ) -> Result<(), OperationError>;
}
