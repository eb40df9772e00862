#![deny(missing_docs)]
//! A counter artifact.
//!
//! One observable property, `count`, and two operations:
//!
//! | Operation | Effect | Feedback |
//! |-----------|--------|----------|
//! | `inc()` | `count += 1`, then signal `tick` | none |
//! | `inc_get(delta)` | `count += delta` | the new count |
//!
//! ```no_run
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! use artifact_core::Value;
//!
//! let counter = artifact_counter::create(0).await?;
//! counter.invoke("inc", &[]).await?;
//! let result = counter.invoke("inc_get", &[Value::Int(5)]).await?;
//! assert_eq!(result.feedback, Some(Value::Int(6)));
//! # Ok(())
//! # }
//! ```

use artifact_core::{
    ArtifactError, ArtifactId, ArtifactTemplate, Operation, OperationContext, OperationError,
    OperationSignature, ParamSpec, Value, ValueKind,
};
use artifact_runtime::{Artifact, ArtifactConfig};
use async_trait::async_trait;
use std::sync::Arc;

/// The counter's observable property.
pub const COUNT: &str = "count";

/// The signal `inc` emits.
pub const TICK: &str = "tick";

/// Template for counter artifacts. `init` takes the starting count.
pub struct Counter;

#[async_trait]
impl ArtifactTemplate for Counter {
    fn kind(&self) -> &str {
        "counter"
    }

    fn init_params(&self) -> Vec<ParamSpec> {
        vec![ParamSpec::new("initial", ValueKind::Int)]
    }

    async fn init(
        &self,
        ctx: &mut dyn OperationContext,
        params: &[Value],
    ) -> Result<(), OperationError> {
        let initial = params
            .first()
            .and_then(Value::as_int)
            .ok_or_else(|| OperationError::Failed("initial count must be an int".into()))?;
        ctx.define(COUNT, Value::Int(initial)).await?;
        Ok(())
    }

    fn operations(&self) -> Vec<Arc<dyn Operation>> {
        vec![Arc::new(Inc::new()), Arc::new(IncGet::new())]
    }
}

fn add(count: i64, delta: i64) -> Result<i64, OperationError> {
    count
        .checked_add(delta)
        .ok_or_else(|| OperationError::Failed(format!("{COUNT} overflows: {count} + {delta}")))
}

/// `inc()` — add one and signal `tick`.
pub struct Inc {
    signature: OperationSignature,
}

impl Inc {
    /// Create the operation.
    pub fn new() -> Self {
        Self {
            signature: OperationSignature::new("inc"),
        }
    }
}

impl Default for Inc {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Operation for Inc {
    fn signature(&self) -> &OperationSignature {
        &self.signature
    }

    async fn execute(
        &self,
        ctx: &mut dyn OperationContext,
        _args: &[Value],
    ) -> Result<(), OperationError> {
        let count = ctx.get_int(COUNT).await?;
        ctx.update(COUNT, Value::Int(add(count, 1)?)).await?;
        ctx.emit(TICK);
        Ok(())
    }
}

/// `inc_get(delta)` — add `delta` and hand the new count back.
pub struct IncGet {
    signature: OperationSignature,
}

impl IncGet {
    /// Create the operation.
    pub fn new() -> Self {
        Self {
            signature: OperationSignature::new("inc_get")
                .param("delta", ValueKind::Int)
                .feedback(ValueKind::Int),
        }
    }
}

impl Default for IncGet {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Operation for IncGet {
    fn signature(&self) -> &OperationSignature {
        &self.signature
    }

    async fn execute(
        &self,
        ctx: &mut dyn OperationContext,
        args: &[Value],
    ) -> Result<(), OperationError> {
        let delta = args
            .first()
            .and_then(Value::as_int)
            .ok_or_else(|| OperationError::Failed("delta must be an int".into()))?;
        let count = ctx.get_int(COUNT).await?;
        let next = add(count, delta)?;
        ctx.update(COUNT, Value::Int(next)).await?;
        ctx.set_feedback(Value::Int(next))?;
        Ok(())
    }
}

/// Create a counter starting at `initial`, with a generated ID.
pub async fn create(initial: i64) -> Result<Artifact, ArtifactError> {
    Artifact::create(&Counter, &[Value::Int(initial)]).await
}

/// Create a counter with an explicit ID and configuration.
pub async fn create_with_config(
    id: ArtifactId,
    initial: i64,
    config: ArtifactConfig,
) -> Result<Artifact, ArtifactError> {
    Artifact::create_with_config(id, &Counter, &[Value::Int(initial)], config).await
}
