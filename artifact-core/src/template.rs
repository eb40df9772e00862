//! Artifact templates — the initial property set plus the operations.

use crate::error::OperationError;
use crate::operation::{Operation, OperationContext, ParamSpec};
use crate::value::Value;
use async_trait::async_trait;
use std::sync::Arc;

/// Defines a kind of artifact.
///
/// The runtime checks `params` against [`ArtifactTemplate::init_params`],
/// calls [`ArtifactTemplate::init`] under the guard, then registers
/// [`ArtifactTemplate::operations`].
#[async_trait]
pub trait ArtifactTemplate: Send + Sync {
    /// Kind name, e.g. `"counter"`.
    fn kind(&self) -> &str;

    /// Parameters `init` expects.
    fn init_params(&self) -> Vec<ParamSpec> {
        Vec::new()
    }

    /// Define the initial properties.
    async fn init(
        &self,
        ctx: &mut dyn OperationContext,
        params: &[Value],
    ) -> Result<(), OperationError>;

    /// The operations this artifact exposes.
    fn operations(&self) -> Vec<Arc<dyn Operation>>;
}
