//! The Artifact — properties, operations, and signals behind one guard.

use crate::bus::EventBus;
use crate::config::ArtifactConfig;
use crate::context::InvocationContext;
use crate::registry::OperationRegistry;
use crate::signal::{SignalChannel, SignalSubscription};
use crate::store::{PropertyStore, PropertyWatch};
use artifact_core::{
    ArtifactError, ArtifactEvent, ArtifactId, ArtifactTemplate, Invocation, InvokeError, Observer,
    OperationError, OperationSignature, PropertyError, PropertySnapshot, Value, check_params,
};
use futures::FutureExt;
use std::any::Any;
use std::collections::BTreeMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{Mutex, broadcast};
use tokio::task::JoinHandle;

/// A live artifact instance.
///
/// At most one operation body runs at a time: `invoke` holds the guard for
/// the whole body, and tokio's mutex hands it out in FIFO order. Reads
/// ([`Artifact::property`], [`Artifact::properties`]) don't take the guard
/// and always see a committed value with its version.
///
/// Dropping the artifact (or calling [`Artifact::dispose`]) ends every
/// event stream and watch.
pub struct Artifact {
    id: ArtifactId,
    kind: String,
    bus: Arc<EventBus>,
    store: PropertyStore,
    signals: SignalChannel,
    operations: OperationRegistry,
    guard: Mutex<()>,
    disposed: AtomicBool,
}

impl Artifact {
    /// Create an artifact with a generated ID and default configuration.
    pub async fn create(
        template: &dyn ArtifactTemplate,
        params: &[Value],
    ) -> Result<Self, ArtifactError> {
        Self::create_with_config(
            ArtifactId::generate(),
            template,
            params,
            ArtifactConfig::default(),
        )
        .await
    }

    /// Create an artifact: check `params`, register the template's
    /// operations, then run its `init` under the guard.
    pub async fn create_with_config(
        id: ArtifactId,
        template: &dyn ArtifactTemplate,
        params: &[Value],
        config: ArtifactConfig,
    ) -> Result<Self, ArtifactError> {
        let kind = template.kind().to_string();
        config.validate().map_err(ArtifactError::InvalidConfig)?;
        check_params(&template.init_params(), params).map_err(|reason| {
            ArtifactError::InvalidParams {
                kind: kind.clone(),
                reason,
            }
        })?;

        let mut operations = OperationRegistry::new();
        for operation in template.operations() {
            operations.register(operation)?;
        }

        let bus = Arc::new(EventBus::new(config.event_capacity));
        let artifact = Self {
            signals: SignalChannel::new(id.clone(), Arc::clone(&bus)),
            id,
            kind,
            store: PropertyStore::new(Arc::clone(&bus), config.watch_capacity),
            bus,
            operations,
            guard: Mutex::new(()),
            disposed: AtomicBool::new(false),
        };

        artifact.run_init(template, params).await?;
        tracing::info!(
            artifact = %artifact.id,
            kind = %artifact.kind,
            operations = artifact.operations.len(),
            "artifact.create"
        );
        Ok(artifact)
    }

    async fn run_init(
        &self,
        template: &dyn ArtifactTemplate,
        params: &[Value],
    ) -> Result<(), ArtifactError> {
        let _guard = self.guard.lock().await;
        let mut ctx = InvocationContext::new(&self.id, &self.store, &self.signals, None);
        let outcome = AssertUnwindSafe(template.init(&mut ctx, params))
            .catch_unwind()
            .await
            .unwrap_or_else(|payload| Err(panicked(payload)));
        outcome.map_err(|source| ArtifactError::Init {
            kind: self.kind.clone(),
            source,
        })
    }

    /// This artifact's ID.
    pub fn id(&self) -> &ArtifactId {
        &self.id
    }

    /// The template kind this artifact was created from.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Signatures of every operation, sorted by name.
    pub fn operations(&self) -> Vec<OperationSignature> {
        self.operations.signatures()
    }

    /// Read one property without taking the guard.
    pub async fn property(&self, name: &str) -> Result<PropertySnapshot, PropertyError> {
        self.store.get(name).await
    }

    /// Read every property without taking the guard.
    pub async fn properties(&self) -> BTreeMap<String, PropertySnapshot> {
        self.store.snapshot_all().await
    }

    /// Subscribe to every property update and signal, in emission order.
    pub fn subscribe(&self) -> broadcast::Receiver<ArtifactEvent> {
        self.bus.subscribe()
    }

    /// Subscribe to updates of one property.
    pub async fn watch(&self, name: &str) -> Result<PropertyWatch, PropertyError> {
        self.store.watch(name).await
    }

    /// Subscribe to signals only.
    pub fn signals(&self) -> SignalSubscription {
        self.signals.subscribe()
    }

    /// Number of live event-stream subscribers, attached observers included.
    pub fn subscriber_count(&self) -> usize {
        self.bus.subscriber_count()
    }

    /// Forward this artifact's events to `observer` from a spawned task.
    ///
    /// The artifact never waits on the observer. If the observer falls
    /// behind by more than the event capacity it misses events. Observer
    /// errors are logged and delivery continues. The task ends once the
    /// artifact is disposed or dropped; abort the handle to detach early.
    pub fn attach(&self, observer: Arc<dyn Observer>) -> JoinHandle<()> {
        let mut receiver = self.bus.subscribe();
        let id = self.id.clone();
        tokio::spawn(async move {
            loop {
                match receiver.recv().await {
                    Ok(event) => {
                        if let Err(e) = observer.on_event(&id, &event).await {
                            tracing::warn!(artifact = %id, error = %e, "artifact.observer.error");
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(artifact = %id, skipped, "artifact.observer.lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            tracing::debug!(artifact = %id, "artifact.observer.detached");
        })
    }

    /// Invoke an operation by name.
    ///
    /// Unknown names and bad arguments fail before the guard is taken and
    /// leave state untouched. A failing or panicking body keeps whatever it
    /// committed; those effects come back in [`InvokeError::OperationFailed`].
    pub async fn invoke(&self, operation: &str, args: &[Value]) -> Result<Invocation, InvokeError> {
        if self.is_disposed() {
            return Err(InvokeError::Disposed(self.id.to_string()));
        }
        let op = self
            .operations
            .get(operation)
            .ok_or_else(|| InvokeError::UnknownOperation(operation.to_string()))?;
        let signature = op.signature();
        signature
            .check_args(args)
            .map_err(|reason| InvokeError::ArgumentMismatch {
                operation: operation.to_string(),
                reason,
            })?;

        let _guard = self.guard.lock().await;
        // Disposal may have happened while we waited.
        if self.is_disposed() {
            return Err(InvokeError::Disposed(self.id.to_string()));
        }

        let mut ctx =
            InvocationContext::new(&self.id, &self.store, &self.signals, signature.feedback);
        // A panicking body still holds whatever it committed before the panic.
        let outcome = AssertUnwindSafe(op.execute(&mut ctx, args))
            .catch_unwind()
            .await
            .unwrap_or_else(|payload| Err(panicked(payload)));
        let (feedback, events) = ctx.into_parts();

        match outcome {
            Ok(()) => {
                tracing::debug!(
                    artifact = %self.id,
                    operation,
                    effects = events.len(),
                    "artifact.invoke"
                );
                Ok(Invocation { feedback, events })
            }
            Err(source) => {
                tracing::warn!(
                    artifact = %self.id,
                    operation,
                    applied = events.len(),
                    error = %source,
                    "artifact.invoke.failed"
                );
                Err(InvokeError::OperationFailed {
                    operation: operation.to_string(),
                    applied: events,
                    source,
                })
            }
        }
    }

    /// Dispose the artifact.
    ///
    /// Waits for an in-flight invocation to finish, then drops every
    /// property and closes the event stream. Later invocations fail with
    /// [`InvokeError::Disposed`]; later reads fail with
    /// [`PropertyError::Unknown`]. Disposing twice is a no-op.
    pub async fn dispose(&self) {
        let _guard = self.guard.lock().await;
        if self.disposed.swap(true, Ordering::AcqRel) {
            return;
        }
        self.store.clear().await;
        self.bus.close();
        tracing::info!(artifact = %self.id, kind = %self.kind, "artifact.dispose");
    }

    /// Whether [`Artifact::dispose`] has run.
    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }
}

fn panicked(payload: Box<dyn Any + Send>) -> OperationError {
    let message = payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_string());
    OperationError::Failed(format!("panicked: {message}"))
}
