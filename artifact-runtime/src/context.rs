//! The context handed to operation bodies and template `init`s.

use crate::signal::SignalChannel;
use crate::store::PropertyStore;
use artifact_core::{
    ArtifactEvent, ArtifactId, OperationContext, OperationError, PropertyError, PropertySnapshot,
    Value, ValueKind,
};
use async_trait::async_trait;

/// Records effects in order and holds the write-once feedback slot.
pub(crate) struct InvocationContext<'a> {
    artifact: &'a ArtifactId,
    store: &'a PropertyStore,
    signals: &'a SignalChannel,
    feedback_kind: Option<ValueKind>,
    feedback: Option<Value>,
    events: Vec<ArtifactEvent>,
}

impl<'a> InvocationContext<'a> {
    pub(crate) fn new(
        artifact: &'a ArtifactId,
        store: &'a PropertyStore,
        signals: &'a SignalChannel,
        feedback_kind: Option<ValueKind>,
    ) -> Self {
        Self {
            artifact,
            store,
            signals,
            feedback_kind,
            feedback: None,
            events: Vec::new(),
        }
    }

    pub(crate) fn into_parts(self) -> (Option<Value>, Vec<ArtifactEvent>) {
        (self.feedback, self.events)
    }
}

#[async_trait]
impl<'a> OperationContext for InvocationContext<'a> {
    fn artifact_id(&self) -> &ArtifactId {
        self.artifact
    }

    async fn define(&mut self, name: &str, initial: Value) -> Result<(), PropertyError> {
        self.store.define(name, initial).await
    }

    async fn get(&self, name: &str) -> Result<PropertySnapshot, PropertyError> {
        self.store.get(name).await
    }

    async fn update(&mut self, name: &str, value: Value) -> Result<u64, PropertyError> {
        let update = self.store.update(name, value).await?;
        let version = update.version;
        self.events.push(ArtifactEvent::PropertyUpdated(update));
        Ok(version)
    }

    fn emit(&mut self, signal: &str) {
        let signal = self.signals.emit(signal);
        self.events.push(ArtifactEvent::Signal(signal));
    }

    fn set_feedback(&mut self, value: Value) -> Result<(), OperationError> {
        if self.feedback.is_some() {
            return Err(OperationError::FeedbackAlreadySet);
        }
        if self.feedback_kind != Some(value.kind()) {
            return Err(OperationError::FeedbackKind {
                expected: self.feedback_kind,
                actual: value.kind(),
            });
        }
        self.feedback = Some(value);
        Ok(())
    }
}
