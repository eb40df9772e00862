//! Operation lookup by name.

use artifact_core::{ArtifactError, Operation, OperationSignature};
use std::collections::HashMap;
use std::sync::Arc;

/// The operations of one artifact, keyed by name.
pub struct OperationRegistry {
    operations: HashMap<String, Arc<dyn Operation>>,
}

impl OperationRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            operations: HashMap::new(),
        }
    }

    /// Register an operation under its signature's name.
    pub fn register(&mut self, operation: Arc<dyn Operation>) -> Result<(), ArtifactError> {
        let name = operation.signature().name.clone();
        if self.operations.contains_key(&name) {
            return Err(ArtifactError::DuplicateOperation(name));
        }
        self.operations.insert(name, operation);
        Ok(())
    }

    /// Look up an operation.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Operation>> {
        self.operations.get(name)
    }

    /// Signatures of every operation, sorted by name.
    pub fn signatures(&self) -> Vec<OperationSignature> {
        let mut signatures: Vec<OperationSignature> = self
            .operations
            .values()
            .map(|op| op.signature().clone())
            .collect();
        signatures.sort_by(|a, b| a.name.cmp(&b.name));
        signatures
    }

    /// Number of registered operations.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Whether no operations are registered.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

impl Default for OperationRegistry {
    fn default() -> Self {
        Self::new()
    }
}
