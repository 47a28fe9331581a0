//! Storage backends for the preference store.

use parking_lot::RwLock;
use serde_json::{Map, Value};

use crate::error::CuImageResult;

/// Abstract interface for persisted preference values.
///
/// Implementations serialize individual accesses; they do not offer
/// read-modify-write atomicity across calls.
pub trait PreferenceBackend: Send + Sync {
    /// Get the stored value for a name, if any.
    fn value(&self, name: &str) -> Option<Value>;

    /// Store a value, persisting it before returning.
    fn set_value(&self, name: &str, value: Value) -> CuImageResult<()>;

    /// Delete a stored value. Deleting a missing name is not an error.
    fn remove_value(&self, name: &str) -> CuImageResult<()>;
}

/// Volatile backend for tests and previews.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    values: RwLock<Map<String, Value>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything stored so far.
    pub fn snapshot(&self) -> Map<String, Value> {
        self.values.read().clone()
    }
}

impl PreferenceBackend for MemoryBackend {
    fn value(&self, name: &str) -> Option<Value> {
        self.values.read().get(name).cloned()
    }

    fn set_value(&self, name: &str, value: Value) -> CuImageResult<()> {
        self.values.write().insert(name.to_string(), value);
        Ok(())
    }

    fn remove_value(&self, name: &str) -> CuImageResult<()> {
        self.values.write().remove(name);
        Ok(())
    }
}
