use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::storage::{KeyValueStore, StorageError};

/// In-process backend. Clones share the same map, so a handle kept outside
/// the store can observe what was written.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, String>>, StorageError> {
        self.entries
            .lock()
            .map_err(|_| StorageError::Unavailable("memory store lock poisoned".to_string()))
    }

    /// Writes a raw value, bypassing serialization. Useful to seed records.
    #[cfg(test)]
    pub fn insert(&self, key: &str, value: &str) {
        if let Ok(mut entries) = self.lock() {
            entries.insert(key.to_string(), value.to_string());
        }
    }

    #[cfg(test)]
    pub fn raw(&self, key: &str) -> Option<String> {
        self.lock().ok().and_then(|entries| entries.get(key).cloned())
    }

    #[cfg(test)]
    pub fn record_count(&self) -> usize {
        self.lock().map(|entries| entries.len()).unwrap_or(0)
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&mut self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock()?.get(key).cloned())
    }

    async fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
