use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::StorageBackend;
use crate::errors::StorageError;

/// In-memory storage backend.
///
/// Used by tests and as the fallback when no data directory is available;
/// contents vanish with the process.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryStorage {
    /// Create a new empty in-memory storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a key before handing the storage to the code under test.
    pub fn with_entry(self, key: &str, value: &str) -> Self {
        {
            let mut entries = self.entries.lock().expect("storage mutex poisoned");
            entries.insert(key.to_string(), value.to_string());
        }
        self
    }
}

#[async_trait]
impl StorageBackend for InMemoryStorage {
    async fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().map_err(StorageError::from)?;
        Ok(entries.get(key).cloned())
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(StorageError::from)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn absent_key_reads_none() {
        let storage = InMemoryStorage::new();
        assert!(storage.read("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn write_then_read_round_trips() {
        let storage = InMemoryStorage::new();
        storage.write("k", "v1").await.unwrap();
        storage.write("k", "v2").await.unwrap();
        assert_eq!(storage.read("k").await.unwrap().as_deref(), Some("v2"));
    }
}
