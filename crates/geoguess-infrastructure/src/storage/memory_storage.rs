//! In-memory key-value storage.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use geoguess_core::error::Result;
use geoguess_core::storage::KeyValueStorage;
use tokio::sync::RwLock;

/// Process-local storage. Used for ephemeral runs and tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryKeyValueStorage {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryKeyValueStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn contains_key(&self, key: &str) -> bool {
        self.entries.read().await.contains_key(key)
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStorage for InMemoryKeyValueStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}
