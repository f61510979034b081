//! In-memory store implementation - used for local runs and as the fallback
//! when a remote store is unavailable.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use leaderboard_core::ports::{KeyValueStore, StoreError};

/// In-memory key-value store using a HashMap with async RwLock.
///
/// Note: Data is lost on process restart.
pub struct InMemoryStore {
    values: RwLock<HashMap<String, Value>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            values: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let values = self.values.read().await;
        Ok(values.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &Value) -> Result<(), StoreError> {
        let mut values = self.values.write().await;
        values.insert(key.to_string(), value.clone());
        Ok(())
    }

    fn supports_compare_and_set(&self) -> bool {
        true
    }

    async fn compare_and_set(
        &self,
        key: &str,
        expected: Option<&Value>,
        value: &Value,
    ) -> Result<bool, StoreError> {
        // Compare and write under one write lock.
        let mut values = self.values.write().await;
        if values.get(key) != expected {
            return Ok(false);
        }
        values.insert(key.to_string(), value.clone());
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_set_and_get() {
        let store = InMemoryStore::new();
        assert_eq!(store.get("board").await.unwrap(), None);

        store.set("board", &json!([1, 2])).await.unwrap();
        assert_eq!(store.get("board").await.unwrap(), Some(json!([1, 2])));
    }

    #[tokio::test]
    async fn test_compare_and_set() {
        let store = InMemoryStore::new();

        assert!(store.compare_and_set("board", None, &json!([1])).await.unwrap());
        assert!(!store.compare_and_set("board", None, &json!([2])).await.unwrap());
        assert!(
            store
                .compare_and_set("board", Some(&json!([1])), &json!([3]))
                .await
                .unwrap()
        );
        assert_eq!(store.get("board").await.unwrap(), Some(json!([3])));
    }
}
