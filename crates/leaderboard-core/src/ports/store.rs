use async_trait::async_trait;
use serde_json::Value;

/// Key-value store trait - abstraction over the remote record store.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value held under `key`. An absent key is `Ok(None)`, not an error.
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Overwrite the value held under `key`.
    async fn set(&self, key: &str, value: &Value) -> Result<(), StoreError>;

    /// Whether `compare_and_set` is implemented by this backend.
    fn supports_compare_and_set(&self) -> bool {
        false
    }

    /// Write `value` only if `key` still holds `expected` (`None` meaning absent).
    /// Returns `Ok(false)` when the stored value changed in between.
    async fn compare_and_set(
        &self,
        _key: &str,
        _expected: Option<&Value>,
        _value: &Value,
    ) -> Result<bool, StoreError> {
        Err(StoreError::Unsupported("compare_and_set"))
    }
}

/// Store operation errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error("Operation failed: {0}")]
    Operation(String),

    #[error("Write conflict persisted after {0} attempts")]
    Conflict(u32),

    #[error("Operation not supported by this store: {0}")]
    Unsupported(&'static str),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}
