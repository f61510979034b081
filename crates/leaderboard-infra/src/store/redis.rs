//! Redis store implementation. Values are kept as JSON text.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client, Script};
use serde_json::Value;

use leaderboard_core::ports::{KeyValueStore, StoreError};

/// Redis connection configuration.
#[derive(Debug, Clone)]
pub struct RedisConfig {
    /// Redis URL (e.g., redis://localhost:6379)
    pub url: String,
    /// Connection timeout
    pub connect_timeout: Duration,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://localhost:6379".to_string(),
            connect_timeout: Duration::from_secs(5),
        }
    }
}

impl RedisConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            url: std::env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            connect_timeout: Duration::from_secs(
                std::env::var("REDIS_CONNECT_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(5),
            ),
        }
    }

    /// Open a managed connection, giving up after `connect_timeout`.
    pub(crate) async fn connect(&self) -> Result<ConnectionManager, String> {
        let client = Client::open(self.url.as_str()).map_err(|e| e.to_string())?;

        // Use timeout to prevent hanging if Redis is unreachable
        tokio::time::timeout(self.connect_timeout, ConnectionManager::new(client))
            .await
            .map_err(|_| "Connection timed out".to_string())?
            .map_err(|e| e.to_string())
    }
}

/// Redis-backed key-value store.
///
/// Uses connection manager for automatic reconnection and pooling.
pub struct RedisStore {
    conn: ConnectionManager,
    /// Swaps the value only if the key still holds the text we compared against
    swap_script: Script,
}

impl RedisStore {
    pub async fn new(config: RedisConfig) -> Result<Self, StoreError> {
        let conn = config.connect().await.map_err(StoreError::Connection)?;

        // ARGV[1] = '1' if the key existed, ARGV[2] = its text, ARGV[3] = new text
        let swap_script = Script::new(
            r#"
            local current = redis.call('GET', KEYS[1])
            if ARGV[1] == '1' then
                if current ~= ARGV[2] then
                    return 0
                end
            elseif current then
                return 0
            end

            redis.call('SET', KEYS[1], ARGV[3])
            return 1
            "#,
        );

        tracing::info!(url = %config.url, "Connected to Redis store");

        Ok(Self { conn, swap_script })
    }

    /// Create from environment configuration.
    pub async fn from_env() -> Result<Self, StoreError> {
        Self::new(RedisConfig::from_env()).await
    }

    async fn get_text(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.conn.clone();
        conn.get::<_, Option<String>>(key)
            .await
            .map_err(|e| StoreError::Operation(e.to_string()))
    }
}

fn decode(text: Option<&str>) -> Result<Option<Value>, StoreError> {
    text.map(serde_json::from_str::<Value>)
        .transpose()
        .map_err(StoreError::from)
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        decode(self.get_text(key).await?.as_deref())
    }

    async fn set(&self, key: &str, value: &Value) -> Result<(), StoreError> {
        let text = serde_json::to_string(value)?;
        let mut conn = self.conn.clone();

        conn.set::<_, _, ()>(key, text)
            .await
            .map_err(|e| StoreError::Operation(e.to_string()))
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
        // Compare decoded values here, then let the script guard the exact text
        // we looked at, so formatting differences never count as conflicts.
        let current = self.get_text(key).await?;
        if decode(current.as_deref())?.as_ref() != expected {
            return Ok(false);
        }

        let existed = if current.is_some() { "1" } else { "0" };
        let text = serde_json::to_string(value)?;
        let mut conn = self.conn.clone();

        let written: i64 = self
            .swap_script
            .key(key)
            .arg(existed)
            .arg(current.unwrap_or_default())
            .arg(text)
            .invoke_async(&mut conn)
            .await
            .map_err(|e| StoreError::Operation(e.to_string()))?;

        Ok(written == 1)
    }
}
