//! Vercel Edge Config store.
//!
//! Reads go to the Edge Config read endpoint with a read token, writes go to the
//! Vercel REST API with an API token. Edge Config has no conditional writes.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use leaderboard_core::ports::{KeyValueStore, StoreError};

/// Edge Config connection configuration.
#[derive(Debug, Clone)]
pub struct EdgeConfigConfig {
    /// Edge Config id (`ecfg_...`)
    pub id: String,
    /// Token used for item reads
    pub read_token: String,
    /// Vercel API token used for writes
    pub api_token: String,
    /// Team owning the Edge Config, if any
    pub team_id: Option<String>,
    pub read_base_url: String,
    pub api_base_url: String,
    pub timeout: Duration,
}

impl EdgeConfigConfig {
    pub fn new(id: impl Into<String>, read_token: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            read_token: read_token.into(),
            api_token: api_token.into(),
            team_id: None,
            read_base_url: "https://edge-config.vercel.com".to_string(),
            api_base_url: "https://api.vercel.com".to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Load configuration from environment variables.
    /// Returns `None` unless the id and both tokens are set.
    pub fn from_env() -> Option<Self> {
        let id = std::env::var("EDGE_CONFIG_ID").ok()?;
        let read_token = std::env::var("EDGE_CONFIG_READ_TOKEN").ok()?;
        let api_token = std::env::var("VERCEL_API_TOKEN").ok()?;

        let mut config = Self::new(id, read_token, api_token);
        config.team_id = std::env::var("VERCEL_TEAM_ID").ok();
        Some(config)
    }

    fn item_url(&self, key: &str) -> String {
        format!("{}/{}/item/{}", self.read_base_url, self.id, key)
    }

    fn items_url(&self) -> String {
        let url = format!("{}/v1/edge-config/{}/items", self.api_base_url, self.id);
        match &self.team_id {
            Some(team) => format!("{}?teamId={}", url, team),
            None => url,
        }
    }
}

/// Edge Config backed key-value store.
pub struct EdgeConfigStore {
    client: Client,
    config: EdgeConfigConfig,
}

impl EdgeConfigStore {
    pub fn new(config: EdgeConfigConfig) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        tracing::info!(id = %config.id, "Using Edge Config store");

        Ok(Self { client, config })
    }
}

#[async_trait]
impl KeyValueStore for EdgeConfigStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let response = self
            .client
            .get(self.config.item_url(key))
            .bearer_auth(&self.config.read_token)
            .send()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(StoreError::Operation(format!(
                "Edge Config read returned {}",
                status
            )));
        }

        response
            .json::<Value>()
            .await
            .map(Some)
            .map_err(|e| StoreError::Serialization(e.to_string()))
    }

    async fn set(&self, key: &str, value: &Value) -> Result<(), StoreError> {
        let body = json!({
            "items": [{ "operation": "upsert", "key": key, "value": value }]
        });

        let response = self
            .client
            .patch(self.config.items_url())
            .bearer_auth(&self.config.api_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(StoreError::Operation(format!(
                "Edge Config write returned {}: {}",
                status, detail
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        let mut config = EdgeConfigConfig::new("ecfg_123", "read", "api");
        assert_eq!(
            config.item_url("leaderboard"),
            "https://edge-config.vercel.com/ecfg_123/item/leaderboard"
        );
        assert_eq!(
            config.items_url(),
            "https://api.vercel.com/v1/edge-config/ecfg_123/items"
        );

        config.team_id = Some("team_9".to_string());
        assert_eq!(
            config.items_url(),
            "https://api.vercel.com/v1/edge-config/ecfg_123/items?teamId=team_9"
        );
    }

    #[tokio::test]
    async fn test_unreachable_store_reports_connection_error() {
        let mut config = EdgeConfigConfig::new("ecfg_123", "read", "api");
        config.read_base_url = "http://127.0.0.1:1".to_string();
        config.timeout = Duration::from_secs(1);
        let store = EdgeConfigStore::new(config).unwrap();

        assert!(matches!(
            store.get("leaderboard").await,
            Err(StoreError::Connection(_))
        ));
    }
}
