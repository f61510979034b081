//! Application configuration loaded from environment variables.

use std::env;

use leaderboard_core::LeaderboardConfig;

/// Where the Leaderboard Record lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Redis,
    EdgeConfig,
}

impl StoreBackend {
    fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "memory" => Some(Self::Memory),
            "redis" => Some(Self::Redis),
            "edge-config" | "edge_config" => Some(Self::EdgeConfig),
            _ => None,
        }
    }
}

/// Where the Rate Limit Table lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitBackend {
    Memory,
    Redis,
}

impl RateLimitBackend {
    fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "memory" => Some(Self::Memory),
            "redis" => Some(Self::Redis),
            _ => None,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub store: StoreBackend,
    pub rate_limit: RateLimitBackend,
    pub leaderboard: LeaderboardConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let store = env::var("STORE_BACKEND")
            .ok()
            .map(|v| {
                StoreBackend::parse(&v).unwrap_or_else(|| {
                    tracing::warn!(value = %v, "Unknown STORE_BACKEND, using memory");
                    StoreBackend::Memory
                })
            })
            .unwrap_or(StoreBackend::Memory);

        let rate_limit = env::var("RATE_LIMIT_BACKEND")
            .ok()
            .map(|v| {
                RateLimitBackend::parse(&v).unwrap_or_else(|| {
                    tracing::warn!(value = %v, "Unknown RATE_LIMIT_BACKEND, using memory");
                    RateLimitBackend::Memory
                })
            })
            .unwrap_or(RateLimitBackend::Memory);

        let defaults = LeaderboardConfig::default();
        let leaderboard = LeaderboardConfig {
            key: env::var("LEADERBOARD_KEY").unwrap_or(defaults.key),
            write_attempts: env::var("STORE_WRITE_ATTEMPTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.write_attempts),
        };

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            store,
            rate_limit,
            leaderboard,
        }
    }
}
