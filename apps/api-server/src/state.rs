//! Application state - shared across all handlers.

use std::sync::Arc;

use leaderboard_core::ports::{Clock, KeyValueStore, RateLimiter};
use leaderboard_core::{LeaderboardConfig, LeaderboardService};
use leaderboard_infra::{InMemoryRateLimiter, InMemoryStore, RateLimitConfig, SystemClock};

#[cfg(feature = "edge-config")]
use leaderboard_infra::{EdgeConfigConfig, EdgeConfigStore};
#[cfg(feature = "redis")]
use leaderboard_infra::{RedisRateLimiter, RedisStore};

use crate::config::{AppConfig, RateLimitBackend, StoreBackend};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub leaderboard: Arc<LeaderboardService>,
}

impl AppState {
    /// Build the application state with the configured backends.
    pub async fn new(config: &AppConfig) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let store = build_store(config.store).await;
        let limiter = build_rate_limiter(config.rate_limit, clock.clone()).await;

        tracing::info!(key = %config.leaderboard.key, "Application state initialized");

        Self::from_parts(store, limiter, clock, config.leaderboard.clone())
    }

    /// Assemble the state from already-built adapters.
    pub fn from_parts(
        store: Arc<dyn KeyValueStore>,
        limiter: Arc<dyn RateLimiter>,
        clock: Arc<dyn Clock>,
        config: LeaderboardConfig,
    ) -> Self {
        Self {
            leaderboard: Arc::new(LeaderboardService::new(store, limiter, clock, config)),
        }
    }
}

fn memory_store() -> Arc<dyn KeyValueStore> {
    Arc::new(InMemoryStore::new())
}

async fn build_store(backend: StoreBackend) -> Arc<dyn KeyValueStore> {
    match backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store - scores are lost on restart");
            memory_store()
        }
        #[cfg(feature = "redis")]
        StoreBackend::Redis => match RedisStore::from_env().await {
            Ok(store) => Arc::new(store),
            Err(e) => {
                tracing::error!(error = %e, "Failed to connect to Redis store. Using in-memory fallback.");
                memory_store()
            }
        },
        #[cfg(feature = "edge-config")]
        StoreBackend::EdgeConfig => {
            let Some(edge_config) = EdgeConfigConfig::from_env() else {
                tracing::error!(
                    "EDGE_CONFIG_ID, EDGE_CONFIG_READ_TOKEN and VERCEL_API_TOKEN must be set. Using in-memory fallback."
                );
                return memory_store();
            };
            match EdgeConfigStore::new(edge_config) {
                Ok(store) => Arc::new(store),
                Err(e) => {
                    tracing::error!(error = %e, "Failed to build Edge Config store. Using in-memory fallback.");
                    memory_store()
                }
            }
        }
        #[allow(unreachable_patterns)]
        other => {
            tracing::error!(backend = ?other, "Store backend not compiled in. Using in-memory fallback.");
            memory_store()
        }
    }
}

async fn build_rate_limiter(backend: RateLimitBackend, clock: Arc<dyn Clock>) -> Arc<dyn RateLimiter> {
    let memory = || -> Arc<dyn RateLimiter> {
        Arc::new(InMemoryRateLimiter::new(RateLimitConfig::from_env(), clock.clone()))
    };

    match backend {
        RateLimitBackend::Memory => memory(),
        #[cfg(feature = "redis")]
        RateLimitBackend::Redis => match RedisRateLimiter::from_env().await {
            Ok(limiter) => Arc::new(limiter),
            Err(e) => {
                tracing::error!(error = %e, "Failed to connect to Redis rate limiter. Using in-memory fallback.");
                memory()
            }
        },
        #[allow(unreachable_patterns)]
        other => {
            tracing::error!(backend = ?other, "Rate limit backend not compiled in. Using in-memory fallback.");
            memory()
        }
    }
}
