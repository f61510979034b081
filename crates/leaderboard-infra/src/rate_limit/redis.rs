//! Redis rate limiter - a minimum-interval lock per key shared by every instance.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;

use leaderboard_core::ports::{RateLimitError, RateLimitResult, RateLimiter};

use crate::store::RedisConfig;

/// Redis rate limiter configuration.
#[derive(Debug, Clone)]
pub struct RedisRateLimitConfig {
    /// Redis connection config
    pub redis: RedisConfig,
    /// Minimum time between two accepted submissions from one key
    pub interval: Duration,
    /// Key prefix for rate limit keys
    pub key_prefix: String,
}

impl Default for RedisRateLimitConfig {
    fn default() -> Self {
        Self {
            redis: RedisConfig::default(),
            interval: Duration::from_millis(5000),
            key_prefix: "leaderboard:ratelimit".to_string(),
        }
    }
}

impl RedisRateLimitConfig {
    pub fn from_env() -> Self {
        Self {
            redis: RedisConfig::from_env(),
            interval: Duration::from_millis(
                std::env::var("RATE_LIMIT_INTERVAL_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(5000),
            ),
            key_prefix: std::env::var("RATE_LIMIT_KEY_PREFIX")
                .unwrap_or_else(|_| "leaderboard:ratelimit".to_string()),
        }
    }
}

/// Redis-backed rate limiter.
///
/// An accepted submission sets `prefix:key` with `NX` and a TTL of one
/// interval; while that key lives every further check is refused.
pub struct RedisRateLimiter {
    conn: ConnectionManager,
    config: RedisRateLimitConfig,
}

impl RedisRateLimiter {
    pub async fn new(config: RedisRateLimitConfig) -> Result<Self, RateLimitError> {
        let conn = config
            .redis
            .connect()
            .await
            .map_err(RateLimitError::Backend)?;

        tracing::info!(url = %config.redis.url, "Connected to Redis rate limiter");

        Ok(Self { conn, config })
    }

    /// Create from environment configuration.
    pub async fn from_env() -> Result<Self, RateLimitError> {
        Self::new(RedisRateLimitConfig::from_env()).await
    }

    fn make_key(&self, key: &str) -> String {
        format!("{}:{}", self.config.key_prefix, key)
    }
}

#[async_trait]
impl RateLimiter for RedisRateLimiter {
    async fn check(&self, key: &str) -> Result<RateLimitResult, RateLimitError> {
        let redis_key = self.make_key(key);
        let interval_ms = self.config.interval.as_millis().max(1) as u64;
        let mut conn = self.conn.clone();

        let reply: Option<String> = redis::cmd("SET")
            .arg(&redis_key)
            .arg(chrono::Utc::now().timestamp_millis())
            .arg("NX")
            .arg("PX")
            .arg(interval_ms)
            .query_async(&mut conn)
            .await
            .map_err(|e| RateLimitError::Backend(e.to_string()))?;

        if reply.is_some() {
            return Ok(RateLimitResult::allowed());
        }

        let ttl_ms: i64 = redis::cmd("PTTL")
            .arg(&redis_key)
            .query_async(&mut conn)
            .await
            .map_err(|e| RateLimitError::Backend(e.to_string()))?;

        // PTTL is negative if the key expired between the two calls.
        let wait = ttl_ms.clamp(1, interval_ms as i64) as u64;
        Ok(RateLimitResult::limited(Duration::from_millis(wait)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn get_test_ratelimiter() -> Option<RedisRateLimiter> {
        let config = RedisRateLimitConfig {
            redis: RedisConfig {
                url: std::env::var("REDIS_URL")
                    .unwrap_or_else(|_| "redis://localhost:6389".to_string()),
                connect_timeout: Duration::from_secs(1),
            },
            interval: Duration::from_millis(500),
            key_prefix: format!("test_ratelimit:{}", chrono::Utc::now().timestamp_millis()),
        };

        RedisRateLimiter::new(config).await.ok()
    }

    #[tokio::test]
    async fn test_redis_ratelimiter() {
        let limiter = match get_test_ratelimiter().await {
            Some(l) => l,
            None => return,
        };

        let key = "203.0.113.7";

        // First submission - allowed
        assert!(limiter.check(key).await.unwrap().allowed);

        // Second inside the interval - rejected
        let res = limiter.check(key).await.unwrap();
        assert!(!res.allowed);
        assert!(res.retry_after <= Duration::from_millis(500));

        // Wait for the interval to pass
        tokio::time::sleep(Duration::from_millis(700)).await;

        assert!(limiter.check(key).await.unwrap().allowed);
    }
}
