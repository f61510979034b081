//! In-memory submission rate limiter - the per-process Rate Limit Table.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use leaderboard_core::ports::{Clock, RateLimitError, RateLimitResult, RateLimiter};

/// In-memory rate limiter configuration.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Minimum time between two accepted submissions from one key.
    pub interval: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(5000),
        }
    }
}

impl RateLimitConfig {
    pub fn from_env() -> Self {
        Self {
            interval: Duration::from_millis(
                std::env::var("RATE_LIMIT_INTERVAL_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(5000),
            ),
        }
    }
}

/// Minimum-interval limiter keyed by client identifier.
///
/// Note: Limits are per-process, not distributed across instances, and
/// entries are never evicted.
pub struct InMemoryRateLimiter {
    last_accepted: DashMap<String, i64>,
    clock: Arc<dyn Clock>,
    interval_ms: i64,
}

impl InMemoryRateLimiter {
    pub fn new(config: RateLimitConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            last_accepted: DashMap::new(),
            clock,
            interval_ms: i64::try_from(config.interval.as_millis()).unwrap_or(i64::MAX),
        }
    }

    /// Number of keys seen so far.
    pub fn tracked_keys(&self) -> usize {
        self.last_accepted.len()
    }
}

#[async_trait]
impl RateLimiter for InMemoryRateLimiter {
    async fn check(&self, key: &str) -> Result<RateLimitResult, RateLimitError> {
        let now = self.clock.now_millis();

        match self.last_accepted.entry(key.to_string()) {
            Entry::Occupied(mut entry) => {
                let elapsed = now.saturating_sub(*entry.get());
                if elapsed < self.interval_ms {
                    let wait = (self.interval_ms - elapsed) as u64;
                    return Ok(RateLimitResult::limited(Duration::from_millis(wait)));
                }
                entry.insert(now);
            }
            Entry::Vacant(entry) => {
                entry.insert(now);
            }
        }

        Ok(RateLimitResult::allowed())
    }
}
