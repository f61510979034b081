//! Leaderboard operations - the read path and the submit pipeline.

use std::sync::Arc;

use serde_json::Value;

use crate::domain::{Leaderboard, READ_LIMIT, ScoreEntry, Submission};
use crate::error::DomainError;
use crate::ports::{Clock, KeyValueStore, RateLimiter, StoreError};

/// Leaderboard service configuration.
#[derive(Debug, Clone)]
pub struct LeaderboardConfig {
    /// Store key holding the Leaderboard Record.
    pub key: String,
    /// Read-modify-write attempts when the store supports compare-and-set.
    pub write_attempts: u32,
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            key: "leaderboard".to_string(),
            write_attempts: 3,
        }
    }
}

/// Reads and updates the single Leaderboard Record.
pub struct LeaderboardService {
    store: Arc<dyn KeyValueStore>,
    limiter: Arc<dyn RateLimiter>,
    clock: Arc<dyn Clock>,
    config: LeaderboardConfig,
}

impl LeaderboardService {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        limiter: Arc<dyn RateLimiter>,
        clock: Arc<dyn Clock>,
        config: LeaderboardConfig,
    ) -> Self {
        Self {
            store,
            limiter,
            clock,
            config,
        }
    }

    /// The top `READ_LIMIT` entries, highest score first. Never writes.
    pub async fn top(&self) -> Result<Vec<ScoreEntry>, DomainError> {
        let (_, board) = self.load().await?;
        Ok(board.top(READ_LIMIT))
    }

    /// Validate, throttle and persist a submission from `client_key`.
    pub async fn submit(&self, client_key: &str, payload: &Value) -> Result<ScoreEntry, DomainError> {
        let submission = Submission::from_payload(payload)?;

        self.throttle(client_key).await?;

        let entry = submission.into_entry(self.clock.now_millis());
        self.persist(entry.clone()).await?;

        tracing::debug!(client = %client_key, name = %entry.name, "Score recorded");
        Ok(entry)
    }

    async fn throttle(&self, client_key: &str) -> Result<(), DomainError> {
        match self.limiter.check(client_key).await {
            Ok(result) if !result.allowed => {
                tracing::debug!(client = %client_key, "Submission rate limited");
                Err(DomainError::RateLimited {
                    retry_after: result.retry_after,
                })
            }
            Ok(_) => Ok(()),
            Err(e) => {
                // Fail open: a broken limiter must not block submissions.
                tracing::error!(client = %client_key, error = %e, "Rate limiter error, failing open");
                Ok(())
            }
        }
    }

    async fn persist(&self, entry: ScoreEntry) -> Result<(), StoreError> {
        let key = self.config.key.as_str();

        if !self.store.supports_compare_and_set() {
            // Plain read-modify-write; concurrent submits may overwrite each other.
            let (_, mut board) = self.load().await?;
            board.record(entry);
            return self.store.set(key, &board.to_value()?).await;
        }

        let attempts = self.config.write_attempts.max(1);
        for attempt in 1..=attempts {
            let (current, mut board) = self.load().await?;
            board.record(entry.clone());

            if self
                .store
                .compare_and_set(key, current.as_ref(), &board.to_value()?)
                .await?
            {
                return Ok(());
            }

            tracing::warn!(key = %key, attempt, "Leaderboard changed during submit, retrying");
        }

        Err(StoreError::Conflict(attempts))
    }

    async fn load(&self) -> Result<(Option<Value>, Leaderboard), StoreError> {
        let raw = self.store.get(&self.config.key).await?;
        let board = Leaderboard::from_stored(raw.clone())?;
        Ok((raw, board))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{RateLimitError, RateLimitResult};
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    #[derive(Default)]
    struct TestStore {
        values: Mutex<HashMap<String, Value>>,
        cas: bool,
        conflicts_left: AtomicU32,
        writes: AtomicU32,
    }

    #[async_trait]
    impl KeyValueStore for TestStore {
        async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
            Ok(self.values.lock().unwrap().get(key).cloned())
        }

        async fn set(&self, key: &str, value: &Value) -> Result<(), StoreError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.values.lock().unwrap().insert(key.to_string(), value.clone());
            Ok(())
        }

        fn supports_compare_and_set(&self) -> bool {
            self.cas
        }

        async fn compare_and_set(
            &self,
            key: &str,
            _expected: Option<&Value>,
            value: &Value,
        ) -> Result<bool, StoreError> {
            if self.conflicts_left.load(Ordering::SeqCst) > 0 {
                self.conflicts_left.fetch_sub(1, Ordering::SeqCst);
                return Ok(false);
            }
            self.set(key, value).await.map(|_| true)
        }
    }

    enum TestLimiter {
        Allow,
        Deny,
        Broken,
    }

    #[async_trait]
    impl RateLimiter for TestLimiter {
        async fn check(&self, _key: &str) -> Result<RateLimitResult, RateLimitError> {
            match self {
                TestLimiter::Allow => Ok(RateLimitResult::allowed()),
                TestLimiter::Deny => Ok(RateLimitResult::limited(Duration::from_secs(5))),
                TestLimiter::Broken => Err(RateLimitError::Backend("down".to_string())),
            }
        }
    }

    struct FixedClock;

    impl Clock for FixedClock {
        fn now_millis(&self) -> i64 {
            1_000
        }
    }

    fn service(store: Arc<TestStore>, limiter: TestLimiter) -> LeaderboardService {
        LeaderboardService::new(
            store,
            Arc::new(limiter),
            Arc::new(FixedClock),
            LeaderboardConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_top_on_missing_record_is_empty() {
        let store = Arc::new(TestStore::default());
        let svc = service(store.clone(), TestLimiter::Allow);

        assert!(svc.top().await.unwrap().is_empty());
        assert_eq!(store.writes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_submit_creates_record() {
        let store = Arc::new(TestStore::default());
        let svc = service(store.clone(), TestLimiter::Allow);

        let entry = svc
            .submit("1.2.3.4", &json!({"name": " Ann ", "score": 10}))
            .await
            .unwrap();
        assert_eq!(entry.name, "Ann");
        assert_eq!(entry.time, 1_000);

        let stored = store.get("leaderboard").await.unwrap().unwrap();
        assert_eq!(stored, json!([{"name": "Ann", "score": 10, "time": 1_000}]));
    }

    #[tokio::test]
    async fn test_rate_limited_submit_is_not_persisted() {
        let store = Arc::new(TestStore::default());
        let svc = service(store.clone(), TestLimiter::Deny);

        let err = svc
            .submit("k", &json!({"name": "A", "score": 1}))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::RateLimited { .. }));
        assert!(store.get("leaderboard").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_validation_runs_before_rate_limit() {
        let store = Arc::new(TestStore::default());
        let svc = service(store, TestLimiter::Deny);

        let err = svc
            .submit("k", &json!({"name": "A", "score": 2_000_000}))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidScoreRange));
    }

    #[tokio::test]
    async fn test_broken_limiter_fails_open() {
        let store = Arc::new(TestStore::default());
        let svc = service(store.clone(), TestLimiter::Broken);

        svc.submit("k", &json!({"name": "A", "score": 1})).await.unwrap();
        assert_eq!(store.writes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_conflicting_write_is_retried() {
        let store = Arc::new(TestStore {
            cas: true,
            conflicts_left: AtomicU32::new(2),
            ..Default::default()
        });
        let svc = service(store.clone(), TestLimiter::Allow);

        svc.submit("k", &json!({"name": "A", "score": 1})).await.unwrap();
        assert_eq!(store.writes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_persistent_conflict_fails() {
        let store = Arc::new(TestStore {
            cas: true,
            conflicts_left: AtomicU32::new(10),
            ..Default::default()
        });
        let svc = service(store.clone(), TestLimiter::Allow);

        let err = svc
            .submit("k", &json!({"name": "A", "score": 1}))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Store(StoreError::Conflict(3))));
    }

    #[tokio::test]
    async fn test_corrupt_record_is_a_store_error() {
        let store = Arc::new(TestStore::default());
        store.set("leaderboard", &json!("not a list")).await.unwrap();
        let svc = service(store, TestLimiter::Allow);

        assert!(matches!(
            svc.top().await,
            Err(DomainError::Store(StoreError::Serialization(_)))
        ));
    }
}
