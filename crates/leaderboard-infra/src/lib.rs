//! # Leaderboard Infrastructure
//!
//! Concrete implementations of the ports defined in `leaderboard-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `redis` - Redis-backed store and rate limiter
//! - `edge-config` - Vercel Edge Config store over HTTP

pub mod clock;
pub mod rate_limit;
pub mod store;

// Re-exports - In-Memory
pub use clock::{ManualClock, SystemClock};
pub use rate_limit::{InMemoryRateLimiter, RateLimitConfig};
pub use store::InMemoryStore;

// Re-exports - Remote
#[cfg(feature = "edge-config")]
pub use store::{EdgeConfigConfig, EdgeConfigStore};
#[cfg(feature = "redis")]
pub use rate_limit::{RedisRateLimitConfig, RedisRateLimiter};
#[cfg(feature = "redis")]
pub use store::{RedisConfig, RedisStore};
