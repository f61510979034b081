//! Key-value store implementations - in-memory, Redis and Vercel Edge Config.

mod memory;

pub use memory::InMemoryStore;

#[cfg(feature = "redis")]
mod redis;
#[cfg(feature = "redis")]
pub use self::redis::{RedisConfig, RedisStore};

#[cfg(feature = "edge-config")]
mod edge_config;
#[cfg(feature = "edge-config")]
pub use edge_config::{EdgeConfigConfig, EdgeConfigStore};
