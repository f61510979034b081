//! # Leaderboard Core
//!
//! The domain layer of the leaderboard service.
//! Score validation, ranking policy and the two leaderboard operations live here,
//! written against ports so that storage, throttling and time are injected.

pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use error::DomainError;
pub use service::{LeaderboardConfig, LeaderboardService};
