//! Domain-level error types.

use std::time::Duration;

use thiserror::Error;

use crate::ports::StoreError;

/// Domain errors - failures of a leaderboard operation.
///
/// The `Display` text of the client-caused variants is the short reason
/// returned to the caller.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid payload")]
    InvalidPayload,

    #[error("Invalid score range")]
    InvalidScoreRange,

    #[error("Too many submissions")]
    RateLimited { retry_after: Duration },

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}
