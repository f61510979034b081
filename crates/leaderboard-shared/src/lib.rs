//! # Leaderboard Shared
//!
//! Response bodies shared between the server and its clients.

pub mod response;

pub use response::{ErrorResponse, MessageResponse};
