//! Middleware modules.

pub mod client_key;
pub mod error;
