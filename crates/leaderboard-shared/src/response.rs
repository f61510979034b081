//! Standardized API response bodies.
//!
//! Every response is a JSON object (or, for the board itself, an array):
//! failures carry a short `error` reason, acknowledgements a `message`.

use serde::{Deserialize, Serialize};

/// Error body: `{"error": "<reason>"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }

    // Common error bodies
    pub fn method_not_allowed() -> Self {
        Self::new("Method not allowed")
    }

    pub fn too_many_submissions() -> Self {
        Self::new("Too many submissions")
    }
}

/// Acknowledgement body: `{"message": "<text>"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn score_submitted() -> Self {
        Self::new("Score submitted")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shapes() {
        assert_eq!(
            serde_json::to_string(&ErrorResponse::method_not_allowed()).unwrap(),
            r#"{"error":"Method not allowed"}"#
        );
        assert_eq!(
            serde_json::to_string(&MessageResponse::score_submitted()).unwrap(),
            r#"{"message":"Score submitted"}"#
        );
    }
}
