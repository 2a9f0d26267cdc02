//! Generic response bodies.

use serde::{Deserialize, Serialize};

/// Error body returned for every failed request: `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }

    pub fn no_token() -> Self {
        Self::new("No token provided")
    }

    pub fn invalid_token() -> Self {
        Self::new("Invalid token")
    }

    pub fn invalid_credentials() -> Self {
        Self::new("Invalid credentials")
    }

    pub fn internal_error() -> Self {
        Self::new("Internal server error")
    }
}

/// Plain acknowledgement, e.g. `{"message": "Post deleted"}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
