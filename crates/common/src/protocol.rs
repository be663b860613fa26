//! Request and response types for the fieldcrypt HTTP API.
//!
//! All bodies are JSON. Payloads are arbitrary JSON records; only their string
//! leaves are transformed.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Record endpoints
// ---------------------------------------------------------------------------

/// Request body for `POST /encrypt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptRequest {
    /// Arbitrary JSON record whose string leaves will be encrypted.
    pub payload: serde_json::Value,
}

/// Request body for `POST /decrypt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecryptRequest {
    /// JSON record whose string leaves hold envelopes.
    pub payload: serde_json::Value,
    /// Fail on any leaf that is not a valid envelope instead of returning it
    /// unchanged.
    #[serde(default)]
    pub strict: bool,
}

/// Successful response body for `POST /encrypt` and `POST /decrypt`.
///
/// `payload` mirrors the request shape with string leaves transformed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordResponse {
    /// Transformed JSON record.
    pub payload: serde_json::Value,
}

// ---------------------------------------------------------------------------
// Index hash endpoint
// ---------------------------------------------------------------------------

/// Request body for `POST /hash`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashRequest {
    /// Plaintext value to index.
    pub value: String,
}

/// Response body for `POST /hash`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashResponse {
    /// Lowercase hex SHA-256 digest.
    pub digest: String,
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Standard error response body returned on any non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short machine-readable error code (e.g. `"bad_request"`).
    pub code: String,
    /// Human-readable description safe to expose to callers.
    pub message: String,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<&crate::ServiceError> for ErrorResponse {
    fn from(err: &crate::ServiceError) -> Self {
        Self::new(err.code(), err.to_string())
    }
}
