//! Common error types shared across crates.

use thiserror::Error;

/// Top-level service error type.
///
/// Variants map to HTTP status codes returned to callers:
/// - [`ServiceError::BadRequest`] → 400
/// - [`ServiceError::DecryptionFailure`] → 422
/// - [`ServiceError::EncryptionFailure`] → 500
/// - [`ServiceError::Unavailable`] → 503
///
/// Messages are shown to callers verbatim and must never contain plaintext,
/// envelopes or key material.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request was malformed.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// An envelope could not be opened; the record cannot be served.
    #[error("decryption failure: {0}")]
    DecryptionFailure(String),

    /// Encryption failed due to a crypto-layer error.
    #[error("encryption failure: {0}")]
    EncryptionFailure(String),

    /// The key is unusable or the self-test has not passed.
    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// An unexpected internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Returns the HTTP status code that should be sent for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            ServiceError::BadRequest(_) => 400,
            ServiceError::DecryptionFailure(_) => 422,
            ServiceError::EncryptionFailure(_) => 500,
            ServiceError::Unavailable(_) => 503,
            ServiceError::Internal(_) => 500,
        }
    }

    /// Short machine-readable code used in error response bodies.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::BadRequest(_) => "bad_request",
            ServiceError::DecryptionFailure(_) => "decryption_failed",
            ServiceError::EncryptionFailure(_) => "encryption_failed",
            ServiceError::Unavailable(_) => "service_unavailable",
            ServiceError::Internal(_) => "internal_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_codes() {
        assert_eq!(ServiceError::BadRequest("x".into()).http_status(), 400);
        assert_eq!(
            ServiceError::DecryptionFailure("x".into()).http_status(),
            422
        );
        assert_eq!(
            ServiceError::EncryptionFailure("x".into()).http_status(),
            500
        );
        assert_eq!(ServiceError::Unavailable("x".into()).http_status(), 503);
        assert_eq!(ServiceError::Internal("x".into()).http_status(), 500);
    }

    #[test]
    fn codes_are_snake_case() {
        assert_eq!(ServiceError::Unavailable("x".into()).code(), "service_unavailable");
        assert_eq!(ServiceError::DecryptionFailure("x".into()).code(), "decryption_failed");
    }

    #[test]
    fn display_includes_message() {
        let e = ServiceError::BadRequest("payload must be JSON".into());
        assert!(e.to_string().contains("payload must be JSON"));
    }
}
