//! Error taxonomy for the field encryption layer.
//!
//! None of these types carry key material, salts, IVs or plaintext. Their
//! `Display` output is safe to log and to return to callers.

use thiserror::Error;

use crate::crypto::MIN_ENVELOPE_LEN;

/// Master key resolution failed.
///
/// Fatal: a process that sees this error must refuse to start rather than run
/// with field encryption disabled.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No key was configured and the deployment mode is `production`.
    #[error("ENCRYPTION_KEY must be set in production (generate with: openssl rand -hex 32)")]
    MissingInProduction,

    /// The configured key does not match `^[0-9a-fA-F]{64}$`.
    #[error("invalid key format: ENCRYPTION_KEY must be a 64-character hexadecimal string")]
    InvalidFormat,

    /// The configuration source itself could not be read.
    #[error("failed to read key configuration: {0}")]
    Source(#[from] config::ConfigError),

    /// The development fallback key could not be derived.
    #[error("failed to derive development key")]
    Derivation,
}

/// A cryptographic primitive failed while producing an envelope.
///
/// Not retried automatically: failures here point at the environment (RNG,
/// allocator) rather than the input.
#[derive(Debug, Error)]
pub enum EncryptionError {
    /// The OS random source could not supply salt or IV bytes.
    #[error("secure random source unavailable")]
    Random,

    /// scrypt rejected its parameters or output length.
    #[error("key derivation failed")]
    Derivation,

    /// AES-GCM encryption failed.
    #[error("aead operation failed")]
    Aead,
}

/// An envelope could not be opened.
///
/// Never accompanied by partial plaintext.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecryptionError {
    /// The envelope is not valid standard base64.
    #[error("envelope is not valid base64")]
    Encoding,

    /// The decoded envelope is shorter than salt + IV + tag.
    #[error("envelope too short: expected at least {MIN_ENVELOPE_LEN} bytes, got {len}")]
    Length {
        /// Decoded length in bytes.
        len: usize,
    },

    /// The authentication tag did not verify (wrong key or tampered data).
    #[error("envelope authentication failed")]
    Authentication,

    /// The authenticated plaintext is not valid UTF-8.
    #[error("decrypted value is not valid UTF-8")]
    Utf8,

    /// scrypt rejected its parameters or output length.
    #[error("key derivation failed")]
    Derivation,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_error_reports_minimum() {
        let e = DecryptionError::Length { len: 10 };
        let msg = e.to_string();
        assert!(msg.contains("64"), "{msg}");
        assert!(msg.contains("10"), "{msg}");
    }

    #[test]
    fn missing_key_message_names_variable() {
        assert!(ConfigError::MissingInProduction
            .to_string()
            .contains("ENCRYPTION_KEY"));
    }
}
