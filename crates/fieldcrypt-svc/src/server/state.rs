//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use fieldcrypt::{EncryptionStatus, EnvelopeCipher};

/// Application state shared across all request handlers.
///
/// All fields are cheaply cloneable so that Axum can clone the state for each
/// request without copying key material.
#[derive(Clone)]
pub struct AppState {
    /// Cipher over the resolved master key.
    pub cipher: EnvelopeCipher,
    /// Status report computed once at startup.
    pub status: Arc<EncryptionStatus>,
}

impl AppState {
    /// Create a new [`AppState`] from a cipher and its startup status report.
    pub fn new(cipher: EnvelopeCipher, status: EncryptionStatus) -> Self {
        Self {
            cipher,
            status: Arc::new(status),
        }
    }

    /// `true` once a usable key is loaded and the self-test has passed.
    pub fn ready(&self) -> bool {
        self.status.key_valid && self.status.self_test_passed
    }
}

#[cfg(test)]
impl AppState {
    /// State over a fixed test key; `ready` controls the self-test outcome.
    pub fn for_tests(ready: bool) -> Self {
        use fieldcrypt::{KeyProvider, KeySettings};

        let provider = KeyProvider::new(KeySettings {
            encryption_key: Some("0f".repeat(32)),
            app_env: "test".into(),
            node_env: None,
        });
        let cipher = provider.cipher().unwrap();
        let status = EncryptionStatus {
            enabled: ready,
            key_configured: true,
            key_valid: true,
            self_test_passed: ready,
            algorithm: "aes-256-gcm".into(),
            key_length: 32,
            mode: "test".into(),
        };
        Self::new(cipher, status)
    }
}
