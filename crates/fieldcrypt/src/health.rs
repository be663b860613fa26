//! Round-trip self-test and the diagnostic status report.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{error, warn};

use crate::codec::RecordCodec;
use crate::crypto::{EnvelopeCipher, ALGORITHM, KEY_LEN};
use crate::key::KeyProvider;

/// Plaintext used by [`self_test`].
pub const SELF_TEST_PLAINTEXT: &str = "Test PHI Data: Patient John Doe, DOB: 1985-03-15";

/// Record used by [`self_test`]: string, number, nested array and nested object.
pub fn self_test_record() -> Value {
    json!({
        "name": "John Doe",
        "ssn": "123-45-6789",
        "phones": ["555-0100", "555-0199"],
        "address": {
            "street": "1 Main St",
            "zip": "90210"
        },
        "visits": 3
    })
}

/// Run [`self_test_with`] on the built-in samples.
pub fn self_test(cipher: &EnvelopeCipher) -> bool {
    self_test_with(cipher, SELF_TEST_PLAINTEXT, &self_test_record())
}

/// Encrypt then decrypt `plaintext` and `record`; `true` only if both come
/// back identical.
///
/// Record decryption here is strict, so an envelope that fails to open is a
/// failure rather than a pass-through.
pub fn self_test_with(cipher: &EnvelopeCipher, plaintext: &str, record: &Value) -> bool {
    let envelope = match cipher.encrypt(plaintext) {
        Ok(e) => e,
        Err(e) => {
            error!(error = %e, "self-test: encryption failed");
            return false;
        }
    };
    match cipher.decrypt(&envelope) {
        Ok(p) if p == plaintext => {}
        Ok(_) => {
            error!("self-test: round trip produced a different value");
            return false;
        }
        Err(e) => {
            error!(error = %e, "self-test: decryption failed");
            return false;
        }
    }

    let codec = RecordCodec::new(cipher);
    let encrypted = match codec.encrypt_record(record) {
        Ok(v) => v,
        Err(e) => {
            error!(error = %e, "self-test: record encryption failed");
            return false;
        }
    };
    match codec.decrypt_record_strict(&encrypted) {
        Ok(v) if &v == record => true,
        Ok(_) => {
            error!("self-test: record round trip produced a different value");
            false
        }
        Err(e) => {
            error!(error = %e, "self-test: record decryption failed");
            false
        }
    }
}

/// Read-only diagnostic summary, safe to expose on a health endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptionStatus {
    /// A configured key is valid and the self-test passed.
    pub enabled: bool,
    /// A non-empty `ENCRYPTION_KEY` was supplied.
    pub key_configured: bool,
    /// A usable 256-bit key was resolved (configured or development).
    pub key_valid: bool,
    /// [`self_test`] succeeded with the resolved key.
    pub self_test_passed: bool,
    /// Cipher algorithm label.
    pub algorithm: String,
    /// Master key length in bytes.
    pub key_length: usize,
    /// Deployment mode label.
    pub mode: String,
}

/// Compose an [`EncryptionStatus`] from `provider`.
///
/// Runs the self-test, so it costs several key derivations.
pub fn status_report(provider: &KeyProvider) -> EncryptionStatus {
    let key_configured = provider.key_configured();
    let (key_valid, self_test_passed) = match provider.cipher() {
        Ok(cipher) => (
            cipher.master_key().len() == KEY_LEN,
            self_test(&cipher),
        ),
        Err(e) => {
            warn!(error = %e, "master key unavailable");
            (false, false)
        }
    };

    EncryptionStatus {
        enabled: key_configured && key_valid && self_test_passed,
        key_configured,
        key_valid,
        self_test_passed,
        algorithm: ALGORITHM.into(),
        key_length: KEY_LEN,
        mode: provider.mode().to_string(),
    }
}
