//! Structure-preserving encryption of nested JSON records.
//!
//! Every string leaf at every depth is replaced by its envelope; arrays keep
//! their length and order, objects keep their key set, and numbers, booleans
//! and nulls pass through untouched.
//!
//! # Legacy leniency
//!
//! [`RecordCodec::decrypt_record`] leaves a string leaf as-is when it is not a
//! valid envelope, so records written before field encryption was enabled
//! still read back. This is the only place a [`DecryptionError`] is swallowed.
//! A tampered envelope is indistinguishable from legacy text here and comes
//! back as its base64 form; callers that must detect tampering use
//! [`RecordCodec::decrypt_record_strict`].

use serde_json::Value;
use tracing::debug;

use crate::crypto::EnvelopeCipher;
use crate::error::{DecryptionError, EncryptionError};

/// Applies an [`EnvelopeCipher`] to every string leaf of a record.
#[derive(Debug, Clone, Copy)]
pub struct RecordCodec<'a> {
    cipher: &'a EnvelopeCipher,
}

impl<'a> RecordCodec<'a> {
    /// Create a codec borrowing `cipher`.
    pub fn new(cipher: &'a EnvelopeCipher) -> Self {
        Self { cipher }
    }

    /// Return a copy of `record` with every string leaf encrypted.
    ///
    /// `Value::Null` maps to `Value::Null`.
    ///
    /// # Errors
    ///
    /// Returns the first [`EncryptionError`] hit; no partially encrypted
    /// record is returned.
    pub fn encrypt_record(&self, record: &Value) -> Result<Value, EncryptionError> {
        let mut out = record.clone();
        self.encrypt_in_place(&mut out)?;
        Ok(out)
    }

    /// Return a copy of `record` with every string leaf decrypted, leaving
    /// leaves that are not valid envelopes unchanged.
    pub fn decrypt_record(&self, record: &Value) -> Value {
        let mut out = record.clone();
        self.decrypt_in_place(&mut out);
        out
    }

    /// Return a copy of `record` with every string leaf decrypted.
    ///
    /// # Errors
    ///
    /// Returns the first [`DecryptionError`] hit, including for plaintext
    /// legacy leaves.
    pub fn decrypt_record_strict(&self, record: &Value) -> Result<Value, DecryptionError> {
        let mut out = record.clone();
        self.decrypt_strict_in_place(&mut out)?;
        Ok(out)
    }

    /// Encrypt every string leaf of `value` in place.
    ///
    /// On error `value` may be partially encrypted and must be discarded.
    pub fn encrypt_in_place(&self, value: &mut Value) -> Result<(), EncryptionError> {
        match value {
            Value::String(s) => *s = self.cipher.encrypt(s)?,
            Value::Array(items) => {
                for item in items.iter_mut() {
                    self.encrypt_in_place(item)?;
                }
            }
            Value::Object(map) => {
                for (_, child) in map.iter_mut() {
                    self.encrypt_in_place(child)?;
                }
            }
            Value::Null | Value::Bool(_) | Value::Number(_) => {}
        }
        Ok(())
    }

    /// Decrypt every string leaf of `value` in place, leaving non-envelope
    /// leaves unchanged.
    pub fn decrypt_in_place(&self, value: &mut Value) {
        match value {
            Value::String(s) => match self.cipher.decrypt(s) {
                Ok(plaintext) => *s = plaintext,
                Err(e) => debug!(error = %e, "string leaf is not an envelope; left unchanged"),
            },
            Value::Array(items) => items.iter_mut().for_each(|item| self.decrypt_in_place(item)),
            Value::Object(map) => map.values_mut().for_each(|child| self.decrypt_in_place(child)),
            Value::Null | Value::Bool(_) | Value::Number(_) => {}
        }
    }

    fn decrypt_strict_in_place(&self, value: &mut Value) -> Result<(), DecryptionError> {
        match value {
            Value::String(s) => *s = self.cipher.decrypt(s)?,
            Value::Array(items) => {
                for item in items.iter_mut() {
                    self.decrypt_strict_in_place(item)?;
                }
            }
            Value::Object(map) => {
                for child in map.values_mut() {
                    self.decrypt_strict_in_place(child)?;
                }
            }
            Value::Null | Value::Bool(_) | Value::Number(_) => {}
        }
        Ok(())
    }
}
