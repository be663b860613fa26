//! AES-256-GCM encryption and decryption of individual string fields.
//!
//! **Algorithm choice:** AES-256-GCM with a random 128-bit IV and a per-value
//! key derived by scrypt from the master key and a random 32-byte salt. Equal
//! plaintexts produce unrelated envelopes, so envelopes leak nothing about
//! equality. Use [`crate::index::index_hash`] when equality search is needed.

use std::sync::Arc;

use aes_gcm::{
    aead::{consts::U16, rand_core::RngCore, Aead, KeyInit, OsRng},
    aes::Aes256,
    AesGcm, Nonce,
};

use super::{kdf, Envelope, IV_LEN, SALT_LEN};
use crate::error::{DecryptionError, EncryptionError};
use crate::key::MasterKey;

/// AES-256-GCM with a 16-byte nonce and the standard 16-byte tag.
type Aes256Gcm16 = AesGcm<Aes256, U16>;

/// Encrypts and decrypts single string values into self-contained envelopes.
///
/// Cheap to clone; all clones share the same immutable [`MasterKey`].
#[derive(Clone, Debug)]
pub struct EnvelopeCipher {
    key: Arc<MasterKey>,
}

impl EnvelopeCipher {
    /// Create a cipher over a resolved master key.
    pub fn new(key: Arc<MasterKey>) -> Self {
        Self { key }
    }

    /// The master key this cipher uses.
    pub fn master_key(&self) -> &MasterKey {
        &self.key
    }

    /// Encrypt `plaintext` into a base64 envelope.
    ///
    /// # Errors
    ///
    /// Returns [`EncryptionError::Random`] if the OS CSPRNG fails,
    /// [`EncryptionError::Derivation`] if scrypt fails and
    /// [`EncryptionError::Aead`] on an internal AEAD error.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, EncryptionError> {
        let mut salt = [0u8; SALT_LEN];
        let mut iv = [0u8; IV_LEN];
        OsRng
            .try_fill_bytes(&mut salt)
            .map_err(|_| EncryptionError::Random)?;
        OsRng
            .try_fill_bytes(&mut iv)
            .map_err(|_| EncryptionError::Random)?;

        let derived =
            kdf::derive_key(self.key.expose(), &salt).map_err(|_| EncryptionError::Derivation)?;
        let cipher = Aes256Gcm16::new_from_slice(&derived[..]).map_err(|_| EncryptionError::Aead)?;

        let sealed = cipher
            .encrypt(Nonce::<U16>::from_slice(&iv), plaintext.as_bytes())
            .map_err(|_| EncryptionError::Aead)?;

        let envelope = Envelope { salt, iv, sealed };
        debug_assert_eq!(envelope.ciphertext_len(), plaintext.len());
        Ok(envelope.to_base64())
    }

    /// Decrypt a base64 envelope produced by [`EnvelopeCipher::encrypt`].
    ///
    /// # Errors
    ///
    /// Returns a [`DecryptionError`] if the envelope is malformed, too short,
    /// fails authentication, or does not hold UTF-8. No plaintext is returned
    /// in any of these cases.
    pub fn decrypt(&self, envelope: &str) -> Result<String, DecryptionError> {
        let envelope = Envelope::from_base64(envelope)?;

        let derived = kdf::derive_key(self.key.expose(), &envelope.salt)
            .map_err(|_| DecryptionError::Derivation)?;
        let cipher =
            Aes256Gcm16::new_from_slice(&derived[..]).map_err(|_| DecryptionError::Derivation)?;

        let plaintext = cipher
            .decrypt(Nonce::<U16>::from_slice(&envelope.iv), envelope.sealed.as_slice())
            .map_err(|_| DecryptionError::Authentication)?;

        String::from_utf8(plaintext).map_err(|_| DecryptionError::Utf8)
    }

    /// [`EnvelopeCipher::encrypt`], passing `None` through unchanged.
    pub fn encrypt_optional(&self, plaintext: Option<&str>) -> Result<Option<String>, EncryptionError> {
        plaintext.map(|p| self.encrypt(p)).transpose()
    }

    /// [`EnvelopeCipher::decrypt`], passing `None` through unchanged.
    pub fn decrypt_optional(&self, envelope: Option<&str>) -> Result<Option<String>, DecryptionError> {
        envelope.map(|e| self.decrypt(e)).transpose()
    }
}
