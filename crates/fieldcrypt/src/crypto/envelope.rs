//! [`Envelope`]: the parsed binary layout of one encrypted value.

use base64::{engine::general_purpose::STANDARD, Engine as _};

use super::{IV_LEN, MIN_ENVELOPE_LEN, SALT_LEN};
use crate::error::DecryptionError;

/// A parsed envelope.
///
/// The persisted representation is standard padded base64 of
/// `salt || iv || ciphertext || tag`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// scrypt salt used to derive this envelope's AES key.
    pub salt: [u8; SALT_LEN],
    /// GCM initialisation vector.
    pub iv: [u8; IV_LEN],
    /// Ciphertext followed by the 16-byte authentication tag.
    pub sealed: Vec<u8>,
}

impl Envelope {
    /// Encode to the persisted base64 text form.
    pub fn to_base64(&self) -> String {
        let mut raw = Vec::with_capacity(SALT_LEN + IV_LEN + self.sealed.len());
        raw.extend_from_slice(&self.salt);
        raw.extend_from_slice(&self.iv);
        raw.extend_from_slice(&self.sealed);
        STANDARD.encode(raw)
    }

    /// Parse the persisted base64 text form.
    ///
    /// # Errors
    ///
    /// Returns [`DecryptionError::Encoding`] if `s` is not valid base64 and
    /// [`DecryptionError::Length`] if the decoded bytes cannot hold a salt,
    /// IV and tag.
    pub fn from_base64(s: &str) -> Result<Self, DecryptionError> {
        let raw = STANDARD.decode(s).map_err(|_| DecryptionError::Encoding)?;
        if raw.len() < MIN_ENVELOPE_LEN {
            return Err(DecryptionError::Length { len: raw.len() });
        }

        let (salt_bytes, rest) = raw.split_at(SALT_LEN);
        let (iv_bytes, sealed) = rest.split_at(IV_LEN);

        let mut salt = [0u8; SALT_LEN];
        salt.copy_from_slice(salt_bytes);
        let mut iv = [0u8; IV_LEN];
        iv.copy_from_slice(iv_bytes);

        Ok(Self {
            salt,
            iv,
            sealed: sealed.to_vec(),
        })
    }

    /// Length of the ciphertext without the tag, equal to the plaintext length.
    pub fn ciphertext_len(&self) -> usize {
        self.sealed.len().saturating_sub(super::TAG_LEN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::TAG_LEN;

    fn sample() -> Envelope {
        Envelope {
            salt: [0x11; SALT_LEN],
            iv: [0x22; IV_LEN],
            sealed: vec![0x33; 5 + TAG_LEN],
        }
    }

    #[test]
    fn layout_is_salt_iv_sealed() {
        let env = sample();
        let raw = STANDARD.decode(env.to_base64()).unwrap();
        assert_eq!(raw.len(), SALT_LEN + IV_LEN + 5 + TAG_LEN);
        assert!(raw[..SALT_LEN].iter().all(|b| *b == 0x11));
        assert!(raw[SALT_LEN..SALT_LEN + IV_LEN].iter().all(|b| *b == 0x22));
        assert!(raw[SALT_LEN + IV_LEN..].iter().all(|b| *b == 0x33));
    }

    #[test]
    fn parse_recovers_fields() {
        let env = sample();
        let parsed = Envelope::from_base64(&env.to_base64()).unwrap();
        assert_eq!(parsed, env);
        assert_eq!(parsed.ciphertext_len(), 5);
    }

    #[test]
    fn rejects_non_base64() {
        assert_eq!(
            Envelope::from_base64("plain unencrypted text"),
            Err(DecryptionError::Encoding)
        );
    }

    #[test]
    fn rejects_short_input() {
        let short = STANDARD.encode([0u8; MIN_ENVELOPE_LEN - 1]);
        assert_eq!(
            Envelope::from_base64(&short),
            Err(DecryptionError::Length {
                len: MIN_ENVELOPE_LEN - 1
            })
        );
    }

    #[test]
    fn accepts_minimum_length() {
        let min = STANDARD.encode([0u8; MIN_ENVELOPE_LEN]);
        let env = Envelope::from_base64(&min).unwrap();
        assert_eq!(env.sealed.len(), TAG_LEN);
        assert_eq!(env.ciphertext_len(), 0);
    }
}
