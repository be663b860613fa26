//! [`MasterKey`]: the process-wide 256-bit secret.

use zeroize::Zeroizing;

use crate::crypto::KEY_LEN;

/// Fixed-size key buffer holding exactly [`KEY_LEN`] bytes.
///
/// Immutable once constructed and shared behind an `Arc`. The bytes are wiped
/// when the last reference drops.
pub struct MasterKey {
    bytes: Zeroizing<[u8; KEY_LEN]>,
    development: bool,
}

impl MasterKey {
    pub(crate) fn configured(bytes: Zeroizing<[u8; KEY_LEN]>) -> Self {
        Self {
            bytes,
            development: false,
        }
    }

    pub(crate) fn development(bytes: Zeroizing<[u8; KEY_LEN]>) -> Self {
        Self {
            bytes,
            development: true,
        }
    }

    /// Raw key bytes, for feeding the KDF.
    pub(crate) fn expose(&self) -> &[u8] {
        &self.bytes[..]
    }

    /// Key length in bytes. Always [`KEY_LEN`].
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always `false`; present for symmetry with [`MasterKey::len`].
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// `true` if this is the deterministic non-production fallback key.
    pub fn is_development(&self) -> bool {
        self.development
    }
}

impl std::fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material, not even in debug builds.
        f.debug_struct("MasterKey")
            .field("bytes", &"[REDACTED]")
            .field("development", &self.development)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_is_redacted() {
        let key = MasterKey::configured(Zeroizing::new([0xAB; KEY_LEN]));
        let out = format!("{key:?}");
        assert!(out.contains("REDACTED"));
        assert!(!out.to_lowercase().contains("ab, ab"));
        assert!(!out.contains("171"));
    }

    #[test]
    fn reports_length_and_origin() {
        let key = MasterKey::development(Zeroizing::new([0u8; KEY_LEN]));
        assert_eq!(key.len(), KEY_LEN);
        assert!(!key.is_empty());
        assert!(key.is_development());
    }
}
