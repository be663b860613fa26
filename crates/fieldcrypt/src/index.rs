//! One-way digests for equality search over encrypted fields.
//!
//! The digest is unkeyed SHA-256: equal inputs always collide on purpose. It
//! hides the value from casual inspection only and must not be treated as
//! confidential; low-entropy inputs (dates of birth, SSNs) can be brute-forced.

use sha2::{Digest, Sha256};

/// Length of an index digest in hex characters.
pub const INDEX_HASH_LEN: usize = 64;

/// Lowercase hex SHA-256 of `value`'s UTF-8 bytes.
pub fn index_hash(value: &str) -> String {
    let digest = hex::encode(Sha256::digest(value.as_bytes()));
    debug_assert_eq!(digest.len(), INDEX_HASH_LEN);
    digest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic() {
        assert_eq!(
            index_hash("patient@example.com"),
            index_hash("patient@example.com")
        );
    }

    #[test]
    fn distinct_inputs_distinct_digests() {
        assert_ne!(
            index_hash("patient@example.com"),
            index_hash("other@example.com")
        );
    }

    #[test]
    fn fixed_length_lowercase_hex() {
        for input in ["", "a", "x".repeat(10_000).as_str()] {
            let digest = index_hash(input);
            assert_eq!(digest.len(), INDEX_HASH_LEN);
            assert!(digest.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
        }
    }

    #[test]
    fn known_vector() {
        assert_eq!(
            index_hash("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
