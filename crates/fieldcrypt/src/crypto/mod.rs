//! AES-256-GCM envelope encryption primitives.
//!
//! This module is intentionally free of configuration and record traversal.
//! It provides the single-value encrypt/decrypt operations used by the codec.
//!
//! # Envelope format
//!
//! ```text
//! base64( salt[32] || iv[16] || ciphertext[len(plaintext)] || tag[16] )
//! ```
//!
//! Each call draws a fresh salt and IV and derives a one-off AES key from the
//! master key and salt with scrypt, so equal plaintexts never produce equal
//! envelopes.

pub mod cipher;
pub mod envelope;
pub mod kdf;

pub use cipher::EnvelopeCipher;
pub use envelope::Envelope;

/// Algorithm label reported in diagnostics.
pub const ALGORITHM: &str = "aes-256-gcm";

/// Byte length of the master key and of every derived key (256 bits).
pub const KEY_LEN: usize = 32;

/// Byte length of the per-envelope scrypt salt.
pub const SALT_LEN: usize = 32;

/// Byte length of the per-envelope GCM IV (128 bits).
pub const IV_LEN: usize = 16;

/// Byte length of the GCM authentication tag.
pub const TAG_LEN: usize = 16;

/// Decoded size of an envelope around an empty plaintext.
pub const MIN_ENVELOPE_LEN: usize = SALT_LEN + IV_LEN + TAG_LEN;
