//! Field-level envelope encryption for protected health information.
//!
//! - [`key`] resolves and validates the process master key.
//! - [`crypto`] seals single strings into base64 envelopes with AES-256-GCM
//!   under a per-value scrypt-derived key.
//! - [`codec`] applies the cipher to every string leaf of a JSON record.
//! - [`index`] produces one-way digests for equality search.
//! - [`health`] runs the round-trip self-test and builds the status report.
//!
//! All operations are synchronous and share no mutable state; the resolved
//! master key is immutable for the process lifetime.
//!
//! ```no_run
//! use fieldcrypt::{KeyProvider, RecordCodec};
//! use serde_json::json;
//!
//! let provider = KeyProvider::from_env()?;
//! let cipher = provider.cipher()?;
//! let codec = RecordCodec::new(&cipher);
//!
//! let stored = codec.encrypt_record(&json!({"name": "John Doe", "mrn": ["A-1", 7]}))?;
//! let read_back = codec.decrypt_record(&stored);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod codec;
pub mod crypto;
pub mod error;
pub mod health;
pub mod index;
pub mod key;

pub use codec::RecordCodec;
pub use crypto::EnvelopeCipher;
pub use error::{ConfigError, DecryptionError, EncryptionError};
pub use health::{self_test, status_report, EncryptionStatus};
pub use index::index_hash;
pub use key::{DeploymentMode, KeyProvider, KeySettings, MasterKey};
