//! scrypt key derivation.
//!
//! Parameters are fixed at N = 2^14, r = 8, p = 1 so that envelopes written by
//! earlier deployments keep opening.

use scrypt::{scrypt, Params};
use zeroize::Zeroizing;

use super::KEY_LEN;

/// log2 of the scrypt CPU/memory cost parameter N.
pub const SCRYPT_LOG_N: u8 = 14;
/// scrypt block size parameter.
pub const SCRYPT_R: u32 = 8;
/// scrypt parallelisation parameter.
pub const SCRYPT_P: u32 = 1;

/// Error returned when scrypt rejects its inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfError;

/// Derive a [`KEY_LEN`]-byte key from `secret` and `salt`.
///
/// The output buffer is wiped when dropped.
pub fn derive_key(secret: &[u8], salt: &[u8]) -> Result<Zeroizing<[u8; KEY_LEN]>, KdfError> {
    let params = Params::new(SCRYPT_LOG_N, SCRYPT_R, SCRYPT_P, KEY_LEN).map_err(|_| KdfError)?;
    let mut out = Zeroizing::new([0u8; KEY_LEN]);
    scrypt(secret, salt, &params, &mut out[..]).map_err(|_| KdfError)?;
    Ok(out)
}
