//! scrypt key derivation with the fixed cost parameters shared by the
//! password hasher and the secret cipher.

use scrypt::Params;

/// log2(N) for N = 16384.
pub(crate) const SCRYPT_LOG_N: u8 = 14;
/// Block size.
pub(crate) const SCRYPT_R: u32 = 8;
/// Parallelization.
pub(crate) const SCRYPT_P: u32 = 1;

/// Derives `out.len()` bytes from `secret` and `salt`.
///
/// The parameters are not encoded in any stored artifact, so they can
/// never change without breaking existing hashes and keys.
pub(crate) fn scrypt_derive(secret: &[u8], salt: &[u8], out: &mut [u8]) -> Result<(), String> {
    let params = Params::new(SCRYPT_LOG_N, SCRYPT_R, SCRYPT_P, out.len())
        .map_err(|e| format!("invalid scrypt parameters: {e}"))?;
    scrypt::scrypt(secret, salt, &params, out).map_err(|e| format!("scrypt failed: {e}"))
}
