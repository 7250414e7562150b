//! Cipher failure kinds.

use thiserror::Error;

use abyss_core::error::AppError;

/// Why a decryption failed.
///
/// The two kinds are kept apart for diagnostics. At the trust boundary
/// ([`super::SecretVault::reveal_secret`]) they collapse into one error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CipherError {
    /// The input was not `hex(iv):hex(ciphertext)` with a 16-byte IV.
    #[error("malformed encrypted value: {0}")]
    Format(String),
    /// Padding or UTF-8 decoding failed: wrong key, corruption, or tampering.
    #[error("decryption failed: {0}")]
    Decrypt(String),
}

impl From<CipherError> for AppError {
    fn from(err: CipherError) -> Self {
        match &err {
            CipherError::Format(_) => AppError::format(err.to_string()),
            CipherError::Decrypt(_) => AppError::cipher(err.to_string()),
        }
    }
}
