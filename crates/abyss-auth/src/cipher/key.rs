//! 256-bit key material for the secret cipher.

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use abyss_core::error::AppError;

use crate::constant_time::constant_time_eq;
use crate::kdf::scrypt_derive;
use crate::random::RandomSource;

/// AES-256 key length.
pub const KEY_LEN: usize = 32;

/// Application-wide salt for passphrase-derived keys.
const APP_SALT: &[u8] = b"cipher_salt";

/// A 32-byte symmetric key, wiped from memory on drop.
///
/// This subsystem never persists keys. `Debug` does not print the bytes.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey([u8; KEY_LEN]);

impl DerivedKey {
    /// Derives a key from a passphrase with scrypt and the fixed
    /// application salt. Deliberately slow.
    pub fn derive(passphrase: &str) -> Result<Self, AppError> {
        let mut key = [0u8; KEY_LEN];
        scrypt_derive(passphrase.as_bytes(), APP_SALT, &mut key).map_err(AppError::internal)?;
        Ok(Self(key))
    }

    /// Generates a key directly from the random source.
    pub fn generate(random: &dyn RandomSource) -> Self {
        let mut key = [0u8; KEY_LEN];
        random.fill_bytes(&mut key);
        Self(key)
    }

    /// Wraps existing key bytes.
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Parses a 64-character hex key.
    pub fn from_hex(encoded: &str) -> Result<Self, AppError> {
        let bytes = hex::decode(encoded)
            .map_err(|e| AppError::configuration(format!("Invalid key encoding: {e}")))?;
        let bytes: [u8; KEY_LEN] = bytes.try_into().map_err(|v: Vec<u8>| {
            AppError::configuration(format!("Key must be {KEY_LEN} bytes, got {}", v.len()))
        })?;
        Ok(Self(bytes))
    }

    /// Hex encoding, for handing generated keys to secure storage.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub(crate) fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl PartialEq for DerivedKey {
    fn eq(&self, other: &Self) -> bool {
        constant_time_eq(&self.0, &other.0)
    }
}

impl Eq for DerivedKey {}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DerivedKey(<redacted>)")
    }
}
