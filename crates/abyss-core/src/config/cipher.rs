//! At-rest secret encryption configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Key material for the secret vault.
///
/// Exactly one source is used: `key_hex` wins over `passphrase` when both
/// are present.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct CipherConfig {
    /// Raw 32-byte key, hex encoded (64 characters).
    #[serde(default)]
    pub key_hex: Option<String>,
    /// Passphrase the key is derived from with scrypt.
    #[serde(default)]
    pub passphrase: Option<String>,
}

impl CipherConfig {
    /// Requires one usable key source.
    pub fn validate(&self) -> Result<(), AppError> {
        match (&self.key_hex, &self.passphrase) {
            (Some(hex), _) => {
                if hex.len() != 64 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
                    return Err(AppError::configuration(
                        "cipher.key_hex must be 64 hexadecimal characters",
                    ));
                }
                Ok(())
            }
            (None, Some(passphrase)) if !passphrase.is_empty() => Ok(()),
            _ => Err(AppError::configuration(
                "cipher.key_hex or cipher.passphrase must be set",
            )),
        }
    }
}

impl fmt::Debug for CipherConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CipherConfig")
            .field("key_hex", &self.key_hex.as_ref().map(|_| "<redacted>"))
            .field("passphrase", &self.passphrase.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
