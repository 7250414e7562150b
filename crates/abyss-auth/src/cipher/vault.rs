//! The trust-boundary facade over [`SymmetricCipher`].

use std::sync::Arc;

use tracing::warn;

use abyss_core::config::CipherConfig;
use abyss_core::error::AppError;
use abyss_core::result::AppResult;

use super::blob::{EncryptedBlob, IV_LEN};
use super::error::CipherError;
use super::key::DerivedKey;
use super::symmetric::SymmetricCipher;
use crate::random::RandomSource;

/// Message returned for every reveal failure.
const REVEAL_FAILED: &str = "Unable to reveal secret";

/// Encrypts and decrypts application secrets under one configured key.
///
/// Callers never learn why a reveal failed: malformed input and a failed
/// decryption produce the same [`AppError`]. The distinction is written to
/// the `audit` target.
#[derive(Clone)]
pub struct SecretVault {
    cipher: SymmetricCipher,
    key: Arc<DerivedKey>,
}

impl std::fmt::Debug for SecretVault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretVault")
            .field("key", &self.key)
            .finish()
    }
}

impl SecretVault {
    /// Creates a vault around an existing key.
    pub fn new(key: DerivedKey, random: Arc<dyn RandomSource>) -> Self {
        Self {
            cipher: SymmetricCipher::new(random),
            key: Arc::new(key),
        }
    }

    /// Builds the vault from configuration.
    ///
    /// `key_hex` is used when present, otherwise the key is derived from
    /// `passphrase`. Derivation runs scrypt and takes noticeable time, so
    /// this belongs in startup code.
    pub fn from_config(config: &CipherConfig, random: Arc<dyn RandomSource>) -> AppResult<Self> {
        config.validate()?;
        let key = match (&config.key_hex, &config.passphrase) {
            (Some(hex), _) => DerivedKey::from_hex(hex)?,
            (None, Some(passphrase)) => DerivedKey::derive(passphrase)?,
            (None, None) => {
                return Err(AppError::configuration(
                    "cipher.key_hex or cipher.passphrase must be set",
                ));
            }
        };
        Ok(Self::new(key, random))
    }

    /// Encrypts a secret under a fresh IV.
    pub fn protect_secret(&self, plaintext: &str) -> EncryptedBlob {
        self.cipher.encrypt(plaintext, &self.key)
    }

    /// Decrypts a `hex(iv):hex(ciphertext)` value.
    pub fn reveal_secret(&self, blob: &str) -> AppResult<String> {
        let parsed = match blob.parse::<EncryptedBlob>() {
            Ok(parsed) => parsed,
            Err(e) => {
                // Spend one block decryption so malformed input is not
                // noticeably faster than a bad key.
                let dummy = EncryptedBlob {
                    iv: [0; IV_LEN],
                    ciphertext: vec![0; IV_LEN],
                };
                let _ = self.cipher.decrypt_blob(&dummy, &self.key);
                return Err(self.reveal_failed(e));
            }
        };
        self.cipher
            .decrypt_blob(&parsed, &self.key)
            .map_err(|e| self.reveal_failed(e))
    }

    fn reveal_failed(&self, cause: CipherError) -> AppError {
        warn!(target: "audit", cause = %cause, "Secret reveal rejected");
        AppError::cipher(REVEAL_FAILED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::OsRandom;
    use abyss_core::error::ErrorKind;

    fn vault() -> SecretVault {
        let config = CipherConfig {
            key_hex: Some("11".repeat(32)),
            passphrase: None,
        };
        SecretVault::from_config(&config, Arc::new(OsRandom)).unwrap()
    }

    #[test]
    fn test_protect_and_reveal() {
        let vault = vault();
        let blob = vault.protect_secret("smtp-password").to_string();
        assert_eq!(vault.reveal_secret(&blob).unwrap(), "smtp-password");
    }

    #[test]
    fn test_failures_are_indistinguishable() {
        let vault = vault();
        let other = SecretVault::new(DerivedKey::from_bytes([0x22; 32]), Arc::new(OsRandom));
        let foreign = other.protect_secret("topsecret").to_string();

        let malformed = vault.reveal_secret("not-a-blob").unwrap_err();
        let wrong_key = vault.reveal_secret(&foreign).unwrap_err();

        assert!(malformed.is(ErrorKind::Cipher));
        assert!(wrong_key.is(ErrorKind::Cipher));
        assert_eq!(malformed.message, wrong_key.message);
    }

    #[test]
    fn test_passphrase_config() {
        let config = CipherConfig {
            key_hex: None,
            passphrase: Some("correct horse".to_string()),
        };
        let a = SecretVault::from_config(&config, Arc::new(OsRandom)).unwrap();
        let b = SecretVault::from_config(&config, Arc::new(OsRandom)).unwrap();
        let blob = a.protect_secret("shared").to_string();
        assert_eq!(b.reveal_secret(&blob).unwrap(), "shared");
    }

    #[test]
    fn test_missing_key_is_configuration_error() {
        let err = SecretVault::from_config(&CipherConfig::default(), Arc::new(OsRandom)).unwrap_err();
        assert!(err.is(ErrorKind::Configuration));
    }
}
