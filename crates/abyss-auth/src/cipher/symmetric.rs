//! AES-256-CBC encryption of secrets at rest.

use std::sync::Arc;

use aes::Aes256;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, Iv, Key, KeyIvInit, block_padding::Pkcs7};

use super::blob::{EncryptedBlob, IV_LEN};
use super::error::CipherError;
use super::key::DerivedKey;
use crate::random::RandomSource;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// Encrypts and decrypts strings with AES-256-CBC and PKCS#7 padding.
///
/// CBC provides confidentiality only. There is no authentication tag, so
/// tampering is detected only when it happens to break the padding or the
/// UTF-8 decoding. Callers that need tamper evidence must add a MAC.
#[derive(Clone)]
pub struct SymmetricCipher {
    /// IV source.
    random: Arc<dyn RandomSource>,
}

impl std::fmt::Debug for SymmetricCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymmetricCipher").finish_non_exhaustive()
    }
}

impl SymmetricCipher {
    /// Creates a cipher drawing IVs from `random`.
    pub fn new(random: Arc<dyn RandomSource>) -> Self {
        Self { random }
    }

    /// Generates a random key from the same source as the IVs.
    pub fn generate_key(&self) -> DerivedKey {
        DerivedKey::generate(self.random.as_ref())
    }

    /// Encrypts under a fresh random IV.
    pub fn encrypt(&self, plaintext: &str, key: &DerivedKey) -> EncryptedBlob {
        let mut iv = [0u8; IV_LEN];
        self.random.fill_bytes(&mut iv);
        let ciphertext = encrypt_raw(plaintext.as_bytes(), key, &iv);
        EncryptedBlob { iv, ciphertext }
    }

    /// Parses and decrypts a `hex(iv):hex(ciphertext)` string.
    pub fn decrypt(&self, blob: &str, key: &DerivedKey) -> Result<String, CipherError> {
        let blob: EncryptedBlob = blob.parse()?;
        self.decrypt_blob(&blob, key)
    }

    /// Decrypts an already parsed blob.
    pub fn decrypt_blob(&self, blob: &EncryptedBlob, key: &DerivedKey) -> Result<String, CipherError> {
        decrypt_raw(&blob.ciphertext, key, &blob.iv)
    }

    /// Encrypts under a caller-supplied IV and returns hex ciphertext.
    ///
    /// IV uniqueness is entirely the caller's responsibility. Reusing an IV
    /// with the same key leaks equality of plaintext prefixes. Deterministic
    /// IVs are sometimes wanted for searchable ciphertext.
    pub fn encrypt_with_iv(&self, plaintext: &str, key: &DerivedKey, iv: &[u8; IV_LEN]) -> String {
        hex::encode(encrypt_raw(plaintext.as_bytes(), key, iv))
    }

    /// Decrypts hex ciphertext produced by [`Self::encrypt_with_iv`].
    pub fn decrypt_with_iv(
        &self,
        ciphertext_hex: &str,
        key: &DerivedKey,
        iv: &[u8; IV_LEN],
    ) -> Result<String, CipherError> {
        let ciphertext = hex::decode(ciphertext_hex)
            .map_err(|e| CipherError::Format(format!("ciphertext: {e}")))?;
        decrypt_raw(&ciphertext, key, iv)
    }
}

fn encrypt_raw(plaintext: &[u8], key: &DerivedKey, iv: &[u8; IV_LEN]) -> Vec<u8> {
    Aes256CbcEnc::new(
        Key::<Aes256CbcEnc>::from_slice(key.as_bytes()),
        Iv::<Aes256CbcEnc>::from_slice(iv),
    )
    .encrypt_padded_vec_mut::<Pkcs7>(plaintext)
}

fn decrypt_raw(ciphertext: &[u8], key: &DerivedKey, iv: &[u8; IV_LEN]) -> Result<String, CipherError> {
    let plaintext = Aes256CbcDec::new(
        Key::<Aes256CbcDec>::from_slice(key.as_bytes()),
        Iv::<Aes256CbcDec>::from_slice(iv),
    )
    .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
    .map_err(|_| CipherError::Decrypt("bad padding".to_string()))?;
    String::from_utf8(plaintext).map_err(|_| CipherError::Decrypt("invalid UTF-8".to_string()))
}
