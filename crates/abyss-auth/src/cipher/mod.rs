//! Symmetric encryption of secrets at rest.
//!
//! AES-256-CBC with PKCS#7 padding and a random IV per value, serialized as
//! `hex(iv):hex(ciphertext)`. Keys come from a passphrase (scrypt with a
//! fixed application salt) or from the random source.

pub mod blob;
pub mod error;
pub mod key;
pub mod symmetric;
pub mod vault;

pub use blob::{EncryptedBlob, IV_LEN, is_valid_encrypted_string};
pub use error::CipherError;
pub use key::{DerivedKey, KEY_LEN};
pub use symmetric::SymmetricCipher;
pub use vault::SecretVault;
