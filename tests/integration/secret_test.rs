//! Integration tests for at-rest secret encryption.

mod helpers;

use std::sync::Arc;

use abyss_auth::cipher::{DerivedKey, SecretVault, SymmetricCipher, is_valid_encrypted_string};
use abyss_auth::random::{OsRandom, SeededRandom};
use abyss_core::config::CipherConfig;
use abyss_core::error::ErrorKind;
use helpers::test_config;

fn vault() -> SecretVault {
    SecretVault::from_config(&test_config().cipher, Arc::new(OsRandom)).unwrap()
}

fn is_lower_hex_blob(value: &str) -> bool {
    let Some((iv, data)) = value.split_once(':') else {
        return false;
    };
    let lower_hex = |s: &str| s.bytes().all(|c| c.is_ascii_digit() || (b'a'..=b'f').contains(&c));
    iv.len() == 32 && !data.is_empty() && lower_hex(iv) && lower_hex(data)
}

#[test]
fn test_topsecret_round_trip() {
    let vault = vault();
    let blob = vault.protect_secret("topsecret").to_string();

    assert!(is_lower_hex_blob(&blob));
    assert!(is_valid_encrypted_string(&blob));
    assert_eq!(vault.reveal_secret(&blob).unwrap(), "topsecret");
}

#[test]
fn test_wrong_key_and_malformed_input_look_the_same() {
    let vault = vault();
    let other = SecretVault::new(DerivedKey::generate(&OsRandom), Arc::new(OsRandom));
    let foreign = other.protect_secret("topsecret").to_string();

    let errors = [
        vault.reveal_secret(&foreign).unwrap_err(),
        vault.reveal_secret("plainly-not-encrypted").unwrap_err(),
        vault.reveal_secret(&format!("{}:abcd", "00".repeat(8))).unwrap_err(),
        vault.reveal_secret("").unwrap_err(),
    ];
    for err in &errors {
        assert!(err.is(ErrorKind::Cipher));
        assert_eq!(err.to_string(), errors[0].to_string());
    }
}

#[test]
fn test_passphrase_and_derived_hex_key_interoperate() {
    let passphrase = CipherConfig {
        key_hex: None,
        passphrase: Some("rotate me yearly".to_string()),
    };
    let from_passphrase = SecretVault::from_config(&passphrase, Arc::new(OsRandom)).unwrap();

    let hex = CipherConfig {
        key_hex: Some(DerivedKey::derive("rotate me yearly").unwrap().to_hex()),
        passphrase: None,
    };
    let from_hex = SecretVault::from_config(&hex, Arc::new(OsRandom)).unwrap();

    let blob = from_passphrase.protect_secret("db-password").to_string();
    assert_eq!(from_hex.reveal_secret(&blob).unwrap(), "db-password");
}

#[test]
fn test_unicode_and_long_values() {
    let vault = vault();
    let long = "x".repeat(10_000);
    for plaintext in ["", "é", "密码 🔑", long.as_str()] {
        let blob = vault.protect_secret(plaintext).to_string();
        assert_eq!(vault.reveal_secret(&blob).unwrap(), plaintext);
    }
}

#[test]
fn test_fixed_iv_round_trip_with_seeded_key() {
    let random = Arc::new(SeededRandom::new(99));
    let cipher = SymmetricCipher::new(random);
    let key = cipher.generate_key();
    let iv = [0x42; 16];

    let first = cipher.encrypt_with_iv("searchable@example.com", &key, &iv);
    let second = cipher.encrypt_with_iv("searchable@example.com", &key, &iv);
    assert_eq!(first, second);
    assert_eq!(
        cipher.decrypt_with_iv(&first, &key, &iv).unwrap(),
        "searchable@example.com"
    );
}

#[test]
fn test_invalid_key_config_aborts() {
    let config = CipherConfig {
        key_hex: Some("abc".to_string()),
        passphrase: None,
    };
    let err = SecretVault::from_config(&config, Arc::new(OsRandom)).unwrap_err();
    assert!(err.is(ErrorKind::Configuration));
}
