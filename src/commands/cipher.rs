//! Key and secret-encryption commands.

use std::sync::Arc;

use clap::Args;

use abyss_auth::cipher::{DerivedKey, SecretVault};
use abyss_auth::random::RandomSource;
use abyss_core::config::AppConfig;
use abyss_core::error::AppError;

use crate::output::{self, OutputFormat};

/// Arguments for `derive-key`
#[derive(Debug, Args)]
pub struct DeriveKeyArgs {
    /// Passphrase; read from stdin when omitted
    pub passphrase: Option<String>,
}

/// Arguments for `encrypt`
#[derive(Debug, Args)]
pub struct EncryptArgs {
    /// Secret to encrypt; read from stdin when omitted
    pub plaintext: Option<String>,
}

/// Arguments for `decrypt`
#[derive(Debug, Args)]
pub struct DecryptArgs {
    /// `hex(iv):hex(ciphertext)` value
    pub blob: String,
}

/// Print a fresh random key
pub fn gen_key(random: &dyn RandomSource, format: OutputFormat) -> Result<(), AppError> {
    let key = DerivedKey::generate(random);
    output::print_value("key_hex", &key.to_hex(), format);
    Ok(())
}

/// Derive a key from a passphrase and print it
pub async fn derive_key(args: &DeriveKeyArgs, format: OutputFormat) -> Result<(), AppError> {
    let passphrase = super::secret_or_stdin(args.passphrase.as_deref(), "passphrase")?;
    let key = tokio::task::spawn_blocking(move || DerivedKey::derive(&passphrase))
        .await
        .map_err(|e| AppError::internal(format!("Key derivation task failed: {e}")))??;
    output::print_value("key_hex", &key.to_hex(), format);
    Ok(())
}

/// Encrypt a secret with the configured key
pub fn encrypt(
    args: &EncryptArgs,
    config: &AppConfig,
    random: Arc<dyn RandomSource>,
    format: OutputFormat,
) -> Result<(), AppError> {
    let vault = SecretVault::from_config(&config.cipher, random)?;
    let plaintext = super::secret_or_stdin(args.plaintext.as_deref(), "plaintext")?;
    let blob = vault.protect_secret(&plaintext);
    output::print_value("encrypted", &blob.to_string(), format);
    Ok(())
}

/// Decrypt a value with the configured key
pub fn decrypt(
    args: &DecryptArgs,
    config: &AppConfig,
    random: Arc<dyn RandomSource>,
    format: OutputFormat,
) -> Result<(), AppError> {
    let vault = SecretVault::from_config(&config.cipher, random)?;
    let plaintext = vault.reveal_secret(&args.blob)?;
    output::print_value("plaintext", &plaintext, format);
    Ok(())
}
