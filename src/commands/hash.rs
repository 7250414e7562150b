//! Password hashing commands.

use std::sync::Arc;

use clap::Args;

use abyss_auth::password::{PasswordHasher, classify};
use abyss_auth::random::RandomSource;
use abyss_core::config::AppConfig;
use abyss_core::error::AppError;

use crate::output::{self, OutputFormat};

/// Arguments for `hash`
#[derive(Debug, Args)]
pub struct HashArgs {
    /// Scheme to use instead of the configured default (bcrypt, argon2, scrypt)
    #[arg(short, long)]
    pub scheme: Option<String>,

    /// Password; read from stdin when omitted
    pub password: Option<String>,
}

/// Arguments for `verify`
#[derive(Debug, Args)]
pub struct VerifyArgs {
    /// Stored hash to check against
    #[arg(long)]
    pub hash: String,

    /// Password; read from stdin when omitted
    pub password: Option<String>,
}

/// Hash a password and print the stored form
pub async fn hash(
    args: &HashArgs,
    config: &AppConfig,
    random: Arc<dyn RandomSource>,
    format: OutputFormat,
) -> Result<(), AppError> {
    let hasher = PasswordHasher::new(&config.hashing, random)?;
    let password = super::secret_or_stdin(args.password.as_deref(), "password")?;
    let scheme = args.scheme.clone();

    let stored = tokio::task::spawn_blocking(move || match scheme {
        Some(name) => hasher.hash_named(&password, &name),
        None => hasher.hash(&password, None),
    })
    .await
    .map_err(|e| AppError::internal(format!("Hashing task failed: {e}")))??;

    tracing::debug!(scheme = %classify(&stored), "Password hashed");
    output::print_value("hash", &stored, format);
    Ok(())
}

/// Verify a password against a stored hash; fails when it does not match
pub async fn verify(
    args: &VerifyArgs,
    config: &AppConfig,
    random: Arc<dyn RandomSource>,
    format: OutputFormat,
) -> Result<(), AppError> {
    let hasher = PasswordHasher::new(&config.hashing, random)?;
    let password = super::secret_or_stdin(args.password.as_deref(), "password")?;
    let stored = args.hash.clone();
    let tag = classify(&stored);

    let valid = tokio::task::spawn_blocking(move || hasher.verify(&password, &stored))
        .await
        .map_err(|e| AppError::internal(format!("Verification task failed: {e}")))?;

    if !valid {
        return Err(AppError::invalid_credentials());
    }
    output::print_value("scheme", tag.to_string().as_str(), format);
    Ok(())
}
