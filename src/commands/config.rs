//! Configuration check command.

use std::sync::Arc;

use serde::Serialize;

use abyss_auth::cipher::SecretVault;
use abyss_auth::password::PasswordHasher;
use abyss_auth::random::RandomSource;
use abyss_core::config::AppConfig;
use abyss_core::error::AppError;

use crate::output::{self, OutputFormat};

/// Non-secret summary of a validated configuration.
#[derive(Debug, Serialize)]
struct ConfigSummary<'a> {
    default_scheme: &'a str,
    token_ttl_minutes: u64,
    cookie_name: &'a str,
    cookie_secure: bool,
    upgrade_legacy_hashes: bool,
    cipher_key_source: &'static str,
    log_level: &'a str,
}

/// Validate every section and build the services that depend on them
pub fn check(
    config: &AppConfig,
    random: Arc<dyn RandomSource>,
    format: OutputFormat,
) -> Result<(), AppError> {
    config.validate()?;
    PasswordHasher::new(&config.hashing, Arc::clone(&random))?;
    SecretVault::from_config(&config.cipher, random)?;

    let summary = ConfigSummary {
        default_scheme: &config.hashing.default_scheme,
        token_ttl_minutes: config.auth.token_ttl_minutes,
        cookie_name: &config.auth.cookie_name,
        cookie_secure: config.auth.cookie_secure,
        upgrade_legacy_hashes: config.auth.upgrade_legacy_hashes,
        cipher_key_source: if config.cipher.key_hex.is_some() {
            "key_hex"
        } else {
            "passphrase"
        },
        log_level: &config.logging.level,
    };

    if format == OutputFormat::Text {
        output::print_success("Configuration is valid");
    }
    output::print_item(&summary, format);
    Ok(())
}
