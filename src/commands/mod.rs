//! CLI command definitions and dispatch.

pub mod cipher;
pub mod config;
pub mod hash;
pub mod ids;

use std::io::BufRead;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use abyss_auth::random::{OsRandom, RandomSource};
use abyss_core::config::AppConfig;
use abyss_core::error::AppError;

use crate::output::OutputFormat;

/// Abyss keytool: hashes, keys, encrypted values, and identifiers
#[derive(Debug, Parser)]
#[command(name = "abyss-keytool", version, about, long_about = None)]
pub struct Cli {
    /// Directory holding `default.toml` and environment overlays
    #[arg(long, default_value = "config", global = true)]
    pub config_dir: String,

    /// Environment overlay to load
    #[arg(long, env = "ABYSS_ENV", default_value = "development", global = true)]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Hash a password for storage
    Hash(hash::HashArgs),
    /// Check a password against a stored hash
    Verify(hash::VerifyArgs),
    /// Generate a random 256-bit cipher key
    GenKey,
    /// Derive a cipher key from a passphrase
    DeriveKey(cipher::DeriveKeyArgs),
    /// Encrypt a secret with the configured key
    Encrypt(cipher::EncryptArgs),
    /// Decrypt a value produced by `encrypt`
    Decrypt(cipher::DecryptArgs),
    /// Generate identifiers
    Ids(ids::IdsArgs),
    /// Load and validate the configuration
    CheckConfig,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: &AppConfig) -> Result<(), AppError> {
        let random: Arc<dyn RandomSource> = Arc::new(OsRandom);
        match &self.command {
            Commands::Hash(args) => hash::hash(args, config, random, self.format).await,
            Commands::Verify(args) => hash::verify(args, config, random, self.format).await,
            Commands::GenKey => cipher::gen_key(random.as_ref(), self.format),
            Commands::DeriveKey(args) => cipher::derive_key(args, self.format).await,
            Commands::Encrypt(args) => cipher::encrypt(args, config, random, self.format),
            Commands::Decrypt(args) => cipher::decrypt(args, config, random, self.format),
            Commands::Ids(args) => ids::execute(args, config, random, self.format),
            Commands::CheckConfig => config::check(config, random, self.format),
        }
    }
}

/// Helper: take a secret from the argument or, when absent, the first
/// line of stdin. Keeps secrets out of shell history.
pub fn secret_or_stdin(arg: Option<&str>, what: &str) -> Result<String, AppError> {
    if let Some(value) = arg {
        return Ok(value.to_string());
    }
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    let line = line.trim_end_matches(['\r', '\n']).to_string();
    if line.is_empty() {
        return Err(AppError::validation(format!("No {what} given on the command line or stdin")));
    }
    Ok(line)
}
