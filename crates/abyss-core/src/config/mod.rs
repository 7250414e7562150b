//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod auth;
pub mod cipher;
pub mod hashing;
pub mod identifier;
pub mod logging;

use serde::{Deserialize, Serialize};

pub use self::auth::AuthConfig;
pub use self::cipher::CipherConfig;
pub use self::hashing::HashingConfig;
pub use self::identifier::IdentifierConfig;
pub use self::logging::LoggingConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Session token and credential policy settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Password hashing scheme settings.
    #[serde(default)]
    pub hashing: HashingConfig,
    /// At-rest secret encryption settings.
    #[serde(default)]
    pub cipher: CipherConfig,
    /// Identifier generation settings.
    #[serde(default)]
    pub identifier: IdentifierConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `ABYSS__`
    /// (e.g. `ABYSS__AUTH__JWT_SECRET`).
    pub fn load(env: &str) -> Result<Self, AppError> {
        Self::load_from("config", env)
    }

    /// Load configuration from `<dir>/default` and `<dir>/<env>`.
    pub fn load_from(dir: &str, env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(&format!("{dir}/default")).required(false))
            .add_source(config::File::with_name(&format!("{dir}/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("ABYSS")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }

    /// Checks every section for deploy-time faults.
    ///
    /// Services must not be constructed from a configuration that fails
    /// this check; the binary aborts startup instead.
    pub fn validate(&self) -> Result<(), AppError> {
        self.auth.validate()?;
        self.hashing.validate()?;
        self.cipher.validate()?;
        self.identifier.validate()?;
        Ok(())
    }
}
