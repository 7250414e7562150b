//! Authentication configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Placeholder shipped in sample configs. Rejected by [`AuthConfig::validate`].
pub const PLACEHOLDER_SECRET: &str = "CHANGE_ME_IN_PRODUCTION";

/// Minimum accepted length of the token signing secret, in bytes.
pub const MIN_SECRET_LENGTH: usize = 32;

/// Upper bound on the session token TTL (30 days).
pub const MAX_TOKEN_TTL_MINUTES: u64 = 30 * 24 * 60;

/// Session token and credential policy configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for token signing (HMAC-SHA256).
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Session token TTL in minutes.
    #[serde(default = "default_token_ttl")]
    pub token_ttl_minutes: u64,
    /// Clock-skew leeway applied to the expiry check, in seconds.
    #[serde(default = "default_leeway")]
    pub leeway_seconds: u64,
    /// Name of the session cookie.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Whether the cookie carries the `Secure` attribute (TLS-terminated deployments).
    #[serde(default)]
    pub cookie_secure: bool,
    /// Minimum password length for new registrations.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
    /// Minimum zxcvbn strength score (0..=4) for new registrations.
    #[serde(default = "default_min_score")]
    pub min_password_score: u8,
    /// Re-hash legacy credentials with the default scheme on successful signin.
    #[serde(default)]
    pub upgrade_legacy_hashes: bool,
}

impl AuthConfig {
    /// Rejects a missing, placeholder, or short signing secret and
    /// out-of-range policy values.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.jwt_secret.is_empty() || self.jwt_secret == PLACEHOLDER_SECRET {
            return Err(AppError::configuration(
                "auth.jwt_secret must be set to a deployment-specific value",
            ));
        }
        if self.jwt_secret.len() < MIN_SECRET_LENGTH {
            return Err(AppError::configuration(format!(
                "auth.jwt_secret must be at least {MIN_SECRET_LENGTH} bytes"
            )));
        }
        if self.token_ttl_minutes == 0 || self.token_ttl_minutes > MAX_TOKEN_TTL_MINUTES {
            return Err(AppError::configuration(format!(
                "auth.token_ttl_minutes must be between 1 and {MAX_TOKEN_TTL_MINUTES}"
            )));
        }
        if self.cookie_name.is_empty()
            || !self
                .cookie_name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(AppError::configuration(format!(
                "auth.cookie_name '{}' is not a valid cookie name",
                self.cookie_name
            )));
        }
        if self.min_password_score > 4 {
            return Err(AppError::configuration(
                "auth.min_password_score must be between 0 and 4",
            ));
        }
        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            token_ttl_minutes: default_token_ttl(),
            leeway_seconds: default_leeway(),
            cookie_name: default_cookie_name(),
            cookie_secure: false,
            password_min_length: default_password_min(),
            min_password_score: default_min_score(),
            upgrade_legacy_hashes: false,
        }
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl_minutes", &self.token_ttl_minutes)
            .field("leeway_seconds", &self.leeway_seconds)
            .field("cookie_name", &self.cookie_name)
            .field("cookie_secure", &self.cookie_secure)
            .field("password_min_length", &self.password_min_length)
            .field("min_password_score", &self.min_password_score)
            .field("upgrade_legacy_hashes", &self.upgrade_legacy_hashes)
            .finish()
    }
}

fn default_jwt_secret() -> String {
    PLACEHOLDER_SECRET.to_string()
}

fn default_token_ttl() -> u64 {
    60
}

fn default_leeway() -> u64 {
    5
}

fn default_cookie_name() -> String {
    "token".to_string()
}

fn default_password_min() -> usize {
    8
}

fn default_min_score() -> u8 {
    2
}
