//! Password hashing configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Scheme names accepted by `hashing.default_scheme`.
pub const SUPPORTED_SCHEMES: [&str; 3] = ["bcrypt", "argon2", "scrypt"];

/// Cost parameters for the password hashing schemes.
///
/// Only affects newly produced hashes. Stored hashes carry their own
/// parameters, so changing these values never breaks verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashingConfig {
    /// Scheme used when `hash` is called without an explicit scheme.
    #[serde(default = "default_scheme")]
    pub default_scheme: String,
    /// bcrypt cost factor (log2 rounds).
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
    /// argon2id memory cost in KiB.
    #[serde(default = "default_argon2_memory")]
    pub argon2_memory_kib: u32,
    /// argon2id iteration count.
    #[serde(default = "default_argon2_iterations")]
    pub argon2_iterations: u32,
    /// argon2id lane count.
    #[serde(default = "default_argon2_parallelism")]
    pub argon2_parallelism: u32,
}

impl HashingConfig {
    /// Rejects unknown schemes and out-of-range cost parameters.
    pub fn validate(&self) -> Result<(), AppError> {
        if !SUPPORTED_SCHEMES.contains(&self.default_scheme.as_str()) {
            return Err(AppError::configuration(format!(
                "hashing.default_scheme '{}' is not supported. Expected one of: {}",
                self.default_scheme,
                SUPPORTED_SCHEMES.join(", ")
            )));
        }
        if !(4..=31).contains(&self.bcrypt_cost) {
            return Err(AppError::configuration(
                "hashing.bcrypt_cost must be between 4 and 31",
            ));
        }
        if self.argon2_iterations == 0 || self.argon2_parallelism == 0 {
            return Err(AppError::configuration(
                "hashing.argon2_iterations and hashing.argon2_parallelism must be positive",
            ));
        }
        if self.argon2_memory_kib < 8 * self.argon2_parallelism {
            return Err(AppError::configuration(
                "hashing.argon2_memory_kib must be at least 8 KiB per lane",
            ));
        }
        Ok(())
    }
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            default_scheme: default_scheme(),
            bcrypt_cost: default_bcrypt_cost(),
            argon2_memory_kib: default_argon2_memory(),
            argon2_iterations: default_argon2_iterations(),
            argon2_parallelism: default_argon2_parallelism(),
        }
    }
}

fn default_scheme() -> String {
    "bcrypt".to_string()
}

fn default_bcrypt_cost() -> u32 {
    10
}

fn default_argon2_memory() -> u32 {
    65536
}

fn default_argon2_iterations() -> u32 {
    3
}

fn default_argon2_parallelism() -> u32 {
    1
}
