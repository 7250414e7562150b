//! Multi-scheme password hashing and verification.

use std::sync::Arc;

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher as ArgonHasher, PasswordVerifier, SaltString},
};
use tracing::{debug, warn};

use abyss_core::config::HashingConfig;
use abyss_core::error::AppError;

use super::scheme::{Scheme, SchemeTag, classify};
use crate::constant_time::constant_time_eq;
use crate::kdf::scrypt_derive;
use crate::random::RandomSource;

/// Salt length for bcrypt, argon2, and scrypt.
const SALT_LEN: usize = 16;
/// Longest password bcrypt consumes in full. Anything longer is refused
/// rather than silently cut to this prefix.
pub const BCRYPT_MAX_PASSWORD_BYTES: usize = 72;
/// scrypt derived-key length.
const SCRYPT_KEY_LEN: usize = 64;

/// Hashes passwords with bcrypt, argon2id, or scrypt and verifies stored
/// hashes of any of the three, routing on the stored hash's shape.
///
/// New hashes use the configured default scheme; legacy hashes keep
/// verifying under their original scheme.
#[derive(Clone)]
pub struct PasswordHasher {
    /// Scheme used when none is requested.
    default_scheme: Scheme,
    /// bcrypt cost factor.
    bcrypt_cost: u32,
    /// argon2id cost parameters.
    argon2_params: Params,
    /// Salt source.
    random: Arc<dyn RandomSource>,
}

impl std::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasher")
            .field("default_scheme", &self.default_scheme)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("argon2_params", &self.argon2_params)
            .finish()
    }
}

impl PasswordHasher {
    /// Creates a hasher from hashing configuration.
    ///
    /// Fails with a configuration error for an unknown default scheme or
    /// invalid cost parameters.
    pub fn new(config: &HashingConfig, random: Arc<dyn RandomSource>) -> Result<Self, AppError> {
        config.validate()?;
        let default_scheme: Scheme = config.default_scheme.parse()?;
        let argon2_params = Params::new(
            config.argon2_memory_kib,
            config.argon2_iterations,
            config.argon2_parallelism,
            None,
        )
        .map_err(|e| AppError::configuration(format!("Invalid argon2 parameters: {e}")))?;

        Ok(Self {
            default_scheme,
            bcrypt_cost: config.bcrypt_cost,
            argon2_params,
            random,
        })
    }

    /// Returns the scheme used for new hashes.
    pub fn default_scheme(&self) -> Scheme {
        self.default_scheme
    }

    /// Hashes `plaintext` with `scheme`, or the default scheme when `None`.
    ///
    /// bcrypt rejects passwords over [`BCRYPT_MAX_PASSWORD_BYTES`] with a
    /// validation error instead of truncating them.
    pub fn hash(&self, plaintext: &str, scheme: Option<Scheme>) -> Result<String, AppError> {
        match scheme.unwrap_or(self.default_scheme) {
            Scheme::Bcrypt => self.bcrypt_hash(plaintext),
            Scheme::Argon2 => self.argon2_hash(plaintext),
            Scheme::Scrypt => self.scrypt_hash(plaintext),
        }
    }

    /// Hashes with a scheme given by name.
    ///
    /// An unsupported name is a configuration error and is surfaced.
    pub fn hash_named(&self, plaintext: &str, scheme: &str) -> Result<String, AppError> {
        let scheme: Scheme = scheme.parse()?;
        self.hash(plaintext, Some(scheme))
    }

    /// Verifies `plaintext` against a stored hash of any supported scheme.
    ///
    /// Fails closed: an unrecognized shape or any error inside the
    /// scheme's verifier yields `false`.
    pub fn verify(&self, plaintext: &str, stored: &str) -> bool {
        let tag = classify(stored);
        let outcome = match tag {
            SchemeTag::Bcrypt => Self::bcrypt_verify(plaintext, stored),
            SchemeTag::Argon2 => Self::argon2_verify(plaintext, stored),
            SchemeTag::Scrypt => Self::scrypt_verify(plaintext, stored),
            SchemeTag::Unknown => {
                warn!(target: "audit", "Stored hash has an unrecognized shape");
                return false;
            }
        };

        outcome.unwrap_or_else(|e| {
            debug!(target: "audit", scheme = %tag, error = %e, "Password verifier error");
            false
        })
    }

    /// Returns `true` when `stored` was not produced by the default scheme.
    pub fn needs_rehash(&self, stored: &str) -> bool {
        classify(stored).scheme() != Some(self.default_scheme)
    }

    fn salt(&self) -> [u8; SALT_LEN] {
        let mut salt = [0u8; SALT_LEN];
        self.random.fill_bytes(&mut salt);
        salt
    }

    fn bcrypt_hash(&self, plaintext: &str) -> Result<String, AppError> {
        if plaintext.len() > BCRYPT_MAX_PASSWORD_BYTES {
            return Err(AppError::validation(format!(
                "Password must be at most {BCRYPT_MAX_PASSWORD_BYTES} bytes long for bcrypt"
            )));
        }
        let parts = bcrypt::hash_with_salt(plaintext, self.bcrypt_cost, self.salt())
            .map_err(|e| AppError::internal(format!("bcrypt hashing failed: {e}")))?;
        Ok(parts.format_for_version(bcrypt::Version::TwoB))
    }

    /// A password bcrypt would truncate never matches.
    fn bcrypt_verify(plaintext: &str, stored: &str) -> Result<bool, String> {
        if plaintext.len() > BCRYPT_MAX_PASSWORD_BYTES {
            return Ok(false);
        }
        bcrypt::verify(plaintext, stored).map_err(|e| e.to_string())
    }

    fn argon2_hash(&self, plaintext: &str) -> Result<String, AppError> {
        let salt = SaltString::encode_b64(&self.salt())
            .map_err(|e| AppError::internal(format!("argon2 salt encoding failed: {e}")))?;
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, self.argon2_params.clone());

        let hash = argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("argon2 hashing failed: {e}")))?;

        Ok(hash.to_string())
    }

    fn argon2_verify(plaintext: &str, stored: &str) -> Result<bool, String> {
        let parsed = PasswordHash::new(stored).map_err(|e| e.to_string())?;

        // Algorithm, version, and cost come from the parsed hash.
        match Argon2::default().verify_password(plaintext.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(e.to_string()),
        }
    }

    fn scrypt_hash(&self, plaintext: &str) -> Result<String, AppError> {
        let salt = self.salt();
        let mut key = [0u8; SCRYPT_KEY_LEN];
        scrypt_derive(plaintext.as_bytes(), &salt, &mut key).map_err(AppError::internal)?;
        Ok(format!("{}:{}", hex::encode(salt), hex::encode(key)))
    }

    fn scrypt_verify(plaintext: &str, stored: &str) -> Result<bool, String> {
        let (salt_hex, key_hex) = stored
            .split_once(':')
            .ok_or_else(|| "missing separator".to_string())?;
        let salt = hex::decode(salt_hex).map_err(|e| e.to_string())?;
        let expected = hex::decode(key_hex).map_err(|e| e.to_string())?;

        let mut derived = vec![0u8; expected.len()];
        scrypt_derive(plaintext.as_bytes(), &salt, &mut derived)?;
        Ok(constant_time_eq(&derived, &expected))
    }
}
