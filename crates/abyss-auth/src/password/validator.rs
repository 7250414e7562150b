//! Registration input policy: identity shape and password strength.

use abyss_core::config::AuthConfig;
use abyss_core::error::AppError;

use super::hasher::BCRYPT_MAX_PASSWORD_BYTES;
use super::scheme::Scheme;
use crate::constant_time::safe_compare;

/// Identity length bounds, in characters.
const IDENTITY_MIN: usize = 3;
const IDENTITY_MAX: usize = 64;

/// Validates registration input against configured policies.
///
/// Errors are `ValidationError`s and describe the violation precisely;
/// they concern the caller's own input, never stored credentials.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    /// Minimum password length.
    min_length: usize,
    /// Minimum zxcvbn score.
    min_score: zxcvbn::Score,
    /// Byte cap imposed by the hashing scheme, if any.
    max_bytes: Option<usize>,
}

impl PasswordValidator {
    /// Creates a new validator from auth configuration, for passwords that
    /// will be hashed with `scheme`.
    pub fn new(config: &AuthConfig, scheme: Scheme) -> Self {
        let min_score = match config.min_password_score {
            0 => zxcvbn::Score::Zero,
            1 => zxcvbn::Score::One,
            2 => zxcvbn::Score::Two,
            3 => zxcvbn::Score::Three,
            _ => zxcvbn::Score::Four,
        };
        Self {
            min_length: config.password_min_length,
            min_score,
            max_bytes: match scheme {
                Scheme::Bcrypt => Some(BCRYPT_MAX_PASSWORD_BYTES),
                Scheme::Argon2 | Scheme::Scrypt => None,
            },
        }
    }

    /// Validates a login identity: 3 to 64 characters of `[A-Za-z0-9_.-]`.
    pub fn validate_identity(&self, identity: &str) -> Result<(), AppError> {
        let len = identity.chars().count();
        if !(IDENTITY_MIN..=IDENTITY_MAX).contains(&len) {
            return Err(AppError::validation(format!(
                "Identity must be between {IDENTITY_MIN} and {IDENTITY_MAX} characters long"
            )));
        }
        if !identity
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        {
            return Err(AppError::validation(
                "Identity may only contain letters, digits, '_', '.', and '-'",
            ));
        }
        Ok(())
    }

    /// Validates a new password against all configured policies.
    ///
    /// Returns `Ok(())` if the password meets all requirements,
    /// or an error describing the first violation found.
    pub fn validate(&self, identity: &str, password: &str) -> Result<(), AppError> {
        if password.chars().count() < self.min_length {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters long",
                self.min_length
            )));
        }

        if let Some(max) = self.max_bytes.filter(|max| password.len() > *max) {
            return Err(AppError::validation(format!(
                "Password must be at most {max} bytes long"
            )));
        }

        if password.eq_ignore_ascii_case(identity) {
            return Err(AppError::validation(
                "Password must be different from the identity",
            ));
        }

        let estimate = zxcvbn::zxcvbn(password, &[identity]);
        if estimate.score() < self.min_score {
            return Err(AppError::validation(
                "Password is too weak. Please use a stronger password with more entropy.",
            ));
        }

        Ok(())
    }

    /// Validates that the password and its confirmation match.
    pub fn validate_confirmation(
        &self,
        password: &str,
        confirmation: &str,
    ) -> Result<(), AppError> {
        if !safe_compare(password, confirmation) {
            return Err(AppError::validation("Passwords do not match"));
        }
        Ok(())
    }
}
