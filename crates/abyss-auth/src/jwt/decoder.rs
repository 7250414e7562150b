//! Session token verification.

use std::sync::Arc;

use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use thiserror::Error;

use abyss_core::config::AuthConfig;
use abyss_core::error::AppError;
use abyss_core::traits::Clock;

use super::claims::Claims;

/// Why a token was refused. Recorded in the audit log, never shown to the
/// caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenRejection {
    /// No token was presented.
    #[error("no token presented")]
    Missing,
    /// Not a parseable JWT, or the payload lacks required claims.
    #[error("malformed token: {0}")]
    Malformed(String),
    /// Header names an algorithm other than HS256.
    #[error("unexpected signing algorithm")]
    Algorithm,
    /// HMAC did not match.
    #[error("bad signature")]
    BadSignature,
    /// Signature valid but past expiry plus leeway.
    #[error("token expired at {exp}")]
    Expired {
        /// The token's `exp` claim.
        exp: i64,
    },
}

impl From<TokenRejection> for AppError {
    fn from(_: TokenRejection) -> Self {
        AppError::unauthenticated()
    }
}

/// Verifies HS256 session tokens.
///
/// The signature is checked first. Expiry is then checked against the
/// injected clock rather than the system time, so tests can move time.
#[derive(Clone)]
pub struct JwtDecoder {
    decoding_key: DecodingKey,
    validation: Validation,
    leeway_seconds: u64,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .field("leeway_seconds", &self.leeway_seconds)
            .finish_non_exhaustive()
    }
}

impl JwtDecoder {
    /// Creates a decoder from auth configuration.
    pub fn new(config: &AuthConfig, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
            leeway_seconds: config.leeway_seconds,
            clock,
        }
    }

    /// Verifies signature, then expiry.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenRejection> {
        if token.is_empty() {
            return Err(TokenRejection::Missing);
        }

        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                JwtErrorKind::InvalidSignature => TokenRejection::BadSignature,
                JwtErrorKind::InvalidAlgorithm | JwtErrorKind::InvalidAlgorithmName => {
                    TokenRejection::Algorithm
                }
                _ => TokenRejection::Malformed(e.to_string()),
            })?
            .claims;

        if claims.is_expired_at(self.clock.now(), self.leeway_seconds) {
            return Err(TokenRejection::Expired { exp: claims.exp });
        }

        Ok(claims)
    }
}
