//! Session token issuance.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde::Serialize;

use abyss_core::config::AuthConfig;
use abyss_core::config::auth::MAX_TOKEN_TTL_MINUTES;
use abyss_core::error::AppError;
use abyss_core::traits::Clock;
use abyss_core::types::{Role, SubjectId};

use super::claims::Claims;
use crate::identifier::IdentifierFactory;
use crate::session::cookie::CookiePolicy;

/// A freshly signed token and the cookie that carries it.
#[derive(Clone, Serialize)]
pub struct IssuedToken {
    /// Compact HS256 JWT.
    pub token: String,
    /// When the token stops verifying (before leeway).
    pub expires_at: DateTime<Utc>,
    /// `Set-Cookie` header value delivering the token.
    pub set_cookie: String,
}

impl std::fmt::Debug for IssuedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssuedToken")
            .field("token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

/// Signs HS256 session tokens with a fixed TTL.
#[derive(Clone)]
pub struct JwtEncoder {
    encoding_key: EncodingKey,
    ttl: Duration,
    cookies: CookiePolicy,
    clock: Arc<dyn Clock>,
    ids: IdentifierFactory,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("ttl", &self.ttl)
            .field("cookies", &self.cookies)
            .finish_non_exhaustive()
    }
}

impl JwtEncoder {
    /// Creates an encoder from auth configuration.
    pub fn new(config: &AuthConfig, clock: Arc<dyn Clock>, ids: IdentifierFactory) -> Self {
        let ttl_minutes = config.token_ttl_minutes.min(MAX_TOKEN_TTL_MINUTES) as i64;
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            ttl: Duration::minutes(ttl_minutes),
            cookies: CookiePolicy::from_config(config),
            clock,
            ids,
        }
    }

    /// Issues a token for `subject` and the cookie instruction carrying it.
    pub fn issue(&self, subject: SubjectId, role: Role) -> Result<IssuedToken, AppError> {
        let now = self.clock.now();
        let expires_at = now + self.ttl;

        let claims = Claims {
            sub: subject,
            role,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            jti: self.ids.token_id(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode session token: {e}")))?;
        let set_cookie = self
            .cookies
            .session_cookie(&token, self.ttl.num_seconds());

        Ok(IssuedToken {
            token,
            expires_at,
            set_cookie,
        })
    }
}
