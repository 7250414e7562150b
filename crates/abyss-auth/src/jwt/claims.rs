//! Session token payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use abyss_core::types::{Role, SubjectId, TokenId};

/// Verified contents of a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject the token was issued to.
    pub sub: SubjectId,
    /// Role at the time of issuance.
    #[serde(default)]
    pub role: Role,
    /// Issued-at, seconds since the epoch.
    pub iat: i64,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
    /// Unique token id, for correlating audit entries.
    pub jti: TokenId,
}

impl Claims {
    /// Expiry as a timestamp, `None` if out of range.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Whether the token is past `exp + leeway_seconds` at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>, leeway_seconds: u64) -> bool {
        let leeway = i64::try_from(leeway_seconds).unwrap_or(i64::MAX);
        now.timestamp() > self.exp.saturating_add(leeway)
    }
}
