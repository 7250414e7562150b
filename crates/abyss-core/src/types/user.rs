//! User records exchanged with the persistence collaborator.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::SubjectId;
use super::role::Role;

/// A stored credential record as returned by the user store.
///
/// `stored_hash` is self-describing: its shape alone identifies the
/// hashing scheme. It is skipped on serialization and redacted from
/// `Debug` output.
#[derive(Clone, Serialize, Deserialize)]
pub struct UserRecord {
    /// Subject identifier assigned at insertion.
    pub id: SubjectId,
    /// Login identity (username).
    pub identity: String,
    /// Self-describing password hash.
    #[serde(skip_serializing, default)]
    pub stored_hash: String,
    /// Role embedded in issued tokens.
    #[serde(default)]
    pub role: Role,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl UserRecord {
    /// Returns the client-safe projection of this record.
    pub fn public_view(&self) -> UserView {
        UserView {
            id: self.id,
            identity: self.identity.clone(),
            role: self.role,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRecord")
            .field("id", &self.id)
            .field("identity", &self.identity)
            .field("stored_hash", &"<redacted>")
            .field("role", &self.role)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

/// Data required to insert a new credential record.
#[derive(Clone)]
pub struct NewUserRecord {
    /// Subject identifier minted by the caller.
    pub id: SubjectId,
    /// Login identity.
    pub identity: String,
    /// Pre-hashed password.
    pub stored_hash: String,
    /// Assigned role.
    pub role: Role,
    /// Creation time from the injected clock.
    pub created_at: DateTime<Utc>,
}

impl fmt::Debug for NewUserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUserRecord")
            .field("id", &self.id)
            .field("identity", &self.identity)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

/// Client-facing view of a subject. Never carries the stored hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserView {
    /// Subject identifier.
    pub id: SubjectId,
    /// Login identity.
    pub identity: String,
    /// Role.
    pub role: Role,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last updated.
    pub updated_at: DateTime<Utc>,
}
