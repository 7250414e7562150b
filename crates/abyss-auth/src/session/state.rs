//! Per-request authentication state.

use serde::{Deserialize, Serialize};

use abyss_core::types::{Role, SubjectId};

/// Who a verified token speaks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Authenticated subject.
    pub subject_id: SubjectId,
    /// Role carried in the token.
    pub role: Role,
}

/// Outcome of examining a request's credentials.
///
/// A request starts `Unauthenticated` and becomes `Authenticated` only
/// after a token passes signature and expiry checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthState {
    /// No valid token.
    #[default]
    Unauthenticated,
    /// A valid token was presented.
    Authenticated(Identity),
}

impl AuthState {
    /// The identity, if authenticated.
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Authenticated(identity) => Some(identity),
            Self::Unauthenticated => None,
        }
    }

    /// Whether a valid token was presented.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }
}
