//! Persistence contract consumed by the credential core.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::id::SubjectId;
use crate::types::user::{NewUserRecord, UserRecord};

/// Lookup/insert contract for credential records.
///
/// The core never issues queries itself; every persistence concern goes
/// through an implementation of this trait. Implementations must return
/// `ErrorKind::Conflict` from [`UserStore::insert`] when the identity is
/// already taken.
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// Find a record by its raw login identity.
    async fn find_by_identity(&self, identity: &str) -> AppResult<Option<UserRecord>>;

    /// Find a record by subject identifier.
    async fn find_by_id(&self, id: &SubjectId) -> AppResult<Option<UserRecord>>;

    /// Insert a new record and return its subject identifier.
    async fn insert(&self, record: NewUserRecord) -> AppResult<SubjectId>;

    /// Replace the stored hash of an existing record.
    async fn update_stored_hash(&self, id: &SubjectId, stored_hash: &str) -> AppResult<()>;
}
