//! In-process credential store.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use abyss_core::error::AppError;
use abyss_core::result::AppResult;
use abyss_core::traits::{Clock, UserStore};
use abyss_core::types::{NewUserRecord, SubjectId, UserRecord};

/// [`UserStore`] backed by concurrent hash maps.
///
/// Identity lookups are exact and case-sensitive. Suitable for tests and
/// single-node deployments; records do not survive a restart.
pub struct MemoryUserStore {
    records: DashMap<SubjectId, UserRecord>,
    identities: DashMap<String, SubjectId>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for MemoryUserStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryUserStore")
            .field("records", &self.records.len())
            .finish()
    }
}

impl MemoryUserStore {
    /// Creates an empty store stamping updates from `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            records: DashMap::new(),
            identities: DashMap::new(),
            clock,
        }
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_identity(&self, identity: &str) -> AppResult<Option<UserRecord>> {
        let Some(id) = self.identities.get(identity).map(|entry| *entry.value()) else {
            return Ok(None);
        };
        Ok(self.records.get(&id).map(|entry| entry.value().clone()))
    }

    async fn find_by_id(&self, id: &SubjectId) -> AppResult<Option<UserRecord>> {
        Ok(self.records.get(id).map(|entry| entry.value().clone()))
    }

    async fn insert(&self, record: NewUserRecord) -> AppResult<SubjectId> {
        // The identity entry lock is held until the record is in place, so
        // a concurrent lookup never sees a dangling identity.
        match self.identities.entry(record.identity.clone()) {
            Entry::Occupied(_) => Err(AppError::conflict(format!(
                "Identity '{}' is already registered",
                record.identity
            ))),
            Entry::Vacant(slot) => {
                let id = record.id;
                self.records.insert(
                    id,
                    UserRecord {
                        id,
                        identity: record.identity,
                        stored_hash: record.stored_hash,
                        role: record.role,
                        created_at: record.created_at,
                        updated_at: record.created_at,
                    },
                );
                slot.insert(id);
                Ok(id)
            }
        }
    }

    async fn update_stored_hash(&self, id: &SubjectId, stored_hash: &str) -> AppResult<()> {
        let mut record = self
            .records
            .get_mut(id)
            .ok_or_else(|| AppError::not_found(format!("No user with id {id}")))?;
        record.stored_hash = stored_hash.to_string();
        record.updated_at = self.clock.now();
        Ok(())
    }
}
