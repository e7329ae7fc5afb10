use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use obrcs_core::{Consent, ConsentDateTime, now_utc};
use obrcs_storage::{ConsentStore, StorageError, Visibility};

/// Key into the idempotency index: `(api_client_id, idempotency_key)`.
type IdempotencyKey = (String, String);

/// In-memory consent store backend using dashmap.
///
/// This store implementation provides:
/// - Concurrent access via sharded locks
/// - Version-checked conditional writes under the record's shard lock
/// - A unique `(apiClientId, idempotencyKey)` index whose slots are claimed
///   atomically, so concurrent duplicate creates serialize on the slot
/// - Soft deletion with explicit visibility filtering
#[derive(Debug, Default)]
pub struct MemoryConsentStore {
    /// Consent records keyed by intent id.
    data: DashMap<String, Consent>,
    /// Unique idempotency index mapping `(apiClientId, key)` to intent id.
    idempotency: DashMap<IdempotencyKey, String>,
}

impl MemoryConsentStore {
    /// Creates a new, empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of non-deleted consents currently stored.
    #[must_use]
    pub fn count(&self) -> usize {
        self.data.iter().filter(|entry| !entry.is_deleted()).count()
    }

    /// Inserts the record itself, failing on id collision.
    fn insert_record(&self, consent: &Consent) -> Result<Consent, StorageError> {
        match self.data.entry(consent.id.clone()) {
            Entry::Occupied(_) => Err(StorageError::already_exists(&consent.id)),
            Entry::Vacant(slot) => {
                slot.insert(consent.clone());
                Ok(consent.clone())
            }
        }
    }

    /// Whether the idempotency slot claimed by `existing_id` still shields
    /// retries at `now`.
    fn slot_is_live(&self, existing_id: &str, now: &ConsentDateTime) -> bool {
        self.data.get(existing_id).is_some_and(|consent| {
            !consent.is_deleted()
                && consent
                    .idempotency
                    .as_ref()
                    .is_some_and(|record| record.is_live(now))
        })
    }
}

#[async_trait]
impl ConsentStore for MemoryConsentStore {
    async fn insert(&self, consent: &Consent) -> Result<Consent, StorageError> {
        let now = now_utc();

        // The slot claim and the record insert happen under the slot's shard
        // lock, so two concurrent creates with the same key serialize here
        // and exactly one wins. Lock order is always idempotency index ->
        // data map.
        match &consent.idempotency {
            Some(record) => {
                let key = (consent.api_client_id.clone(), record.key.clone());
                match self.idempotency.entry(key) {
                    Entry::Occupied(mut slot) => {
                        let existing_id = slot.get().clone();
                        if self.slot_is_live(&existing_id, &now) {
                            return Err(StorageError::duplicate_idempotency_key(
                                &consent.api_client_id,
                                &record.key,
                            ));
                        }
                        // expired or dead claim: reclaim the slot
                        let stored = self.insert_record(consent)?;
                        slot.insert(consent.id.clone());
                        Ok(stored)
                    }
                    Entry::Vacant(slot) => {
                        let stored = self.insert_record(consent)?;
                        slot.insert(consent.id.clone());
                        Ok(stored)
                    }
                }
            }
            None => self.insert_record(consent),
        }
    }

    async fn find_by_id(
        &self,
        id: &str,
        visibility: Visibility,
    ) -> Result<Option<Consent>, StorageError> {
        Ok(self
            .data
            .get(id)
            .filter(|consent| visibility.admits(consent.is_deleted()))
            .map(|consent| consent.clone()))
    }

    async fn update(
        &self,
        consent: &Consent,
        expected_version: u64,
    ) -> Result<Consent, StorageError> {
        let mut entry = self
            .data
            .get_mut(&consent.id)
            .ok_or_else(|| StorageError::not_found(&consent.id))?;

        // The shard write lock held by get_mut makes this check-and-write
        // atomic with respect to other writers.
        if entry.entity_version != expected_version {
            return Err(StorageError::version_conflict(
                &consent.id,
                expected_version,
                entry.entity_version,
            ));
        }

        let mut stored = consent.clone();
        stored.entity_version = expected_version + 1;
        *entry = stored.clone();
        Ok(stored)
    }

    async fn find_by_idempotency_key(
        &self,
        api_client_id: &str,
        key: &str,
        now: &ConsentDateTime,
    ) -> Result<Option<Consent>, StorageError> {
        let index_key = (api_client_id.to_string(), key.to_string());
        let Some(id) = self.idempotency.get(&index_key).map(|id| id.clone()) else {
            return Ok(None);
        };

        Ok(self
            .data
            .get(id.as_str())
            .filter(|consent| !consent.is_deleted())
            .filter(|consent| {
                consent
                    .idempotency
                    .as_ref()
                    .is_some_and(|record| record.key == key && record.is_live(now))
            })
            .map(|consent| consent.clone()))
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
