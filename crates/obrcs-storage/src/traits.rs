//! Storage traits for the consent store abstraction layer.
//!
//! This module defines the core trait that all store backends must
//! implement.

use async_trait::async_trait;

use obrcs_core::{Consent, ConsentDateTime};

use crate::error::StorageError;
use crate::types::Visibility;

/// The main storage trait that all consent store backends must implement.
///
/// This trait defines the contract for keyed persistence of consent
/// records: insert with a unique idempotency index, read with explicit
/// deletion-state filtering, and version-checked conditional writes.
/// Implementations must be thread-safe (`Send + Sync`).
///
/// # Example
///
/// ```ignore
/// use obrcs_storage::{ConsentStore, StorageError, Visibility};
///
/// async fn load(store: &dyn ConsentStore, id: &str) -> Result<Consent, StorageError> {
///     store
///         .find_by_id(id, Visibility::ActiveOnly)
///         .await?
///         .ok_or_else(|| StorageError::not_found(id))
/// }
/// ```
#[async_trait]
pub trait ConsentStore: Send + Sync {
    /// Inserts a new consent record.
    ///
    /// When the consent carries an idempotency record, the backend must
    /// enforce a unique `(api_client_id, idempotency_key)` index with
    /// server-side atomicity: of two concurrent duplicate inserts exactly
    /// one wins, the other receives `DuplicateIdempotencyKey`. An expired
    /// slot on the index does not block the insert.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::AlreadyExists` if a consent with the same id
    /// exists. Returns `StorageError::DuplicateIdempotencyKey` if the
    /// idempotency index rejects the insert.
    async fn insert(&self, consent: &Consent) -> Result<Consent, StorageError>;

    /// Reads a consent by intent id.
    ///
    /// Returns `None` if the consent does not exist, or exists but is
    /// excluded by `visibility`.
    ///
    /// # Errors
    ///
    /// Returns an error only for infrastructure issues, not for missing
    /// records.
    async fn find_by_id(
        &self,
        id: &str,
        visibility: Visibility,
    ) -> Result<Option<Consent>, StorageError>;

    /// Writes an updated consent, conditional on the stored entity version.
    ///
    /// The write succeeds only if the stored record's `entity_version`
    /// equals `expected_version`; on success the persisted record carries
    /// `expected_version + 1` and is returned. This is the only mutation
    /// primitive; soft deletion is an update with the deleted flag set.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the consent does not exist.
    /// Returns `StorageError::VersionConflict` if another writer updated
    /// the record concurrently; this is retryable.
    async fn update(
        &self,
        consent: &Consent,
        expected_version: u64,
    ) -> Result<Consent, StorageError>;

    /// Looks up a live idempotent creation by `(api_client_id, key)`.
    ///
    /// Returns the existing consent only when its idempotency record has
    /// not expired at `now` and the record is not soft-deleted.
    ///
    /// # Errors
    ///
    /// Returns an error only for infrastructure issues.
    async fn find_by_idempotency_key(
        &self,
        api_client_id: &str,
        key: &str,
        now: &ConsentDateTime,
    ) -> Result<Option<Consent>, StorageError>;

    /// Returns the name of this store backend for logging/debugging.
    fn backend_name(&self) -> &'static str;
}
