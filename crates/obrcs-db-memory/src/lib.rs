//! In-memory consent store backend for the OBRCS redirect consent service.
//!
//! This crate provides an in-memory implementation of the `ConsentStore`
//! trait from `obrcs-storage`, using dashmap sharded locks for concurrent
//! access. It is intended for tests and single-node deployments; durable
//! deployments use a document-store backend with the same contract.
//!
//! # Example
//!
//! ```ignore
//! use obrcs_db_memory::MemoryConsentStore;
//! use obrcs_storage::{ConsentStore, Visibility};
//!
//! let store = MemoryConsentStore::new();
//! store.insert(&consent).await?;
//! let found = store.find_by_id(&consent.id, Visibility::ActiveOnly).await?;
//! ```

pub mod store;

// Re-export the ConsentStore trait for convenience
pub use obrcs_storage::{ConsentStore, StorageError, Visibility};

pub use store::MemoryConsentStore;

/// Type alias for a shareable ConsentStore instance.
pub type DynConsentStore = std::sync::Arc<dyn ConsentStore>;

/// Creates a new in-memory ConsentStore instance.
pub fn create_memory_store() -> DynConsentStore {
    std::sync::Arc::new(MemoryConsentStore::new())
}
