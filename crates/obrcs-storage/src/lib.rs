//! # obrcs-storage
//!
//! Storage abstraction layer for the OBRCS redirect consent service.
//!
//! This crate defines the traits and types that all consent store backends
//! must implement. It does not contain any implementations - those are
//! provided by separate crates.
//!
//! ## Overview
//!
//! The main trait is [`ConsentStore`], which defines the contract for:
//! - Keyed insert with a unique `(apiClientId, idempotencyKey)` index
//! - Reads with explicit deletion-state filtering ([`Visibility`])
//! - Version-checked conditional writes (optimistic concurrency)
//! - Idempotency-key lookups scoped by client and expiry
//!
//! ## Storage Backends
//!
//! To implement a store backend, implement the [`ConsentStore`] trait:
//!
//! ```ignore
//! use async_trait::async_trait;
//! use obrcs_storage::{ConsentStore, StorageError};
//!
//! struct MyStore {
//!     // ...
//! }
//!
//! #[async_trait]
//! impl ConsentStore for MyStore {
//!     async fn insert(&self, consent: &Consent) -> Result<Consent, StorageError> {
//!         // Implementation
//!     }
//!     // ... other methods
//! }
//! ```

mod error;
mod traits;
mod types;

pub use error::{ErrorCategory, StorageError};
pub use traits::ConsentStore;
pub use types::Visibility;

/// Type alias for a storage result.
pub type StorageResult<T> = Result<T, StorageError>;

/// Type alias for a boxed store trait object.
pub type DynConsentStore = std::sync::Arc<dyn ConsentStore>;

/// Prelude module for convenient imports.
///
/// ```ignore
/// use obrcs_storage::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{ErrorCategory, StorageError};
    pub use crate::traits::ConsentStore;
    pub use crate::types::Visibility;
    pub use crate::{DynConsentStore, StorageResult};
}
