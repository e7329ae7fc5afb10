//! # obrcs-core
//!
//! Core types for the OBRCS redirect consent service.
//!
//! This crate defines the consent data model shared by every other crate:
//! the intent type registry with its prefixed identifier scheme, the consent
//! entity and its category-specific authorisation data, the per-category
//! status state model, and the OBIE API version type with its
//! backward-compatibility rule.

pub mod consent;
pub mod error;
pub mod intent;
pub mod status;
pub mod time;
pub mod version;

pub use consent::{Consent, ConsentAuthorisation, IdempotencyRecord};
pub use error::{CoreError, ErrorCategory, Result};
pub use intent::IntentType;
pub use status::{ConsentStatus, StateModel};
pub use time::{ConsentDateTime, now_utc};
pub use version::ApiVersion;
