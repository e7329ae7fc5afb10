//! # obrcs-consent
//!
//! Consent lifecycle services for the OBRCS redirect consent service.
//!
//! [`ConsentService`] is the write path: creation (idempotent for
//! payment-type categories), status transitions, and soft deletion, all
//! scoped to the owning API client and guarded by optimistic concurrency.
//! [`ConsentDecisionService`] translates a PSU's redirect-UI decision into
//! the matching transition, and [`ConsentDetailsService`] assembles the
//! read-only view the UI renders while a consent awaits authorisation.

pub mod config;
pub mod decision;
pub mod details;
pub mod error;
pub mod service;

pub use config::ConsentServiceConfig;
pub use decision::{ConsentDecision, ConsentDecisionService, DecisionAction};
pub use details::{
    AccountSummary, ConsentDetails, ConsentDetailsService, CustomerDataProvider,
    DynCustomerDataProvider, StaticCustomerDataProvider,
};
pub use error::{ConsentStoreError, ErrorCategory, Result};
pub use service::{AuthoriseConsentArgs, ConsentService, CreateConsentRequest};

/// Commonly used types for consumers of the consent services.
pub mod prelude {
    pub use crate::config::ConsentServiceConfig;
    pub use crate::decision::{ConsentDecision, ConsentDecisionService, DecisionAction};
    pub use crate::details::{ConsentDetails, ConsentDetailsService, CustomerDataProvider};
    pub use crate::error::{ConsentStoreError, Result};
    pub use crate::service::{AuthoriseConsentArgs, ConsentService, CreateConsentRequest};
}
