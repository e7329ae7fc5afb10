//! Consent service error types.
//!
//! This module defines the full failure taxonomy surfaced by the consent
//! service. All errors are raised synchronously and are not retried
//! internally. Every error carries the intent id where it is known.
//!
//! Write conflicts from optimistic concurrency are a distinct, retryable
//! kind (`WriteConflict`) so callers can retry contention without retrying
//! semantic violations.

use std::fmt;

use obrcs_core::{ApiVersion, ConsentStatus};
use obrcs_storage::StorageError;

/// Errors that can occur during consent service operations.
#[derive(Debug, thiserror::Error)]
pub enum ConsentStoreError {
    /// The consent is absent, soft-deleted, or not visible to the caller.
    #[error("Consent not found: {id}")]
    NotFound {
        /// The intent id that was requested.
        id: String,
    },

    /// The creation request is malformed or missing required fields.
    #[error("Bad request: {message}")]
    BadRequest {
        /// Description of what is missing or malformed.
        message: String,
    },

    /// The requested status move is not an edge in the category's
    /// transition graph.
    #[error("Invalid state transition for {id}: {from} -> {to}")]
    InvalidStateTransition {
        /// The intent id being mutated.
        id: String,
        /// The consent's current status.
        from: ConsentStatus,
        /// The status the caller attempted to move to.
        to: ConsentStatus,
    },

    /// The authorisation payload is missing required category data.
    #[error("Invalid consent decision for {id}: {message}")]
    InvalidConsentDecision {
        /// The intent id being authorised.
        id: String,
        /// Description of the missing or mismatched data.
        message: String,
    },

    /// The debtor account supplied for a payment authorisation is invalid.
    #[error("Invalid debtor account for {id}: {message}")]
    InvalidDebtorAccount {
        /// The intent id being authorised.
        id: String,
        /// Description of the problem.
        message: String,
    },

    /// The consent was created under a later API version than the one used
    /// to access it.
    #[error("Invalid API version for {id}: created under {created}, accessed with {requested}")]
    InvalidApiVersion {
        /// The intent id being accessed.
        id: String,
        /// The version in force at creation.
        created: ApiVersion,
        /// The version the caller used.
        requested: ApiVersion,
    },

    /// An `Authorised -> Authorised` move was attempted on a category that
    /// does not support re-authentication.
    #[error("Consent re-authentication not supported: {id}")]
    ReauthenticationNotSupported {
        /// The intent id being re-authorised.
        id: String,
    },

    /// The caller does not own the consent it tried to mutate.
    #[error("Invalid permissions for consent: {id}")]
    InvalidPermissions {
        /// The intent id being mutated.
        id: String,
    },

    /// An unexpired idempotency key was reused with a different payload,
    /// or the idempotency index state is inconsistent.
    #[error("Idempotency error for key {key}: {message}")]
    IdempotencyError {
        /// The offending idempotency key.
        key: String,
        /// Description of the conflict.
        message: String,
    },

    /// A concurrent writer updated the consent first. Retryable.
    #[error("Concurrent update lost for consent: {id}")]
    WriteConflict {
        /// The intent id being written.
        id: String,
    },

    /// The store failed for a non-semantic reason.
    #[error("Storage failure: {source}")]
    Storage {
        /// The underlying store error.
        #[source]
        source: StorageError,
    },
}

impl ConsentStoreError {
    /// Creates a new `NotFound` error.
    #[must_use]
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Creates a new `BadRequest` error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Creates a new `InvalidStateTransition` error.
    #[must_use]
    pub fn invalid_state_transition(
        id: impl Into<String>,
        from: ConsentStatus,
        to: ConsentStatus,
    ) -> Self {
        Self::InvalidStateTransition {
            id: id.into(),
            from,
            to,
        }
    }

    /// Creates a new `InvalidConsentDecision` error.
    #[must_use]
    pub fn invalid_consent_decision(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConsentDecision {
            id: id.into(),
            message: message.into(),
        }
    }

    /// Creates a new `InvalidDebtorAccount` error.
    #[must_use]
    pub fn invalid_debtor_account(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidDebtorAccount {
            id: id.into(),
            message: message.into(),
        }
    }

    /// Creates a new `InvalidApiVersion` error.
    #[must_use]
    pub fn invalid_api_version(
        id: impl Into<String>,
        created: ApiVersion,
        requested: ApiVersion,
    ) -> Self {
        Self::InvalidApiVersion {
            id: id.into(),
            created,
            requested,
        }
    }

    /// Creates a new `ReauthenticationNotSupported` error.
    #[must_use]
    pub fn reauthentication_not_supported(id: impl Into<String>) -> Self {
        Self::ReauthenticationNotSupported { id: id.into() }
    }

    /// Creates a new `InvalidPermissions` error.
    #[must_use]
    pub fn invalid_permissions(id: impl Into<String>) -> Self {
        Self::InvalidPermissions { id: id.into() }
    }

    /// Creates a new `IdempotencyError` error.
    #[must_use]
    pub fn idempotency_error(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::IdempotencyError {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Creates a new `WriteConflict` error.
    #[must_use]
    pub fn write_conflict(id: impl Into<String>) -> Self {
        Self::WriteConflict { id: id.into() }
    }

    /// Returns `true` if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if the failed operation may safely be retried.
    ///
    /// Only write contention is retryable; semantic violations must not be
    /// retried.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::WriteConflict { .. })
    }

    /// Returns the error category for logging/monitoring purposes.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::BadRequest { .. }
            | Self::InvalidConsentDecision { .. }
            | Self::InvalidDebtorAccount { .. } => ErrorCategory::Validation,
            Self::InvalidStateTransition { .. }
            | Self::InvalidApiVersion { .. }
            | Self::ReauthenticationNotSupported { .. }
            | Self::IdempotencyError { .. }
            | Self::WriteConflict { .. } => ErrorCategory::Conflict,
            Self::InvalidPermissions { .. } => ErrorCategory::Permission,
            Self::Storage { .. } => ErrorCategory::Internal,
        }
    }
}

impl From<StorageError> for ConsentStoreError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { id } => Self::NotFound { id },
            StorageError::VersionConflict { id, .. } => Self::WriteConflict { id },
            StorageError::DuplicateIdempotencyKey { key, .. } => Self::IdempotencyError {
                key,
                message: "idempotency key already in use".to_string(),
            },
            other => Self::Storage { source: other },
        }
    }
}

/// Categories of consent service errors for logging and monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Consent not found (or hidden from the caller).
    NotFound,
    /// Malformed or incomplete input.
    Validation,
    /// State, version, or concurrency conflict.
    Conflict,
    /// Ownership violation.
    Permission,
    /// Infrastructure failure.
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::Validation => write!(f, "validation"),
            Self::Conflict => write!(f, "conflict"),
            Self::Permission => write!(f, "permission"),
            Self::Internal => write!(f, "internal"),
        }
    }
}

/// Convenience result type for consent service operations.
pub type Result<T> = std::result::Result<T, ConsentStoreError>;
