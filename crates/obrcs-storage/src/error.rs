//! Storage error types for the consent store abstraction layer.
//!
//! This module defines all error types that can occur during store
//! operations. Version conflicts are a distinct, retryable kind so callers
//! can retry write contention without retrying semantic failures.

use std::fmt;

/// Errors that can occur during consent store operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The requested consent was not found.
    #[error("Consent not found: {id}")]
    NotFound {
        /// The intent id that was not found.
        id: String,
    },

    /// The entity version check failed during a conditional write.
    #[error("Version conflict on {id}: expected {expected}, found {actual}")]
    VersionConflict {
        /// The intent id being written.
        id: String,
        /// The entity version the writer expected.
        expected: u64,
        /// The entity version actually stored.
        actual: u64,
    },

    /// Attempted to insert a consent whose id already exists.
    #[error("Consent already exists: {id}")]
    AlreadyExists {
        /// The intent id that already exists.
        id: String,
    },

    /// The unique `(apiClientId, idempotencyKey)` index rejected an insert.
    #[error("Idempotency key already in use by {api_client_id}: {key}")]
    DuplicateIdempotencyKey {
        /// The client owning the existing record.
        api_client_id: String,
        /// The conflicting idempotency key.
        key: String,
    },

    /// The consent record is malformed.
    #[error("Invalid consent record: {message}")]
    InvalidRecord {
        /// Description of why the record is invalid.
        message: String,
    },

    /// An internal store error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl StorageError {
    /// Creates a new `NotFound` error.
    #[must_use]
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Creates a new `VersionConflict` error.
    #[must_use]
    pub fn version_conflict(id: impl Into<String>, expected: u64, actual: u64) -> Self {
        Self::VersionConflict {
            id: id.into(),
            expected,
            actual,
        }
    }

    /// Creates a new `AlreadyExists` error.
    #[must_use]
    pub fn already_exists(id: impl Into<String>) -> Self {
        Self::AlreadyExists { id: id.into() }
    }

    /// Creates a new `DuplicateIdempotencyKey` error.
    #[must_use]
    pub fn duplicate_idempotency_key(
        api_client_id: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self::DuplicateIdempotencyKey {
            api_client_id: api_client_id.into(),
            key: key.into(),
        }
    }

    /// Creates a new `InvalidRecord` error.
    #[must_use]
    pub fn invalid_record(message: impl Into<String>) -> Self {
        Self::InvalidRecord {
            message: message.into(),
        }
    }

    /// Creates a new `Internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns `true` if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if this is a version conflict error.
    #[must_use]
    pub fn is_version_conflict(&self) -> bool {
        matches!(self, Self::VersionConflict { .. })
    }

    /// Returns `true` if the failed operation may safely be retried.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::VersionConflict { .. })
    }

    /// Returns the error category for logging/monitoring purposes.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::VersionConflict { .. }
            | Self::AlreadyExists { .. }
            | Self::DuplicateIdempotencyKey { .. } => ErrorCategory::Conflict,
            Self::InvalidRecord { .. } => ErrorCategory::Validation,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

/// Categories of storage errors for logging and monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Consent not found.
    NotFound,
    /// Conflict (version, existence, or idempotency index).
    Conflict,
    /// Validation error.
    Validation,
    /// Internal error.
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::Conflict => write!(f, "conflict"),
            Self::Validation => write!(f, "validation"),
            Self::Internal => write!(f, "internal"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StorageError::not_found("AAC_123");
        assert_eq!(err.to_string(), "Consent not found: AAC_123");

        let err = StorageError::version_conflict("DPC_1", 3, 4);
        assert_eq!(
            err.to_string(),
            "Version conflict on DPC_1: expected 3, found 4"
        );

        let err = StorageError::duplicate_idempotency_key("client-1", "K1");
        assert_eq!(
            err.to_string(),
            "Idempotency key already in use by client-1: K1"
        );
    }

    #[test]
    fn test_error_predicates() {
        let err = StorageError::not_found("AAC_123");
        assert!(err.is_not_found());
        assert!(!err.is_version_conflict());
        assert!(!err.is_retryable());

        let err = StorageError::version_conflict("AAC_123", 1, 2);
        assert!(err.is_version_conflict());
        assert!(err.is_retryable());
        assert!(!err.is_not_found());

        // conflicts other than version checks are not blind-retryable
        assert!(!StorageError::already_exists("AAC_123").is_retryable());
        assert!(!StorageError::duplicate_idempotency_key("c", "k").is_retryable());
    }

    #[test]
    fn test_error_category() {
        assert_eq!(
            StorageError::not_found("AAC_1").category(),
            ErrorCategory::NotFound
        );
        assert_eq!(
            StorageError::version_conflict("AAC_1", 1, 2).category(),
            ErrorCategory::Conflict
        );
        assert_eq!(
            StorageError::duplicate_idempotency_key("c", "k").category(),
            ErrorCategory::Conflict
        );
        assert_eq!(
            StorageError::invalid_record("bad data").category(),
            ErrorCategory::Validation
        );
        assert_eq!(
            StorageError::internal("boom").category(),
            ErrorCategory::Internal
        );
    }

    #[test]
    fn test_category_display() {
        assert_eq!(ErrorCategory::NotFound.to_string(), "not_found");
        assert_eq!(ErrorCategory::Conflict.to_string(), "conflict");
        assert_eq!(ErrorCategory::Validation.to_string(), "validation");
        assert_eq!(ErrorCategory::Internal.to_string(), "internal");
    }
}
