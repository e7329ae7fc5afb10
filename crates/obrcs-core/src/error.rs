use thiserror::Error;

/// Core error types for consent model operations
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid intent id: {0}")]
    InvalidIntentId(String),

    #[error("Invalid API version: {0}")]
    InvalidApiVersion(String),

    #[error("Invalid consent DateTime: {0}")]
    InvalidDateTime(String),

    #[error("Invalid consent status: {0}")]
    InvalidStatus(String),

    #[error("Invalid consent data: {message}")]
    InvalidConsent { message: String },

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Time parsing error: {0}")]
    TimeError(#[from] time::error::Parse),

    #[error("UUID error: {0}")]
    UuidError(#[from] uuid::Error),
}

impl CoreError {
    /// Create a new InvalidIntentId error
    pub fn invalid_intent_id(id: impl Into<String>) -> Self {
        Self::InvalidIntentId(id.into())
    }

    /// Create a new InvalidApiVersion error
    pub fn invalid_api_version(version: impl Into<String>) -> Self {
        Self::InvalidApiVersion(version.into())
    }

    /// Create a new InvalidDateTime error
    pub fn invalid_date_time(datetime: impl Into<String>) -> Self {
        Self::InvalidDateTime(datetime.into())
    }

    /// Create a new InvalidStatus error
    pub fn invalid_status(status: impl Into<String>) -> Self {
        Self::InvalidStatus(status.into())
    }

    /// Create a new InvalidConsent error
    pub fn invalid_consent(message: impl Into<String>) -> Self {
        Self::InvalidConsent {
            message: message.into(),
        }
    }

    /// Check if this error is a client error (4xx category)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidIntentId(_)
                | Self::InvalidApiVersion(_)
                | Self::InvalidDateTime(_)
                | Self::InvalidStatus(_)
                | Self::InvalidConsent { .. }
                | Self::JsonError(_)
        )
    }

    /// Get error category for logging/monitoring
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidIntentId(_)
            | Self::InvalidApiVersion(_)
            | Self::InvalidDateTime(_)
            | Self::InvalidStatus(_)
            | Self::InvalidConsent { .. } => ErrorCategory::Validation,
            Self::JsonError(_) => ErrorCategory::Serialization,
            Self::TimeError(_) | Self::UuidError(_) => ErrorCategory::System,
        }
    }
}

/// Error categories for monitoring and classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Serialization,
    System,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::Serialization => write!(f, "serialization"),
            Self::System => write!(f, "system"),
        }
    }
}

/// Convenience result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = CoreError::invalid_intent_id("XYZ_123");
        assert_eq!(err.to_string(), "Invalid intent id: XYZ_123");
        assert!(err.is_client_error());
        assert_eq!(err.category(), ErrorCategory::Validation);
    }

    #[test]
    fn test_invalid_api_version_error() {
        let err = CoreError::invalid_api_version("not-a-version");
        assert_eq!(err.to_string(), "Invalid API version: not-a-version");
        assert!(err.is_client_error());
        assert_eq!(err.category(), ErrorCategory::Validation);
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err: serde_json::Error =
            serde_json::from_str::<serde_json::Value>("{ invalid }").unwrap_err();
        let core_err: CoreError = json_err.into();

        assert!(matches!(core_err, CoreError::JsonError(_)));
        assert!(core_err.is_client_error());
        assert_eq!(core_err.category(), ErrorCategory::Serialization);
    }

    #[test]
    fn test_uuid_error_conversion() {
        let uuid_err = uuid::Uuid::parse_str("not-a-uuid").unwrap_err();
        let core_err: CoreError = uuid_err.into();

        assert!(matches!(core_err, CoreError::UuidError(_)));
        assert!(!core_err.is_client_error());
        assert_eq!(core_err.category(), ErrorCategory::System);
    }

    #[test]
    fn test_error_categories_display() {
        assert_eq!(ErrorCategory::Validation.to_string(), "validation");
        assert_eq!(ErrorCategory::Serialization.to_string(), "serialization");
        assert_eq!(ErrorCategory::System.to_string(), "system");
    }

    #[test]
    fn test_invalid_consent_message() {
        let err = CoreError::invalid_consent("missing requestObj");
        assert!(err.to_string().contains("missing requestObj"));
        assert_eq!(err.category(), ErrorCategory::Validation);
    }
}
