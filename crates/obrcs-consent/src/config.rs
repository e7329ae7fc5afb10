use time::Duration;

/// Configuration for the consent service.
#[derive(Debug, Clone)]
pub struct ConsentServiceConfig {
    /// How long an idempotency key shields creation retries.
    /// Default: 24 hours, per OBIE guidance for payment API idempotency.
    pub idempotency_key_lifetime: Duration,
}

impl Default for ConsentServiceConfig {
    fn default() -> Self {
        Self {
            idempotency_key_lifetime: Duration::hours(24),
        }
    }
}

impl ConsentServiceConfig {
    /// Creates a new configuration with a custom idempotency key lifetime.
    #[must_use]
    pub fn with_idempotency_key_lifetime(mut self, lifetime: Duration) -> Self {
        self.idempotency_key_lifetime = lifetime;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_lifetime() {
        let config = ConsentServiceConfig::default();
        assert_eq!(config.idempotency_key_lifetime, Duration::hours(24));
    }

    #[test]
    fn test_with_idempotency_key_lifetime() {
        let config =
            ConsentServiceConfig::default().with_idempotency_key_lifetime(Duration::minutes(5));
        assert_eq!(config.idempotency_key_lifetime, Duration::minutes(5));
    }
}
