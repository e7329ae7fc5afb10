use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Maximum length of a generated intent id.
///
/// Intent ids appear in redirect URLs and are persisted by downstream
/// back-ends with a 40 character column limit; the generated id is truncated
/// to fit. This limit is an external contract and must not change.
pub const MAX_INTENT_ID_LENGTH: usize = 40;

/// The consent categories managed by the service.
///
/// Each category owns a unique, stable identifier prefix. The prefix makes
/// an intent id self-describing: the category can be recovered from the id
/// alone via [`IntentType::identify`]. Prefixes are mutually non-prefixing
/// and are consumed externally (redirect URLs, webhook state), so they are
/// frozen forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntentType {
    AccountAccessConsent,
    DomesticPaymentConsent,
    InternationalPaymentConsent,
    DomesticStandingOrderConsent,
    FilePaymentConsent,
    FundsConfirmationConsent,
    CustomerInfoConsent,
    DomesticVrpConsent,
}

impl IntentType {
    /// All known intent types, in prefix-match order.
    pub const ALL: [IntentType; 8] = [
        IntentType::AccountAccessConsent,
        IntentType::DomesticPaymentConsent,
        IntentType::InternationalPaymentConsent,
        IntentType::DomesticStandingOrderConsent,
        IntentType::FilePaymentConsent,
        IntentType::FundsConfirmationConsent,
        IntentType::CustomerInfoConsent,
        IntentType::DomesticVrpConsent,
    ];

    /// The identifier prefix for this category.
    #[must_use]
    pub fn prefix(&self) -> &'static str {
        match self {
            IntentType::AccountAccessConsent => "AAC_",
            IntentType::DomesticPaymentConsent => "DPC_",
            IntentType::InternationalPaymentConsent => "IPC_",
            IntentType::DomesticStandingOrderConsent => "DSOC_",
            IntentType::FilePaymentConsent => "FPC_",
            IntentType::FundsConfirmationConsent => "FCC_",
            IntentType::CustomerInfoConsent => "CIC_",
            IntentType::DomesticVrpConsent => "DVRP_",
        }
    }

    /// Generates a fresh intent id: the category prefix followed by a
    /// random 128-bit UUID, truncated to [`MAX_INTENT_ID_LENGTH`] characters.
    #[must_use]
    pub fn generate_intent_id(&self) -> String {
        let mut id = format!("{}{}", self.prefix(), Uuid::new_v4());
        id.truncate(MAX_INTENT_ID_LENGTH);
        id
    }

    /// Returns the category whose prefix leads `intent_id`, if any.
    ///
    /// First match wins; prefixes are mutually non-prefixing so order does
    /// not matter in practice.
    #[must_use]
    pub fn identify(intent_id: &str) -> Option<IntentType> {
        IntentType::ALL
            .into_iter()
            .find(|intent_type| intent_id.starts_with(intent_type.prefix()))
    }

    /// Whether creation of this category is guarded by an idempotency key.
    ///
    /// Payment-type consents (including VRP) support safe creation retries;
    /// information consents do not carry an idempotency key.
    #[must_use]
    pub fn supports_idempotency(&self) -> bool {
        matches!(
            self,
            IntentType::DomesticPaymentConsent
                | IntentType::InternationalPaymentConsent
                | IntentType::DomesticStandingOrderConsent
                | IntentType::FilePaymentConsent
                | IntentType::DomesticVrpConsent
        )
    }

    /// Whether an already-authorised consent of this category may be
    /// authorised again (PSU re-authentication).
    #[must_use]
    pub fn supports_reauthentication(&self) -> bool {
        matches!(
            self,
            IntentType::AccountAccessConsent | IntentType::CustomerInfoConsent
        )
    }

    /// Whether this category represents a payment instruction that is
    /// consumed on execution.
    #[must_use]
    pub fn is_payment(&self) -> bool {
        matches!(
            self,
            IntentType::DomesticPaymentConsent
                | IntentType::InternationalPaymentConsent
                | IntentType::DomesticStandingOrderConsent
                | IntentType::FilePaymentConsent
        )
    }
}

impl fmt::Display for IntentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntentType::AccountAccessConsent => write!(f, "AccountAccessConsent"),
            IntentType::DomesticPaymentConsent => write!(f, "DomesticPaymentConsent"),
            IntentType::InternationalPaymentConsent => write!(f, "InternationalPaymentConsent"),
            IntentType::DomesticStandingOrderConsent => write!(f, "DomesticStandingOrderConsent"),
            IntentType::FilePaymentConsent => write!(f, "FilePaymentConsent"),
            IntentType::FundsConfirmationConsent => write!(f, "FundsConfirmationConsent"),
            IntentType::CustomerInfoConsent => write!(f, "CustomerInfoConsent"),
            IntentType::DomesticVrpConsent => write!(f, "DomesticVrpConsent"),
        }
    }
}

impl FromStr for IntentType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AccountAccessConsent" => Ok(IntentType::AccountAccessConsent),
            "DomesticPaymentConsent" => Ok(IntentType::DomesticPaymentConsent),
            "InternationalPaymentConsent" => Ok(IntentType::InternationalPaymentConsent),
            "DomesticStandingOrderConsent" => Ok(IntentType::DomesticStandingOrderConsent),
            "FilePaymentConsent" => Ok(IntentType::FilePaymentConsent),
            "FundsConfirmationConsent" => Ok(IntentType::FundsConfirmationConsent),
            "CustomerInfoConsent" => Ok(IntentType::CustomerInfoConsent),
            "DomesticVrpConsent" => Ok(IntentType::DomesticVrpConsent),
            other => Err(CoreError::invalid_intent_id(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixes_are_mutually_non_prefixing() {
        for a in IntentType::ALL {
            for b in IntentType::ALL {
                if a != b {
                    assert!(
                        !a.prefix().starts_with(b.prefix()),
                        "{} prefix {} collides with {} prefix {}",
                        a,
                        a.prefix(),
                        b,
                        b.prefix()
                    );
                }
            }
        }
    }

    #[test]
    fn test_generate_intent_id_shape() {
        for intent_type in IntentType::ALL {
            let id = intent_type.generate_intent_id();
            assert!(id.starts_with(intent_type.prefix()));
            assert!(id.len() <= MAX_INTENT_ID_LENGTH, "id too long: {id}");
            // prefix + at least most of a UUID survives the truncation
            assert!(id.len() > intent_type.prefix().len() + 30);
        }
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let a = IntentType::AccountAccessConsent.generate_intent_id();
        let b = IntentType::AccountAccessConsent.generate_intent_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_identify_roundtrips_generated_ids() {
        for intent_type in IntentType::ALL {
            let id = intent_type.generate_intent_id();
            assert_eq!(IntentType::identify(&id), Some(intent_type));
        }
    }

    #[test]
    fn test_identify_unknown_prefix() {
        assert_eq!(IntentType::identify("XYZ_whatever"), None);
        assert_eq!(IntentType::identify(""), None);
    }

    #[test]
    fn test_capability_predicates() {
        assert!(!IntentType::AccountAccessConsent.supports_idempotency());
        assert!(IntentType::DomesticPaymentConsent.supports_idempotency());
        assert!(IntentType::DomesticVrpConsent.supports_idempotency());

        assert!(IntentType::AccountAccessConsent.supports_reauthentication());
        assert!(IntentType::CustomerInfoConsent.supports_reauthentication());
        assert!(!IntentType::DomesticPaymentConsent.supports_reauthentication());
        assert!(!IntentType::DomesticVrpConsent.supports_reauthentication());

        assert!(IntentType::FilePaymentConsent.is_payment());
        assert!(!IntentType::DomesticVrpConsent.is_payment());
        assert!(!IntentType::FundsConfirmationConsent.is_payment());
    }

    #[test]
    fn test_display_from_str_roundtrip() {
        for intent_type in IntentType::ALL {
            let name = intent_type.to_string();
            assert_eq!(name.parse::<IntentType>().unwrap(), intent_type);
        }
        assert!("NotAConsent".parse::<IntentType>().is_err());
    }
}
