//! Consent status codes and the per-category transition model.
//!
//! The transition tables below are the single source of truth for legal
//! status moves. Every mutation of a consent consults
//! [`StateModel::can_transition`] first; a transition not present in the
//! table is a hard failure, never silently ignored.
//!
//! Revocation reuses the `Rejected` status rather than introducing a
//! separate terminal state. This is a documented simplification.

use crate::error::CoreError;
use crate::intent::IntentType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Status of a consent, with OBIE wire names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConsentStatus {
    AwaitingAuthorisation,
    Authorised,
    Rejected,
    Consumed,
}

impl ConsentStatus {
    pub const ALL: [ConsentStatus; 4] = [
        ConsentStatus::AwaitingAuthorisation,
        ConsentStatus::Authorised,
        ConsentStatus::Rejected,
        ConsentStatus::Consumed,
    ];
}

impl fmt::Display for ConsentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsentStatus::AwaitingAuthorisation => write!(f, "AwaitingAuthorisation"),
            ConsentStatus::Authorised => write!(f, "Authorised"),
            ConsentStatus::Rejected => write!(f, "Rejected"),
            ConsentStatus::Consumed => write!(f, "Consumed"),
        }
    }
}

impl FromStr for ConsentStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AwaitingAuthorisation" => Ok(ConsentStatus::AwaitingAuthorisation),
            "Authorised" => Ok(ConsentStatus::Authorised),
            "Rejected" => Ok(ConsentStatus::Rejected),
            "Consumed" => Ok(ConsentStatus::Consumed),
            other => Err(CoreError::invalid_status(other.to_string())),
        }
    }
}

/// Directed graph of legal status transitions for one consent category.
///
/// Exposed as pure `'static` data plus the [`can_transition`] query.
///
/// [`can_transition`]: StateModel::can_transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateModel {
    /// Status assigned at creation.
    pub initial: ConsentStatus,
    /// Legal `(from, to)` edges.
    pub edges: &'static [(ConsentStatus, ConsentStatus)],
}

/// Account-access family: revocable, re-authenticable.
///
/// The `Authorised -> Authorised` self-loop supports PSU re-authentication.
static ACCOUNT_ACCESS_MODEL: StateModel = StateModel {
    initial: ConsentStatus::AwaitingAuthorisation,
    edges: &[
        (
            ConsentStatus::AwaitingAuthorisation,
            ConsentStatus::Authorised,
        ),
        (
            ConsentStatus::AwaitingAuthorisation,
            ConsentStatus::Rejected,
        ),
        (ConsentStatus::Authorised, ConsentStatus::Authorised),
        (ConsentStatus::Authorised, ConsentStatus::Rejected),
    ],
};

/// Payment family: one-way to `Consumed` once executed, no re-authentication.
static PAYMENT_MODEL: StateModel = StateModel {
    initial: ConsentStatus::AwaitingAuthorisation,
    edges: &[
        (
            ConsentStatus::AwaitingAuthorisation,
            ConsentStatus::Authorised,
        ),
        (
            ConsentStatus::AwaitingAuthorisation,
            ConsentStatus::Rejected,
        ),
        (ConsentStatus::Authorised, ConsentStatus::Consumed),
    ],
};

/// Long-lived revocable family (funds confirmation, VRP): no re-authentication,
/// never consumed.
static REVOCABLE_MODEL: StateModel = StateModel {
    initial: ConsentStatus::AwaitingAuthorisation,
    edges: &[
        (
            ConsentStatus::AwaitingAuthorisation,
            ConsentStatus::Authorised,
        ),
        (
            ConsentStatus::AwaitingAuthorisation,
            ConsentStatus::Rejected,
        ),
        (ConsentStatus::Authorised, ConsentStatus::Rejected),
    ],
};

impl StateModel {
    /// The transition model for a consent category.
    #[must_use]
    pub fn for_intent_type(intent_type: IntentType) -> &'static StateModel {
        match intent_type {
            IntentType::AccountAccessConsent | IntentType::CustomerInfoConsent => {
                &ACCOUNT_ACCESS_MODEL
            }
            IntentType::DomesticPaymentConsent
            | IntentType::InternationalPaymentConsent
            | IntentType::DomesticStandingOrderConsent
            | IntentType::FilePaymentConsent => &PAYMENT_MODEL,
            IntentType::FundsConfirmationConsent | IntentType::DomesticVrpConsent => {
                &REVOCABLE_MODEL
            }
        }
    }

    /// Whether `from -> to` is a legal transition in this model.
    #[must_use]
    pub fn can_transition(&self, from: ConsentStatus, to: ConsentStatus) -> bool {
        self.edges.iter().any(|&(f, t)| f == from && t == to)
    }

    /// Statuses reachable in one step from `from`.
    #[must_use]
    pub fn next_statuses(&self, from: ConsentStatus) -> Vec<ConsentStatus> {
        self.edges
            .iter()
            .filter(|&&(f, _)| f == from)
            .map(|&(_, t)| t)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display_from_str_roundtrip() {
        for status in ConsentStatus::ALL {
            let name = status.to_string();
            assert_eq!(name.parse::<ConsentStatus>().unwrap(), status);
        }
        assert!("Pending".parse::<ConsentStatus>().is_err());
    }

    #[test]
    fn test_status_serde_wire_names() {
        let json = serde_json::to_string(&ConsentStatus::AwaitingAuthorisation).unwrap();
        assert_eq!(json, "\"AwaitingAuthorisation\"");
        let back: ConsentStatus = serde_json::from_str("\"Consumed\"").unwrap();
        assert_eq!(back, ConsentStatus::Consumed);
    }

    #[test]
    fn test_all_models_start_awaiting_authorisation() {
        for intent_type in IntentType::ALL {
            let model = StateModel::for_intent_type(intent_type);
            assert_eq!(model.initial, ConsentStatus::AwaitingAuthorisation);
        }
    }

    #[test]
    fn test_account_access_transitions() {
        let model = StateModel::for_intent_type(IntentType::AccountAccessConsent);

        assert!(model.can_transition(
            ConsentStatus::AwaitingAuthorisation,
            ConsentStatus::Authorised
        ));
        assert!(model.can_transition(
            ConsentStatus::AwaitingAuthorisation,
            ConsentStatus::Rejected
        ));
        // re-authentication self-loop
        assert!(model.can_transition(ConsentStatus::Authorised, ConsentStatus::Authorised));
        // revocation reuses Rejected
        assert!(model.can_transition(ConsentStatus::Authorised, ConsentStatus::Rejected));
        // Rejected is terminal
        for to in ConsentStatus::ALL {
            assert!(!model.can_transition(ConsentStatus::Rejected, to));
        }
        assert!(!model.can_transition(ConsentStatus::Authorised, ConsentStatus::Consumed));
    }

    #[test]
    fn test_payment_transitions() {
        let model = StateModel::for_intent_type(IntentType::DomesticPaymentConsent);

        assert!(model.can_transition(
            ConsentStatus::AwaitingAuthorisation,
            ConsentStatus::Authorised
        ));
        assert!(model.can_transition(ConsentStatus::Authorised, ConsentStatus::Consumed));
        // no re-authentication for payments
        assert!(!model.can_transition(ConsentStatus::Authorised, ConsentStatus::Authorised));
        // no revocation after authorisation; the instruction is executed or not
        assert!(!model.can_transition(ConsentStatus::Authorised, ConsentStatus::Rejected));
        // Consumed is terminal
        for to in ConsentStatus::ALL {
            assert!(!model.can_transition(ConsentStatus::Consumed, to));
        }
    }

    #[test]
    fn test_revocable_transitions() {
        for intent_type in [
            IntentType::FundsConfirmationConsent,
            IntentType::DomesticVrpConsent,
        ] {
            let model = StateModel::for_intent_type(intent_type);
            assert!(model.can_transition(ConsentStatus::Authorised, ConsentStatus::Rejected));
            assert!(!model.can_transition(ConsentStatus::Authorised, ConsentStatus::Authorised));
            assert!(!model.can_transition(ConsentStatus::Authorised, ConsentStatus::Consumed));
        }
    }

    #[test]
    fn test_no_transitions_into_awaiting_authorisation() {
        for intent_type in IntentType::ALL {
            let model = StateModel::for_intent_type(intent_type);
            for from in ConsentStatus::ALL {
                assert!(
                    !model.can_transition(from, ConsentStatus::AwaitingAuthorisation),
                    "{intent_type}: {from} -> AwaitingAuthorisation must be illegal"
                );
            }
        }
    }

    #[test]
    fn test_next_statuses() {
        let model = StateModel::for_intent_type(IntentType::DomesticPaymentConsent);
        let next = model.next_statuses(ConsentStatus::Authorised);
        assert_eq!(next, vec![ConsentStatus::Consumed]);
        assert!(model.next_statuses(ConsentStatus::Rejected).is_empty());
    }

    #[test]
    fn test_reauthentication_matches_intent_capability() {
        for intent_type in IntentType::ALL {
            let model = StateModel::for_intent_type(intent_type);
            assert_eq!(
                model.can_transition(ConsentStatus::Authorised, ConsentStatus::Authorised),
                intent_type.supports_reauthentication(),
                "self-loop mismatch for {intent_type}"
            );
        }
    }
}
