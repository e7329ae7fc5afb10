//! Consent decisions.
//!
//! The redirect UI submits its outcome as a single [`ConsentDecision`]
//! after the PSU has either granted or declined the requested access. This
//! module translates that decision into the corresponding service call,
//! validating that the right authorisation data accompanies the right
//! action before any state changes.

use obrcs_core::{Consent, ConsentAuthorisation};
use serde::{Deserialize, Serialize};

use crate::error::{ConsentStoreError, Result};
use crate::service::{AuthoriseConsentArgs, ConsentService};

/// Outcome chosen by the PSU on the redirect UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecisionAction {
    Authorise,
    Reject,
}

impl std::fmt::Display for DecisionAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Authorise => write!(f, "Authorise"),
            Self::Reject => write!(f, "Reject"),
        }
    }
}

/// A PSU's decision over a pending consent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsentDecision {
    pub intent_id: String,
    pub api_client_id: String,
    pub resource_owner_id: String,
    pub action: DecisionAction,
    /// Present only when authorising; carries the category-specific data
    /// the PSU selected (accounts, debtor account).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorisation: Option<ConsentAuthorisation>,
}

/// Applies PSU decisions to consents.
pub struct ConsentDecisionService {
    consents: ConsentService,
}

impl ConsentDecisionService {
    #[must_use]
    pub fn new(consents: ConsentService) -> Self {
        Self { consents }
    }

    /// Applies a decision, dispatching to authorise or reject.
    ///
    /// An authorise decision without authorisation data, or a reject
    /// decision carrying some, fails with
    /// [`ConsentStoreError::InvalidConsentDecision`] before the consent is
    /// touched.
    pub async fn submit(&self, decision: ConsentDecision) -> Result<Consent> {
        match decision.action {
            DecisionAction::Authorise => {
                let Some(authorisation) = decision.authorisation else {
                    return Err(ConsentStoreError::invalid_consent_decision(
                        &decision.intent_id,
                        "an authorise decision requires authorisation data",
                    ));
                };
                self.consents
                    .authorise_consent(AuthoriseConsentArgs {
                        id: decision.intent_id,
                        api_client_id: decision.api_client_id,
                        resource_owner_id: decision.resource_owner_id,
                        authorisation,
                    })
                    .await
            }
            DecisionAction::Reject => {
                if decision.authorisation.is_some() {
                    return Err(ConsentStoreError::invalid_consent_decision(
                        &decision.intent_id,
                        "a reject decision must not carry authorisation data",
                    ));
                }
                self.consents
                    .reject_consent(
                        &decision.intent_id,
                        &decision.api_client_id,
                        &decision.resource_owner_id,
                    )
                    .await
            }
        }
    }
}
