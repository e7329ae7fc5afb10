use crate::intent::IntentType;
use crate::status::{ConsentStatus, StateModel};
use crate::time::{ConsentDateTime, now_utc};
use crate::version::ApiVersion;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Category-specific data captured when a consent is authorised.
///
/// Modelled as a tagged union: one variant per category family, selected by
/// the consent's [`IntentType`]. The variant and the resource owner id are
/// populated together, atomically, only by the authorise operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ConsentAuthorisation {
    /// Accounts the PSU granted access to.
    #[serde(rename_all = "camelCase")]
    AccountAccess { account_ids: Vec<String> },

    /// Debtor account selected for a payment instruction.
    #[serde(rename_all = "camelCase")]
    Payment { debtor_account_id: String },

    /// Account covered by a funds-confirmation or VRP consent.
    #[serde(rename_all = "camelCase")]
    FundsConfirmation { account_id: String },

    /// Customer-info consents carry no additional authorisation data.
    CustomerInfo,
}

impl ConsentAuthorisation {
    /// Whether this authorisation payload is the right shape for the given
    /// consent category.
    #[must_use]
    pub fn matches_intent_type(&self, intent_type: IntentType) -> bool {
        match self {
            ConsentAuthorisation::AccountAccess { .. } => {
                intent_type == IntentType::AccountAccessConsent
            }
            ConsentAuthorisation::Payment { .. } => intent_type.is_payment(),
            ConsentAuthorisation::FundsConfirmation { .. } => matches!(
                intent_type,
                IntentType::FundsConfirmationConsent | IntentType::DomesticVrpConsent
            ),
            ConsentAuthorisation::CustomerInfo => intent_type == IntentType::CustomerInfoConsent,
        }
    }
}

/// Idempotency guard attached to payment-type consents at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdempotencyRecord {
    /// Client-supplied idempotency key.
    pub key: String,
    /// When the key stops shielding retries; a create after this instant
    /// produces a fresh, independent record.
    pub expiration: ConsentDateTime,
    /// Canonical fingerprint of the creation payload. Reuse of an unexpired
    /// key with a different payload is rejected instead of returning stale
    /// data.
    pub request_fingerprint: String,
}

impl IdempotencyRecord {
    #[must_use]
    pub fn new(key: impl Into<String>, expiration: ConsentDateTime, request_obj: &Value) -> Self {
        Self {
            key: key.into(),
            expiration,
            request_fingerprint: fingerprint(request_obj),
        }
    }

    /// Whether the key is still shielding retries at `now`.
    #[must_use]
    pub fn is_live(&self, now: &ConsentDateTime) -> bool {
        *now < self.expiration
    }
}

/// Canonical fingerprint of a creation payload.
///
/// `serde_json` keeps object keys in a sorted map, so the serialized string
/// is a stable canonical form for equality comparison.
#[must_use]
pub fn fingerprint(request_obj: &Value) -> String {
    request_obj.to_string()
}

/// A consent record.
///
/// The base field set shared by every category (camelCase wire names),
/// with category-specific behavior hung off `intent_type` and
/// the [`ConsentAuthorisation`] union. `id`, `api_client_id`, `request_obj`,
/// `request_version` and `creation_date_time` never change after creation;
/// `status` only moves along the category's [`StateModel`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consent {
    /// Generated intent id, `<prefix><uuid>`, primary key in storage.
    pub id: String,
    pub intent_type: IntentType,
    /// Optimistic-concurrency counter, incremented on every persisted
    /// mutation.
    pub entity_version: u64,
    /// Opaque category-specific payload capturing what the consent
    /// authorizes.
    pub request_obj: Value,
    /// API schema version in force at creation.
    pub request_version: ApiVersion,
    pub status: ConsentStatus,
    /// OAuth client (TPP) that created the consent; tenancy scope for every
    /// operation.
    pub api_client_id: String,
    /// End user (PSU) who authorised or rejected; `None` while awaiting
    /// authorisation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_owner_id: Option<String>,
    /// Soft-delete flag; a deleted consent behaves as absent.
    pub deleted: bool,
    pub creation_date_time: ConsentDateTime,
    pub status_updated_date_time: ConsentDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorisation: Option<ConsentAuthorisation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idempotency: Option<IdempotencyRecord>,
}

impl Consent {
    /// Creates a new consent in its category's initial status, with
    /// creation and status timestamps set to the same instant.
    #[must_use]
    pub fn new(
        intent_type: IntentType,
        api_client_id: impl Into<String>,
        request_obj: Value,
        request_version: ApiVersion,
    ) -> Self {
        let now = now_utc();
        Self {
            id: intent_type.generate_intent_id(),
            intent_type,
            entity_version: 0,
            request_obj,
            request_version,
            status: StateModel::for_intent_type(intent_type).initial,
            api_client_id: api_client_id.into(),
            resource_owner_id: None,
            deleted: false,
            creation_date_time: now,
            status_updated_date_time: now,
            authorisation: None,
            idempotency: None,
        }
    }

    /// Attaches an idempotency record (payment categories).
    #[must_use]
    pub fn with_idempotency(mut self, record: IdempotencyRecord) -> Self {
        self.idempotency = Some(record);
        self
    }

    /// Whether `api_client_id` owns this consent.
    #[must_use]
    pub fn is_owned_by(&self, api_client_id: &str) -> bool {
        self.api_client_id == api_client_id
    }

    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    pub fn mark_deleted(&mut self) {
        self.deleted = true;
    }

    /// The transition model for this consent's category.
    #[must_use]
    pub fn state_model(&self) -> &'static StateModel {
        StateModel::for_intent_type(self.intent_type)
    }

    /// Moves the consent to `status` and stamps `status_updated_date_time`.
    ///
    /// The caller is responsible for having checked the transition against
    /// the state model; this keeps the timestamp monotonic even when the
    /// clock reads an earlier instant than the stored one.
    pub fn apply_status(&mut self, status: ConsentStatus) {
        let now = now_utc();
        self.status = status;
        self.status_updated_date_time = now.max(self.status_updated_date_time);
    }
}
