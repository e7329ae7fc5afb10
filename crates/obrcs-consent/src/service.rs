//! The consent service.
//!
//! This is the only component permitted to mutate consent status. It
//! enforces ownership scoping, the per-category transition model, the API
//! version compatibility rule, and idempotent creation for payment-type
//! consents.
//!
//! # Concurrency
//!
//! Every mutation is a single version-checked store write. A losing
//! concurrent writer receives [`ConsentStoreError::WriteConflict`], which is
//! retryable; the service itself never retries. The one read-then-write
//! pattern - idempotent creation - leans on the store's unique
//! `(apiClientId, idempotencyKey)` index rather than an application-level
//! check-then-insert, so concurrent duplicate creates cannot race.

use obrcs_core::consent::fingerprint;
use obrcs_core::{
    ApiVersion, Consent, ConsentAuthorisation, ConsentStatus, IdempotencyRecord, IntentType,
    now_utc,
};
use obrcs_storage::{DynConsentStore, StorageError, Visibility};
use serde_json::Value;

use crate::config::ConsentServiceConfig;
use crate::error::{ConsentStoreError, Result};

/// Request to create a new consent.
#[derive(Debug, Clone)]
pub struct CreateConsentRequest {
    pub intent_type: IntentType,
    pub api_client_id: String,
    /// Opaque category-specific payload; stored immutably on the consent.
    pub request_obj: Value,
    /// API schema version the client is calling under.
    pub request_version: ApiVersion,
    /// Required for idempotency-supporting (payment-type) categories,
    /// rejected for the rest.
    pub idempotency_key: Option<String>,
}

impl CreateConsentRequest {
    #[must_use]
    pub fn new(
        intent_type: IntentType,
        api_client_id: impl Into<String>,
        request_obj: Value,
        request_version: ApiVersion,
    ) -> Self {
        Self {
            intent_type,
            api_client_id: api_client_id.into(),
            request_obj,
            request_version,
            idempotency_key: None,
        }
    }

    #[must_use]
    pub fn with_idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.idempotency_key = Some(key.into());
        self
    }
}

/// Arguments for authorising a consent.
#[derive(Debug, Clone)]
pub struct AuthoriseConsentArgs {
    pub id: String,
    pub api_client_id: String,
    /// The PSU granting the authorisation.
    pub resource_owner_id: String,
    /// Category-specific authorisation data.
    pub authorisation: ConsentAuthorisation,
}

/// Orchestrates create/get/authorise/reject/consume/delete over a
/// [`ConsentStore`](obrcs_storage::ConsentStore).
pub struct ConsentService {
    store: DynConsentStore,
    config: ConsentServiceConfig,
}

impl ConsentService {
    /// Creates a new consent service over the given store.
    #[must_use]
    pub fn new(store: DynConsentStore, config: ConsentServiceConfig) -> Self {
        Self { store, config }
    }

    /// Creates a new consent in its category's initial status.
    ///
    /// For idempotency-supporting categories the key shields retries: a
    /// repeat create with the same `(api_client_id, key)` before expiry
    /// returns the original record unchanged, provided the payload is
    /// identical; a different payload fails with
    /// [`ConsentStoreError::IdempotencyError`].
    pub async fn create_consent(&self, request: CreateConsentRequest) -> Result<Consent> {
        if request.api_client_id.trim().is_empty() {
            return Err(ConsentStoreError::bad_request("apiClientId must be supplied"));
        }
        if request.request_obj.is_null() {
            return Err(ConsentStoreError::bad_request("requestObj must be supplied"));
        }
        match (&request.idempotency_key, request.intent_type.supports_idempotency()) {
            (None, true) => {
                return Err(ConsentStoreError::bad_request(format!(
                    "idempotency key is required for {}",
                    request.intent_type
                )));
            }
            (Some(_), false) => {
                return Err(ConsentStoreError::bad_request(format!(
                    "idempotency key is not supported for {}",
                    request.intent_type
                )));
            }
            _ => {}
        }
        if let Some(key) = &request.idempotency_key {
            if key.trim().is_empty() {
                return Err(ConsentStoreError::bad_request(
                    "idempotency key must not be blank",
                ));
            }
        }

        if let Some(key) = &request.idempotency_key {
            let now = now_utc();
            if let Some(existing) = self
                .store
                .find_by_idempotency_key(&request.api_client_id, key, &now)
                .await?
            {
                return self.idempotent_hit(existing, key, &request.request_obj);
            }
        }

        let mut consent = Consent::new(
            request.intent_type,
            request.api_client_id.clone(),
            request.request_obj.clone(),
            request.request_version,
        );
        if let Some(key) = &request.idempotency_key {
            let expiration = consent
                .creation_date_time
                .saturating_add(self.config.idempotency_key_lifetime);
            consent = consent.with_idempotency(IdempotencyRecord::new(
                key.clone(),
                expiration,
                &request.request_obj,
            ));
        }

        match self.store.insert(&consent).await {
            Ok(stored) => {
                tracing::debug!(
                    intent_id = %stored.id,
                    api_client_id = %stored.api_client_id,
                    intent_type = %stored.intent_type,
                    "consent created"
                );
                Ok(stored)
            }
            Err(StorageError::DuplicateIdempotencyKey { key, .. }) => {
                // lost the creation race: the index winner is the record
                let winner = self
                    .store
                    .find_by_idempotency_key(&request.api_client_id, &key, &now_utc())
                    .await?
                    .ok_or_else(|| {
                        ConsentStoreError::idempotency_error(
                            &key,
                            "index rejected insert but no live record was found",
                        )
                    })?;
                self.idempotent_hit(winner, &key, &request.request_obj)
            }
            Err(other) => Err(other.into()),
        }
    }

    /// Fetches a consent, scoped to the owning client.
    ///
    /// Absent, soft-deleted, and foreign consents are indistinguishable to
    /// the caller: all fail with [`ConsentStoreError::NotFound`]. When
    /// `requested_version` is given, the backward-compatibility rule is
    /// enforced: a consent created under a later version fails with
    /// [`ConsentStoreError::InvalidApiVersion`].
    pub async fn get_consent(
        &self,
        id: &str,
        api_client_id: &str,
        requested_version: Option<&ApiVersion>,
    ) -> Result<Consent> {
        let consent = self
            .store
            .find_by_id(id, Visibility::ActiveOnly)
            .await?
            .filter(|consent| consent.is_owned_by(api_client_id))
            .ok_or_else(|| ConsentStoreError::not_found(id))?;

        if let Some(requested) = requested_version {
            if !ApiVersion::can_access(&consent.request_version, requested) {
                return Err(ConsentStoreError::invalid_api_version(
                    id,
                    consent.request_version,
                    *requested,
                ));
            }
        }
        Ok(consent)
    }

    /// Authorises a consent on behalf of a PSU.
    ///
    /// Sets the status, the resource owner, and the category-specific
    /// authorisation data together in one atomic, version-checked write.
    pub async fn authorise_consent(&self, args: AuthoriseConsentArgs) -> Result<Consent> {
        if args.resource_owner_id.trim().is_empty() {
            return Err(ConsentStoreError::bad_request(
                "resourceOwnerId must be supplied",
            ));
        }

        let mut consent = self.fetch_for_mutation(&args.id, &args.api_client_id).await?;

        if !args.authorisation.matches_intent_type(consent.intent_type) {
            return Err(ConsentStoreError::invalid_consent_decision(
                &args.id,
                format!(
                    "authorisation data does not match a {} consent",
                    consent.intent_type
                ),
            ));
        }
        validate_authorisation(&args.id, &args.authorisation)?;

        self.check_transition(&consent, ConsentStatus::Authorised)?;

        consent.apply_status(ConsentStatus::Authorised);
        consent.resource_owner_id = Some(args.resource_owner_id);
        consent.authorisation = Some(args.authorisation);
        self.persist(consent).await
    }

    /// Rejects a consent on behalf of a PSU.
    ///
    /// Revocation of an authorised consent reuses this transition; no
    /// category-specific authorisation data is touched.
    pub async fn reject_consent(
        &self,
        id: &str,
        api_client_id: &str,
        resource_owner_id: &str,
    ) -> Result<Consent> {
        if resource_owner_id.trim().is_empty() {
            return Err(ConsentStoreError::bad_request(
                "resourceOwnerId must be supplied",
            ));
        }

        let mut consent = self.fetch_for_mutation(id, api_client_id).await?;
        self.check_transition(&consent, ConsentStatus::Rejected)?;

        consent.apply_status(ConsentStatus::Rejected);
        consent.resource_owner_id = Some(resource_owner_id.to_string());
        self.persist(consent).await
    }

    /// Marks a payment consent's instruction as executed.
    ///
    /// Only payment categories have an `Authorised -> Consumed` edge; for
    /// every other category, and from every other status, this fails with
    /// [`ConsentStoreError::InvalidStateTransition`].
    pub async fn consume_consent(&self, id: &str, api_client_id: &str) -> Result<Consent> {
        let mut consent = self.fetch_for_mutation(id, api_client_id).await?;
        self.check_transition(&consent, ConsentStatus::Consumed)?;

        consent.apply_status(ConsentStatus::Consumed);
        self.persist(consent).await
    }

    /// Soft-deletes a consent.
    ///
    /// Deleting an absent or already-deleted consent succeeds (idempotent
    /// delete); deleting another client's live consent fails with
    /// [`ConsentStoreError::InvalidPermissions`].
    pub async fn delete_consent(&self, id: &str, api_client_id: &str) -> Result<()> {
        let Some(mut consent) = self
            .store
            .find_by_id(id, Visibility::IncludeDeleted)
            .await?
        else {
            return Ok(());
        };
        if consent.is_deleted() {
            return Ok(());
        }
        if !consent.is_owned_by(api_client_id) {
            return Err(ConsentStoreError::invalid_permissions(id));
        }

        consent.mark_deleted();
        self.persist(consent).await?;
        tracing::debug!(intent_id = %id, api_client_id = %api_client_id, "consent deleted");
        Ok(())
    }

    /// Resolves an idempotency-key hit: same payload returns the original
    /// record unchanged, a different payload is a hard conflict.
    fn idempotent_hit(&self, existing: Consent, key: &str, request_obj: &Value) -> Result<Consent> {
        let stored_fingerprint = existing
            .idempotency
            .as_ref()
            .map(|record| record.request_fingerprint.as_str());
        if stored_fingerprint != Some(fingerprint(request_obj).as_str()) {
            tracing::warn!(
                intent_id = %existing.id,
                api_client_id = %existing.api_client_id,
                idempotency_key = %key,
                "idempotency key reused with a different payload"
            );
            return Err(ConsentStoreError::idempotency_error(
                key,
                format!("key reused with a different payload for {}", existing.id),
            ));
        }
        tracing::debug!(
            intent_id = %existing.id,
            idempotency_key = %key,
            "idempotent create returned existing consent"
        );
        Ok(existing)
    }

    /// Fetches a consent for mutation, scoped to the owning client.
    ///
    /// Absent and soft-deleted consents fail with `NotFound`; a live
    /// consent owned by another client fails with `InvalidPermissions`.
    async fn fetch_for_mutation(&self, id: &str, api_client_id: &str) -> Result<Consent> {
        let consent = self
            .store
            .find_by_id(id, Visibility::ActiveOnly)
            .await?
            .ok_or_else(|| ConsentStoreError::not_found(id))?;
        if !consent.is_owned_by(api_client_id) {
            return Err(ConsentStoreError::invalid_permissions(id));
        }
        Ok(consent)
    }

    /// Checks the category's transition table before any mutation.
    fn check_transition(&self, consent: &Consent, to: ConsentStatus) -> Result<()> {
        if consent.state_model().can_transition(consent.status, to) {
            return Ok(());
        }
        if consent.status == ConsentStatus::Authorised && to == ConsentStatus::Authorised {
            return Err(ConsentStoreError::reauthentication_not_supported(
                &consent.id,
            ));
        }
        tracing::debug!(
            intent_id = %consent.id,
            from = %consent.status,
            to = %to,
            "illegal state transition blocked"
        );
        Err(ConsentStoreError::invalid_state_transition(
            &consent.id,
            consent.status,
            to,
        ))
    }

    /// Persists a mutated consent with the optimistic-concurrency check.
    async fn persist(&self, consent: Consent) -> Result<Consent> {
        let expected_version = consent.entity_version;
        match self.store.update(&consent, expected_version).await {
            Ok(stored) => Ok(stored),
            Err(err @ StorageError::VersionConflict { .. }) => {
                tracing::warn!(
                    intent_id = %consent.id,
                    expected_version,
                    "lost a concurrent consent update"
                );
                Err(err.into())
            }
            Err(other) => Err(other.into()),
        }
    }
}

/// Validates the contents of a category-specific authorisation payload.
fn validate_authorisation(id: &str, authorisation: &ConsentAuthorisation) -> Result<()> {
    match authorisation {
        ConsentAuthorisation::AccountAccess { account_ids } => {
            if account_ids.is_empty() || account_ids.iter().any(|a| a.trim().is_empty()) {
                return Err(ConsentStoreError::invalid_consent_decision(
                    id,
                    "at least one authorised account id is required",
                ));
            }
        }
        ConsentAuthorisation::Payment { debtor_account_id } => {
            if debtor_account_id.trim().is_empty() {
                return Err(ConsentStoreError::invalid_debtor_account(
                    id,
                    "debtor account id is required",
                ));
            }
        }
        ConsentAuthorisation::FundsConfirmation { account_id } => {
            if account_id.trim().is_empty() {
                return Err(ConsentStoreError::invalid_consent_decision(
                    id,
                    "an authorised account id is required",
                ));
            }
        }
        ConsentAuthorisation::CustomerInfo => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_authorisation_account_access() {
        let ok = ConsentAuthorisation::AccountAccess {
            account_ids: vec!["a1".into(), "a2".into()],
        };
        assert!(validate_authorisation("AAC_1", &ok).is_ok());

        let empty = ConsentAuthorisation::AccountAccess {
            account_ids: vec![],
        };
        assert!(matches!(
            validate_authorisation("AAC_1", &empty),
            Err(ConsentStoreError::InvalidConsentDecision { .. })
        ));

        let blank = ConsentAuthorisation::AccountAccess {
            account_ids: vec!["a1".into(), "  ".into()],
        };
        assert!(validate_authorisation("AAC_1", &blank).is_err());
    }

    #[test]
    fn test_validate_authorisation_payment() {
        let ok = ConsentAuthorisation::Payment {
            debtor_account_id: "acc-1".into(),
        };
        assert!(validate_authorisation("DPC_1", &ok).is_ok());

        let blank = ConsentAuthorisation::Payment {
            debtor_account_id: " ".into(),
        };
        assert!(matches!(
            validate_authorisation("DPC_1", &blank),
            Err(ConsentStoreError::InvalidDebtorAccount { .. })
        ));
    }

    #[test]
    fn test_validate_authorisation_funds_confirmation() {
        let ok = ConsentAuthorisation::FundsConfirmation {
            account_id: "acc-1".into(),
        };
        assert!(validate_authorisation("FCC_1", &ok).is_ok());

        let blank = ConsentAuthorisation::FundsConfirmation {
            account_id: "".into(),
        };
        assert!(validate_authorisation("FCC_1", &blank).is_err());
    }

    #[test]
    fn test_validate_authorisation_customer_info() {
        assert!(validate_authorisation("CIC_1", &ConsentAuthorisation::CustomerInfo).is_ok());
    }
}
