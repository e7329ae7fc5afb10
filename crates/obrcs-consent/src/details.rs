//! Consent details for the redirect UI.
//!
//! Read side of the redirect flow: while a consent is awaiting
//! authorisation, the UI asks for everything it needs to render the
//! approval screen. The consent record itself carries the requested
//! access; the accounts the PSU may pick from come from the bank's own
//! systems, reached through [`CustomerDataProvider`].

use async_trait::async_trait;
use obrcs_core::{ApiVersion, ConsentDateTime, ConsentStatus, IntentType};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::Result;
use crate::service::ConsentService;

/// A selectable account, as presented on the authorisation screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub account_id: String,
    pub display_name: String,
    /// Masked identifier shown to the PSU, e.g. a truncated IBAN.
    pub masked_identifier: String,
}

/// Everything the redirect UI needs to render an authorisation screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsentDetails {
    pub intent_id: String,
    pub intent_type: IntentType,
    pub status: ConsentStatus,
    pub creation_date_time: ConsentDateTime,
    /// The requested access, verbatim as the TPP submitted it.
    pub request_obj: Value,
    /// Accounts the PSU may select; empty for categories that do not
    /// involve account selection.
    pub accounts: Vec<AccountSummary>,
}

/// Source of customer data held outside the consent store.
#[async_trait]
pub trait CustomerDataProvider: Send + Sync {
    /// Accounts the given PSU may authorise access against.
    async fn accounts_for_owner(&self, resource_owner_id: &str) -> Result<Vec<AccountSummary>>;
}

pub type DynCustomerDataProvider = Arc<dyn CustomerDataProvider>;

/// Fixed in-memory provider, keyed by resource owner id.
#[derive(Debug, Default)]
pub struct StaticCustomerDataProvider {
    accounts: HashMap<String, Vec<AccountSummary>>,
}

impl StaticCustomerDataProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_accounts(
        mut self,
        resource_owner_id: impl Into<String>,
        accounts: Vec<AccountSummary>,
    ) -> Self {
        self.accounts.insert(resource_owner_id.into(), accounts);
        self
    }
}

#[async_trait]
impl CustomerDataProvider for StaticCustomerDataProvider {
    async fn accounts_for_owner(&self, resource_owner_id: &str) -> Result<Vec<AccountSummary>> {
        Ok(self.accounts.get(resource_owner_id).cloned().unwrap_or_default())
    }
}

/// Assembles [`ConsentDetails`] views for the redirect UI.
pub struct ConsentDetailsService {
    consents: Arc<ConsentService>,
    customer_data: DynCustomerDataProvider,
}

impl ConsentDetailsService {
    #[must_use]
    pub fn new(consents: Arc<ConsentService>, customer_data: DynCustomerDataProvider) -> Self {
        Self {
            consents,
            customer_data,
        }
    }

    /// Fetches a consent and assembles its authorisation-screen view.
    ///
    /// Ownership scoping and version compatibility follow
    /// [`ConsentService::get_consent`]. Account summaries are fetched only
    /// for categories where the PSU selects accounts.
    pub async fn get_details(
        &self,
        id: &str,
        api_client_id: &str,
        resource_owner_id: &str,
        requested_version: Option<&ApiVersion>,
    ) -> Result<ConsentDetails> {
        let consent = self
            .consents
            .get_consent(id, api_client_id, requested_version)
            .await?;

        let accounts = if involves_account_selection(consent.intent_type) {
            self.customer_data.accounts_for_owner(resource_owner_id).await?
        } else {
            Vec::new()
        };

        Ok(ConsentDetails {
            intent_id: consent.id,
            intent_type: consent.intent_type,
            status: consent.status,
            creation_date_time: consent.creation_date_time,
            request_obj: consent.request_obj,
            accounts,
        })
    }
}

/// Whether the authorisation screen for this category includes picking
/// accounts.
fn involves_account_selection(intent_type: IntentType) -> bool {
    !matches!(intent_type, IntentType::CustomerInfoConsent)
}
