//! Account-data provider abstraction
//!
//! - `AccountProvider` trait: accounts, transactions, institution names and
//!   public-token exchange for one linked item
//! - `ProviderClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Implementations: `PlaidProvider` (REST), `MockProvider` (in-memory)

mod mock;
mod plaid;

pub use mock::{MockItem, MockProvider, SAMPLE_ACCESS_TOKEN};
pub use plaid::PlaidProvider;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::{IngestConfig, PlaidConfig};
use crate::credentials::AccessToken;
use crate::error::Result;
use crate::models::Account;

/// A transaction as the provider reports it, before labeling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderTransaction {
    pub account_id: String,
    pub date: NaiveDate,
    /// Merchant name, falling back to the raw description
    pub merchant: String,
    pub amount: f64,
    pub raw_category: Option<String>,
}

#[async_trait]
pub trait AccountProvider: Send + Sync {
    /// All accounts on the item, in provider order
    async fn list_accounts(&self, token: &AccessToken) -> Result<Vec<Account>>;

    /// Transactions dated within `[start, end]`, across all accounts
    async fn list_transactions(
        &self,
        token: &AccessToken,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ProviderTransaction>>;

    /// Display name for an institution
    async fn institution_name(&self, token: &AccessToken, institution_id: &str) -> Result<String>;

    /// Trade a short-lived public token from the link flow for an access token
    async fn exchange_public_token(&self, public_token: &str) -> Result<AccessToken>;

    /// Provider name (for logging)
    fn name(&self) -> &str;
}

/// Concrete provider client enum
#[derive(Clone)]
pub enum ProviderClient {
    Plaid(PlaidProvider),
    Mock(MockProvider),
}

impl ProviderClient {
    /// Plaid when credentials are configured, otherwise the sample provider
    pub fn from_config(plaid: &PlaidConfig, ingest: &IngestConfig) -> Self {
        if plaid.is_configured() {
            ProviderClient::Plaid(PlaidProvider::new(plaid, ingest.page_size))
        } else {
            tracing::warn!("Plaid credentials not configured, using sample account data");
            ProviderClient::Mock(MockProvider::sample())
        }
    }
}

#[async_trait]
impl AccountProvider for ProviderClient {
    async fn list_accounts(&self, token: &AccessToken) -> Result<Vec<Account>> {
        match self {
            ProviderClient::Plaid(p) => p.list_accounts(token).await,
            ProviderClient::Mock(p) => p.list_accounts(token).await,
        }
    }

    async fn list_transactions(
        &self,
        token: &AccessToken,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ProviderTransaction>> {
        match self {
            ProviderClient::Plaid(p) => p.list_transactions(token, start, end).await,
            ProviderClient::Mock(p) => p.list_transactions(token, start, end).await,
        }
    }

    async fn institution_name(&self, token: &AccessToken, institution_id: &str) -> Result<String> {
        match self {
            ProviderClient::Plaid(p) => p.institution_name(token, institution_id).await,
            ProviderClient::Mock(p) => p.institution_name(token, institution_id).await,
        }
    }

    async fn exchange_public_token(&self, public_token: &str) -> Result<AccessToken> {
        match self {
            ProviderClient::Plaid(p) => p.exchange_public_token(public_token).await,
            ProviderClient::Mock(p) => p.exchange_public_token(public_token).await,
        }
    }

    fn name(&self) -> &str {
        match self {
            ProviderClient::Plaid(p) => p.name(),
            ProviderClient::Mock(p) => p.name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unconfigured_plaid_uses_sample_provider() {
        let client = ProviderClient::from_config(&PlaidConfig::default(), &IngestConfig::default());
        assert!(matches!(client, ProviderClient::Mock(_)));
        assert_eq!(client.name(), "mock");
    }

    #[test]
    fn test_configured_plaid() {
        let plaid = PlaidConfig {
            client_id: Some("id".into()),
            secret: Some("secret".into()),
            ..Default::default()
        };
        let client = ProviderClient::from_config(&plaid, &IngestConfig::default());
        assert!(matches!(client, ProviderClient::Plaid(_)));
        assert_eq!(client.name(), "plaid");
    }
}
