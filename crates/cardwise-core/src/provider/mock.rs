//! In-memory account provider
//!
//! Serves canned items keyed by access token. Individual tokens can be made
//! to fail so tests can exercise per-credential isolation.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};

use crate::credentials::AccessToken;
use crate::error::{Error, Result};
use crate::models::Account;

use super::{AccountProvider, ProviderTransaction};

/// Access token served by [`MockProvider::sample`]
pub const SAMPLE_ACCESS_TOKEN: &str = "access-sample-0001";

/// One linked item
#[derive(Debug, Clone, Default)]
pub struct MockItem {
    pub institution: Option<String>,
    pub accounts: Vec<Account>,
    pub transactions: Vec<ProviderTransaction>,
}

#[derive(Clone, Default)]
pub struct MockProvider {
    items: HashMap<String, MockItem>,
    failing_accounts: HashSet<String>,
    failing_transactions: HashSet<String>,
    failing_institutions: bool,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(mut self, token: &str, item: MockItem) -> Self {
        self.items.insert(token.to_string(), item);
        self
    }

    /// Make `list_accounts` fail for a token
    pub fn failing_accounts(mut self, token: &str) -> Self {
        self.failing_accounts.insert(token.to_string());
        self
    }

    /// Make `list_transactions` fail for a token
    pub fn failing_transactions(mut self, token: &str) -> Self {
        self.failing_transactions.insert(token.to_string());
        self
    }

    /// Make every institution lookup fail
    pub fn failing_institutions(mut self) -> Self {
        self.failing_institutions = true;
        self
    }

    /// One credit card with a handful of recent purchases, for offline use
    pub fn sample() -> Self {
        let today = Utc::now().date_naive();
        let day = |n: i64| today - Duration::days(n);
        let tx = |days_ago, merchant: &str, amount, raw: &str| ProviderTransaction {
            account_id: "sample-credit".to_string(),
            date: day(days_ago),
            merchant: merchant.to_string(),
            amount,
            raw_category: Some(raw.to_string()),
        };

        Self::new().with_item(
            SAMPLE_ACCESS_TOKEN,
            MockItem {
                institution: Some("Sample Bank".to_string()),
                accounts: vec![
                    Account {
                        id: "sample-credit".to_string(),
                        name: "Rewards Card".to_string(),
                        account_type: "credit".to_string(),
                        subtype: Some("credit card".to_string()),
                        mask: Some("4242".to_string()),
                        institution_id: Some("ins_sample".to_string()),
                    },
                    Account {
                        id: "sample-checking".to_string(),
                        name: "Checking".to_string(),
                        account_type: "depository".to_string(),
                        subtype: Some("checking".to_string()),
                        mask: Some("0000".to_string()),
                        institution_id: Some("ins_sample".to_string()),
                    },
                ],
                transactions: vec![
                    tx(2, "Blue Bottle Cafe", 18.5, "FOOD_AND_DRINK"),
                    tx(5, "Uber", 32.0, "TRANSPORTATION"),
                    tx(9, "Amazon", 120.0, "GENERAL_MERCHANDISE"),
                    tx(12, "Shell", 45.0, "GAS"),
                    tx(15, "Payment Thank You", -300.0, "LOAN_PAYMENTS"),
                    tx(20, "Whole Foods Supermarket", 86.2, "GROCERIES"),
                ],
            },
        )
    }

    fn item(&self, token: &AccessToken) -> Result<&MockItem> {
        self.items
            .get(token.expose())
            .ok_or_else(|| Error::Provider(format!("unknown item {}", token.fingerprint())))
    }
}

#[async_trait]
impl AccountProvider for MockProvider {
    async fn list_accounts(&self, token: &AccessToken) -> Result<Vec<Account>> {
        if self.failing_accounts.contains(token.expose()) {
            return Err(Error::Provider("mock accounts failure".into()));
        }
        Ok(self.item(token)?.accounts.clone())
    }

    async fn list_transactions(
        &self,
        token: &AccessToken,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ProviderTransaction>> {
        if self.failing_transactions.contains(token.expose()) {
            return Err(Error::Provider("mock transactions failure".into()));
        }
        Ok(self
            .item(token)?
            .transactions
            .iter()
            .filter(|tx| tx.date >= start && tx.date <= end)
            .cloned()
            .collect())
    }

    async fn institution_name(&self, token: &AccessToken, _institution_id: &str) -> Result<String> {
        if self.failing_institutions {
            return Err(Error::Provider("mock institution failure".into()));
        }
        self.item(token)?
            .institution
            .clone()
            .ok_or_else(|| Error::Provider("institution not found".into()))
    }

    async fn exchange_public_token(&self, public_token: &str) -> Result<AccessToken> {
        if public_token.trim().is_empty() {
            return Err(Error::Provider("public token is empty".into()));
        }
        Ok(AccessToken::new(format!("access-mock-{}", public_token)))
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sample_item() {
        let provider = MockProvider::sample();
        let token = AccessToken::new(SAMPLE_ACCESS_TOKEN);

        let accounts = provider.list_accounts(&token).await.unwrap();
        assert_eq!(accounts.len(), 2);

        let today = Utc::now().date_naive();
        let txs = provider
            .list_transactions(&token, today - Duration::days(30), today)
            .await
            .unwrap();
        assert_eq!(txs.len(), 6);

        let recent = provider
            .list_transactions(&token, today - Duration::days(3), today)
            .await
            .unwrap();
        assert_eq!(recent.len(), 1);
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let provider = MockProvider::sample().failing_transactions(SAMPLE_ACCESS_TOKEN);
        let token = AccessToken::new(SAMPLE_ACCESS_TOKEN);

        assert!(provider.list_accounts(&token).await.is_ok());
        let today = Utc::now().date_naive();
        assert!(provider.list_transactions(&token, today, today).await.is_err());
    }

    #[tokio::test]
    async fn test_unknown_token() {
        let provider = MockProvider::new();
        assert!(provider.list_accounts(&AccessToken::new("nope")).await.is_err());
    }

    #[tokio::test]
    async fn test_exchange() {
        let provider = MockProvider::new();
        let token = provider.exchange_public_token("public-1").await.unwrap();
        assert_eq!(token.expose(), "access-mock-public-1");
        assert!(provider.exchange_public_token(" ").await.is_err());
    }
}
