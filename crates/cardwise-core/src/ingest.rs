//! Ingestion gateway
//!
//! Pulls transactions for every stored credential and merges them into one
//! list, newest first. Each credential is fetched independently; a failure
//! for one is logged and skipped so the others still contribute.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate, Utc};
use tracing::{debug, info, warn};

use crate::classify::classify;
use crate::config::{IngestConfig, MAX_LOOKBACK_DAYS};
use crate::credentials::AccessToken;
use crate::error::Result;
use crate::models::Transaction;
use crate::provider::AccountProvider;

/// Only the first few credit accounts per item are analyzed
pub const MAX_ACCOUNTS_PER_CREDENTIAL: usize = 3;

pub struct IngestionGateway<'a, P: AccountProvider + ?Sized> {
    provider: &'a P,
    lookback_days: i64,
}

impl<'a, P: AccountProvider + ?Sized> IngestionGateway<'a, P> {
    pub fn new(provider: &'a P, config: &IngestConfig) -> Self {
        Self {
            provider,
            lookback_days: config.lookback_days.clamp(1, MAX_LOOKBACK_DAYS),
        }
    }

    /// Fetch everything in the configured lookback window ending today
    pub async fn fetch_all(&self, credentials: &[AccessToken]) -> Vec<Transaction> {
        let end = Utc::now().date_naive();
        let start = end - Duration::days(self.lookback_days);
        self.fetch_window(credentials, start, end).await
    }

    pub async fn fetch_window(
        &self,
        credentials: &[AccessToken],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Vec<Transaction> {
        let mut merged = Vec::new();

        for token in credentials {
            match self.fetch_credential(token, start, end).await {
                Ok(txs) => {
                    debug!(
                        credential = %token.fingerprint(),
                        count = txs.len(),
                        "Fetched transactions"
                    );
                    merged.extend(txs);
                }
                Err(e) => {
                    warn!(
                        credential = %token.fingerprint(),
                        provider = self.provider.name(),
                        error = %e,
                        "Skipping credential"
                    );
                }
            }
        }

        // Stable, so same-day transactions keep provider order
        merged.sort_by(|a, b| b.date.cmp(&a.date));

        info!(
            credentials = credentials.len(),
            transactions = merged.len(),
            "Ingestion complete"
        );
        merged
    }

    async fn fetch_credential(
        &self,
        token: &AccessToken,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Transaction>> {
        let accounts: Vec<_> = self
            .provider
            .list_accounts(token)
            .await?
            .into_iter()
            .filter(|a| a.is_credit())
            .take(MAX_ACCOUNTS_PER_CREDENTIAL)
            .collect();

        if accounts.is_empty() {
            return Ok(Vec::new());
        }

        let institution = match accounts.iter().find_map(|a| a.institution_id.as_deref()) {
            Some(id) => match self.provider.institution_name(token, id).await {
                Ok(name) => name,
                Err(e) => {
                    warn!(
                        credential = %token.fingerprint(),
                        institution_id = id,
                        error = %e,
                        "Institution lookup failed"
                    );
                    String::new()
                }
            },
            None => String::new(),
        };

        let labels: HashMap<&str, String> = accounts
            .iter()
            .map(|a| (a.id.as_str(), a.display_label(&institution)))
            .collect();

        let transactions = self.provider.list_transactions(token, start, end).await?;

        Ok(transactions
            .into_iter()
            .filter_map(|tx| {
                let label = labels.get(tx.account_id.as_str())?;
                let category = classify(tx.raw_category.as_deref(), &tx.merchant);
                Some(Transaction {
                    date: tx.date,
                    merchant: tx.merchant,
                    amount: tx.amount,
                    raw_category: tx.raw_category,
                    category: Some(category),
                    account_label: label.clone(),
                })
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Account, CategoryKey};
    use crate::provider::{MockItem, MockProvider, ProviderTransaction};

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    fn account(id: &str, account_type: &str) -> Account {
        Account {
            id: id.to_string(),
            name: format!("Card {}", id),
            account_type: account_type.to_string(),
            subtype: None,
            mask: Some(format!("{:0>4}", id.len())),
            institution_id: Some("ins_1".to_string()),
        }
    }

    fn ptx(account_id: &str, day: u32, merchant: &str, amount: f64) -> ProviderTransaction {
        ProviderTransaction {
            account_id: account_id.to_string(),
            date: date(day),
            merchant: merchant.to_string(),
            amount,
            raw_category: None,
        }
    }

    fn item(prefix: &str, days: &[u32]) -> MockItem {
        let card = format!("{}-card", prefix);
        MockItem {
            institution: Some(format!("{} Bank", prefix)),
            accounts: vec![account(&card, "credit")],
            transactions: days
                .iter()
                .map(|d| ptx(&card, *d, "Uber", 10.0))
                .collect(),
        }
    }

    async fn fetch(provider: &MockProvider, tokens: &[&str]) -> Vec<Transaction> {
        let tokens: Vec<_> = tokens.iter().map(|t| AccessToken::new(*t)).collect();
        IngestionGateway::new(provider, &IngestConfig::default())
            .fetch_window(&tokens, date(1), date(31))
            .await
    }

    #[tokio::test]
    async fn test_merges_and_sorts_descending() {
        let provider = MockProvider::new()
            .with_item("a", item("A", &[3, 10, 7]))
            .with_item("b", item("B", &[5, 1]));

        let txs = fetch(&provider, &["a", "b"]).await;
        assert_eq!(txs.len(), 5);
        let days: Vec<_> = txs.iter().map(|t| t.date).collect();
        assert_eq!(days, vec![date(10), date(7), date(5), date(3), date(1)]);
    }

    #[tokio::test]
    async fn test_failed_credential_is_skipped() {
        let provider = MockProvider::new()
            .with_item("a", item("A", &[3, 4]))
            .with_item("b", item("B", &[5]))
            .with_item("c", item("C", &[6]))
            .failing_accounts("b")
            .failing_transactions("c");

        let txs = fetch(&provider, &["a", "b", "c", "missing"]).await;
        assert_eq!(txs.len(), 2);
        assert!(txs.iter().all(|t| t.account_label.starts_with("A Bank")));
    }

    #[tokio::test]
    async fn test_only_first_three_credit_accounts() {
        let accounts = vec![
            account("chk", "depository"),
            account("c1", "credit"),
            account("c2", "credit"),
            account("c3", "credit"),
            account("c4", "credit"),
        ];
        let transactions = ["chk", "c1", "c2", "c3", "c4"]
            .iter()
            .map(|id| ptx(id, 2, "Store", 5.0))
            .collect();
        let provider = MockProvider::new().with_item(
            "t",
            MockItem {
                institution: Some("Chase".into()),
                accounts,
                transactions,
            },
        );

        let txs = fetch(&provider, &["t"]).await;
        let labels: Vec<_> = txs.iter().map(|t| t.account_label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Chase – Card c1 (0002)",
                "Chase – Card c2 (0002)",
                "Chase – Card c3 (0002)",
            ]
        );
    }

    #[tokio::test]
    async fn test_institution_failure_drops_prefix() {
        let provider = MockProvider::new()
            .with_item("a", item("A", &[3]))
            .failing_institutions();

        let txs = fetch(&provider, &["a"]).await;
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].account_label, "Card A-card (0006)");
    }

    #[tokio::test]
    async fn test_transactions_are_classified() {
        let provider = MockProvider::new().with_item("a", item("A", &[3]));
        let txs = fetch(&provider, &["a"]).await;
        let category = txs[0].category.as_ref().unwrap();
        assert_eq!(category.key, CategoryKey::Travel);
    }

    #[tokio::test]
    async fn test_no_credentials() {
        let provider = MockProvider::new();
        assert!(fetch(&provider, &[]).await.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_all_uses_lookback_window() {
        let provider = MockProvider::sample();
        let token = AccessToken::new(crate::provider::SAMPLE_ACCESS_TOKEN);

        let narrow = IngestConfig {
            lookback_days: 3,
            ..Default::default()
        };
        let txs = IngestionGateway::new(&provider, &narrow)
            .fetch_all(std::slice::from_ref(&token))
            .await;
        assert_eq!(txs.len(), 1);

        let txs = IngestionGateway::new(&provider, &IngestConfig::default())
            .fetch_all(&[token])
            .await;
        assert_eq!(txs.len(), 6);
    }

    #[tokio::test]
    async fn test_out_of_range_lookback_is_clamped() {
        let provider = MockProvider::sample();
        let token = AccessToken::new(crate::provider::SAMPLE_ACCESS_TOKEN);

        let huge = IngestConfig {
            lookback_days: 100_000_000,
            ..Default::default()
        };
        let gateway = IngestionGateway::new(&provider, &huge);
        assert!(gateway.fetch_all(&[]).await.is_empty());
        assert_eq!(gateway.fetch_all(std::slice::from_ref(&token)).await.len(), 6);

        let negative = IngestConfig {
            lookback_days: -30,
            ..Default::default()
        };
        let txs = IngestionGateway::new(&provider, &negative)
            .fetch_all(&[token])
            .await;
        assert!(txs.is_empty());
    }
}
