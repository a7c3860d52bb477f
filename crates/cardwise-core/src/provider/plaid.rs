//! Plaid REST client
//!
//! Every request is a JSON POST carrying `client_id` and `secret` in the
//! body. Error responses carry `error_code` / `error_message`.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::PlaidConfig;
use crate::credentials::AccessToken;
use crate::error::{Error, Result};
use crate::models::Account;

use super::{AccountProvider, ProviderTransaction};

/// Safety bound on pagination
const MAX_PAGES: u32 = 50;

#[derive(Clone)]
pub struct PlaidProvider {
    http_client: Client,
    base_url: String,
    client_id: Option<String>,
    secret: Option<String>,
    page_size: u32,
}

impl PlaidProvider {
    pub fn new(config: &PlaidConfig, page_size: u32) -> Self {
        Self {
            http_client: Client::new(),
            base_url: config.environment.base_url().to_string(),
            client_id: config.client_id.clone(),
            secret: config.secret.clone(),
            page_size: page_size.max(1),
        }
    }

    /// Point at a different host (used against the mock server in tests)
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    async fn post<B, R>(&self, path: &str, body: B) -> Result<R>
    where
        B: Serialize + Send,
        R: DeserializeOwned,
    {
        let (client_id, secret) = match (&self.client_id, &self.secret) {
            (Some(id), Some(secret)) => (id.as_str(), secret.as_str()),
            _ => {
                return Err(Error::Provider(
                    "PLAID_CLIENT_ID and PLAID_SECRET must be configured".into(),
                ))
            }
        };

        let response = self
            .http_client
            .post(format!("{}{}", self.base_url, path))
            .json(&Authenticated {
                client_id,
                secret,
                body,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = match response.json::<PlaidErrorBody>().await {
                Ok(err) => format!("{}: {}", err.error_code, err.error_message),
                Err(_) => status.to_string(),
            };
            return Err(Error::Provider(format!("{} failed ({})", path, detail)));
        }

        Ok(response.json().await?)
    }
}

#[derive(Serialize)]
struct Authenticated<'a, B> {
    client_id: &'a str,
    secret: &'a str,
    #[serde(flatten)]
    body: B,
}

#[derive(Debug, Deserialize)]
struct PlaidErrorBody {
    error_code: String,
    error_message: String,
}

#[derive(Serialize)]
struct AccessTokenBody<'a> {
    access_token: &'a str,
}

#[derive(Debug, Deserialize)]
struct AccountsResponse {
    accounts: Vec<PlaidAccount>,
    item: PlaidItem,
}

#[derive(Debug, Deserialize)]
struct PlaidItem {
    institution_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlaidAccount {
    account_id: String,
    name: String,
    official_name: Option<String>,
    #[serde(rename = "type")]
    account_type: String,
    subtype: Option<String>,
    mask: Option<String>,
}

#[derive(Serialize)]
struct TransactionsBody<'a> {
    access_token: &'a str,
    start_date: NaiveDate,
    end_date: NaiveDate,
    options: TransactionsOptions,
}

#[derive(Serialize)]
struct TransactionsOptions {
    count: u32,
    offset: u32,
}

#[derive(Debug, Deserialize)]
struct TransactionsResponse {
    transactions: Vec<PlaidTransaction>,
    total_transactions: u32,
}

#[derive(Debug, Deserialize)]
struct PlaidTransaction {
    account_id: String,
    date: NaiveDate,
    name: Option<String>,
    merchant_name: Option<String>,
    amount: f64,
    personal_finance_category: Option<PersonalFinanceCategory>,
    #[serde(default)]
    category: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct PersonalFinanceCategory {
    primary: String,
}

impl From<PlaidTransaction> for ProviderTransaction {
    fn from(tx: PlaidTransaction) -> Self {
        let raw_category = tx
            .personal_finance_category
            .map(|c| c.primary)
            .filter(|c| !c.trim().is_empty())
            .or_else(|| tx.category.and_then(|c| c.into_iter().next()))
            .filter(|c| !c.trim().is_empty());
        Self {
            account_id: tx.account_id,
            date: tx.date,
            merchant: tx.merchant_name.or(tx.name).unwrap_or_default(),
            amount: tx.amount,
            raw_category,
        }
    }
}

#[derive(Serialize)]
struct InstitutionBody<'a> {
    institution_id: &'a str,
    country_codes: [&'a str; 1],
}

#[derive(Debug, Deserialize)]
struct InstitutionResponse {
    institution: Institution,
}

#[derive(Debug, Deserialize)]
struct Institution {
    name: String,
}

#[derive(Serialize)]
struct ExchangeBody<'a> {
    public_token: &'a str,
}

#[derive(Debug, Deserialize)]
struct ExchangeResponse {
    access_token: String,
}

#[async_trait]
impl AccountProvider for PlaidProvider {
    async fn list_accounts(&self, token: &AccessToken) -> Result<Vec<Account>> {
        let response: AccountsResponse = self
            .post(
                "/accounts/get",
                AccessTokenBody {
                    access_token: token.expose(),
                },
            )
            .await?;

        let institution_id = response.item.institution_id;
        Ok(response
            .accounts
            .into_iter()
            .map(|a| Account {
                id: a.account_id,
                name: a.official_name.unwrap_or(a.name),
                account_type: a.account_type,
                subtype: a.subtype,
                mask: a.mask,
                institution_id: institution_id.clone(),
            })
            .collect())
    }

    async fn list_transactions(
        &self,
        token: &AccessToken,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ProviderTransaction>> {
        let mut transactions = Vec::new();
        let mut offset = 0;

        for _ in 0..MAX_PAGES {
            let page: TransactionsResponse = self
                .post(
                    "/transactions/get",
                    TransactionsBody {
                        access_token: token.expose(),
                        start_date: start,
                        end_date: end,
                        options: TransactionsOptions {
                            count: self.page_size,
                            offset,
                        },
                    },
                )
                .await?;

            let fetched = page.transactions.len() as u32;
            transactions.extend(page.transactions.into_iter().map(ProviderTransaction::from));
            offset += fetched;

            debug!(
                credential = %token.fingerprint(),
                fetched = offset,
                total = page.total_transactions,
                "Fetched transaction page"
            );

            if fetched == 0 || offset >= page.total_transactions {
                break;
            }
        }

        Ok(transactions)
    }

    async fn institution_name(&self, _token: &AccessToken, institution_id: &str) -> Result<String> {
        let response: InstitutionResponse = self
            .post(
                "/institutions/get_by_id",
                InstitutionBody {
                    institution_id,
                    country_codes: ["US"],
                },
            )
            .await?;
        Ok(response.institution.name)
    }

    async fn exchange_public_token(&self, public_token: &str) -> Result<AccessToken> {
        let response: ExchangeResponse = self
            .post("/item/public_token/exchange", ExchangeBody { public_token })
            .await?;
        Ok(AccessToken::new(response.access_token))
    }

    fn name(&self) -> &str {
        "plaid"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{MockPlaidServer, MOCK_ACCESS_TOKEN};

    fn provider(server: &MockPlaidServer, page_size: u32) -> PlaidProvider {
        let config = PlaidConfig {
            client_id: Some("client".into()),
            secret: Some("secret".into()),
            ..Default::default()
        };
        PlaidProvider::new(&config, page_size).with_base_url(&server.url())
    }

    fn window() -> (NaiveDate, NaiveDate) {
        (
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
        )
    }

    #[test]
    fn test_transaction_mapping_prefers_merchant_and_primary_category() {
        let tx: PlaidTransaction = serde_json::from_str(
            r#"{"account_id": "a", "date": "2025-02-01", "name": "UBER *TRIP",
                "merchant_name": "Uber", "amount": 12.0,
                "personal_finance_category": {"primary": "TRANSPORTATION"},
                "category": ["Travel", "Taxi"]}"#,
        )
        .unwrap();
        let tx = ProviderTransaction::from(tx);
        assert_eq!(tx.merchant, "Uber");
        assert_eq!(tx.raw_category.as_deref(), Some("TRANSPORTATION"));
    }

    #[test]
    fn test_transaction_mapping_falls_back_to_legacy_category() {
        let tx: PlaidTransaction = serde_json::from_str(
            r#"{"account_id": "a", "date": "2025-02-01", "name": "Corner Shop",
                "amount": 5.0, "personal_finance_category": null,
                "category": ["Shops", "Convenience"]}"#,
        )
        .unwrap();
        let tx = ProviderTransaction::from(tx);
        assert_eq!(tx.merchant, "Corner Shop");
        assert_eq!(tx.raw_category.as_deref(), Some("Shops"));
    }

    #[test]
    fn test_empty_primary_category_uses_legacy_category() {
        let tx: PlaidTransaction = serde_json::from_str(
            r#"{"account_id": "a", "date": "2025-02-01", "name": "Shell",
                "amount": 40.0, "personal_finance_category": {"primary": ""},
                "category": ["Travel", "Gas Stations"]}"#,
        )
        .unwrap();
        let tx = ProviderTransaction::from(tx);
        assert_eq!(tx.raw_category.as_deref(), Some("Travel"));
    }

    #[tokio::test]
    async fn test_missing_credentials() {
        let provider = PlaidProvider::new(&PlaidConfig::default(), 500);
        let result = provider.list_accounts(&AccessToken::new("x")).await;
        assert!(matches!(result, Err(Error::Provider(_))));
    }

    #[tokio::test]
    async fn test_accounts_against_mock_server() {
        let server = MockPlaidServer::start().await;
        let accounts = provider(&server, 500)
            .list_accounts(&AccessToken::new(MOCK_ACCESS_TOKEN))
            .await
            .unwrap();

        assert!(accounts.iter().any(|a| a.is_credit()));
        assert!(accounts.iter().all(|a| a.institution_id.is_some()));
    }

    #[tokio::test]
    async fn test_transactions_paginate() {
        let server = MockPlaidServer::start().await;
        let (start, end) = window();

        let all = provider(&server, 500)
            .list_transactions(&AccessToken::new(MOCK_ACCESS_TOKEN), start, end)
            .await
            .unwrap();
        let paged = provider(&server, 2)
            .list_transactions(&AccessToken::new(MOCK_ACCESS_TOKEN), start, end)
            .await
            .unwrap();

        assert!(all.len() > 2);
        assert_eq!(all, paged);
    }

    #[tokio::test]
    async fn test_unknown_token_is_provider_error() {
        let server = MockPlaidServer::start().await;
        let result = provider(&server, 500)
            .list_accounts(&AccessToken::new("bogus"))
            .await;
        assert!(matches!(result, Err(Error::Provider(msg)) if msg.contains("INVALID_ACCESS_TOKEN")));
    }

    #[tokio::test]
    async fn test_institution_and_exchange() {
        let server = MockPlaidServer::start().await;
        let provider = provider(&server, 500);
        let token = AccessToken::new(MOCK_ACCESS_TOKEN);

        assert_eq!(
            provider.institution_name(&token, "ins_1").await.unwrap(),
            "Chase"
        );
        let exchanged = provider
            .exchange_public_token("public-sandbox-abc")
            .await
            .unwrap();
        assert_eq!(exchanged.expose(), MOCK_ACCESS_TOKEN);
    }
}
