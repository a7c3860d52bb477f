//! Test utilities for cardwise-core
//!
//! Mock HTTP servers standing in for the hosted text-generation endpoint and
//! the Plaid API, for backend and integration tests.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Json, State},
    http::{HeaderMap, StatusCode},
    routing::post,
    Router,
};
use serde_json::{json, Value};
use tokio::sync::oneshot;

/// Bearer key the mock inference server accepts
pub const MOCK_API_KEY: &str = "hf_test";

/// Access token the mock Plaid server recognizes
pub const MOCK_ACCESS_TOKEN: &str = "access-sandbox-mock";

/// A well-formed advice reply
pub const ADVICE_REPLY: &str = r#"Here you go:
{"spending_insights": ["Dining is your largest category.", "Fuel is your smallest."],
 "smart_card_usage_advice": "Use Regions for dining.",
 "reward_optimization_tips": ["Pay in full each month."]}"#;

/// Handle to a server running on a background task
struct RunningServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl RunningServer {
    async fn start(app: Router) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for RunningServer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Mock Hugging Face inference endpoint
pub struct MockInferenceServer {
    server: RunningServer,
}

impl MockInferenceServer {
    /// Start a server that returns [`ADVICE_REPLY`]
    pub async fn start() -> Self {
        Self::start_with_reply(ADVICE_REPLY).await
    }

    /// Start a server that returns `reply` as the generated text
    pub async fn start_with_reply(reply: &str) -> Self {
        let app = Router::new()
            .route("/models/*model", post(handle_generate))
            .with_state(Arc::new(reply.to_string()));

        Self {
            server: RunningServer::start(app).await,
        }
    }

    /// Full model URL to hand to the backend
    pub fn model_url(&self) -> String {
        format!("{}/models/mock/zephyr", self.server.url())
    }
}

async fn handle_generate(
    State(reply): State<Arc<String>>,
    headers: HeaderMap,
    Json(request): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {}", MOCK_API_KEY));
    if !authorized {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "Invalid credentials in Authorization header"})),
        );
    }

    if request["inputs"].as_str().is_none()
        || request["parameters"]["return_full_text"] != Value::Bool(false)
    {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "malformed request"})),
        );
    }

    (
        StatusCode::OK,
        Json(json!([{ "generated_text": reply.as_str() }])),
    )
}

/// Mock Plaid API with one item: a Chase credit card and a checking account
pub struct MockPlaidServer {
    server: RunningServer,
}

impl MockPlaidServer {
    pub async fn start() -> Self {
        let app = Router::new()
            .route("/accounts/get", post(handle_accounts))
            .route("/transactions/get", post(handle_transactions))
            .route("/institutions/get_by_id", post(handle_institution))
            .route("/item/public_token/exchange", post(handle_exchange));

        Self {
            server: RunningServer::start(app).await,
        }
    }

    pub fn url(&self) -> String {
        self.server.url()
    }
}

type PlaidReply = std::result::Result<Json<Value>, (StatusCode, Json<Value>)>;

fn check_request(request: &Value, needs_token: bool) -> std::result::Result<(), (StatusCode, Json<Value>)> {
    let plaid_error = |code: &str, message: &str| {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({"error_code": code, "error_message": message})),
        )
    };

    if request["client_id"].as_str().is_none() || request["secret"].as_str().is_none() {
        return Err(plaid_error("INVALID_API_KEYS", "missing client_id or secret"));
    }
    if needs_token && request["access_token"].as_str() != Some(MOCK_ACCESS_TOKEN) {
        return Err(plaid_error(
            "INVALID_ACCESS_TOKEN",
            "provided access token is in an invalid format",
        ));
    }
    Ok(())
}

async fn handle_accounts(Json(request): Json<Value>) -> PlaidReply {
    check_request(&request, true)?;
    Ok(Json(json!({
        "accounts": [
            {
                "account_id": "acc-credit",
                "name": "Credit Card",
                "official_name": "Sapphire Preferred",
                "type": "credit",
                "subtype": "credit card",
                "mask": "3333"
            },
            {
                "account_id": "acc-checking",
                "name": "Checking",
                "official_name": null,
                "type": "depository",
                "subtype": "checking",
                "mask": "0000"
            }
        ],
        "item": { "institution_id": "ins_1" }
    })))
}

fn mock_transactions() -> Vec<Value> {
    vec![
        json!({"account_id": "acc-credit", "date": "2025-03-10", "name": "STARBUCKS 123",
               "merchant_name": "Starbucks", "amount": 6.45,
               "personal_finance_category": {"primary": "FOOD_AND_DRINK"}}),
        json!({"account_id": "acc-credit", "date": "2025-03-08", "name": "UNITED AIRLINES",
               "merchant_name": "United Airlines", "amount": 500.0,
               "personal_finance_category": {"primary": "TRAVEL"}}),
        json!({"account_id": "acc-checking", "date": "2025-03-07", "name": "PAYROLL",
               "merchant_name": null, "amount": -2500.0,
               "personal_finance_category": {"primary": "INCOME"}}),
        json!({"account_id": "acc-credit", "date": "2025-03-05", "name": "SHELL OIL 5742",
               "merchant_name": "Shell", "amount": 40.0,
               "personal_finance_category": null, "category": ["Travel", "Gas Stations"]}),
        json!({"account_id": "acc-credit", "date": "2025-03-01", "name": "AMAZON MKTPL",
               "merchant_name": "Amazon", "amount": 89.99,
               "personal_finance_category": {"primary": "GENERAL_MERCHANDISE"}}),
    ]
}

async fn handle_transactions(Json(request): Json<Value>) -> PlaidReply {
    check_request(&request, true)?;

    let all = mock_transactions();
    let count = request["options"]["count"].as_u64().unwrap_or(100) as usize;
    let offset = request["options"]["offset"].as_u64().unwrap_or(0) as usize;
    let page: Vec<Value> = all.iter().skip(offset).take(count).cloned().collect();

    Ok(Json(json!({
        "transactions": page,
        "total_transactions": all.len(),
    })))
}

async fn handle_institution(Json(request): Json<Value>) -> PlaidReply {
    check_request(&request, false)?;
    Ok(Json(json!({
        "institution": {
            "institution_id": request["institution_id"],
            "name": "Chase"
        }
    })))
}

async fn handle_exchange(Json(request): Json<Value>) -> PlaidReply {
    check_request(&request, false)?;
    Ok(Json(json!({
        "access_token": MOCK_ACCESS_TOKEN,
        "item_id": "item-mock"
    })))
}
