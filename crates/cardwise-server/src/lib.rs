//! Cardwise Web Server
//!
//! Axum-based REST API over the Cardwise pipeline:
//! - Spending analysis with generated advice (`/api/analyze`)
//! - Payoff simulation (`/api/simulate`)
//! - Linked-account ingestion and credential linking
//! - Risk scoring and one-off category classification

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use cardwise_core::{
    AccessToken, AccountProvider, Config, CredentialStore, GeneratorClient, InMemoryCredentialStore,
    ProviderClient, RewardTable, TextGenerator,
};

mod handlers;

/// Maximum request body size (5 MB)
pub const MAX_BODY_SIZE: usize = 5 * 1024 * 1024;

/// Maximum number of cards accepted on one request
pub const MAX_CARDS: usize = 50;

/// Server configuration
#[derive(Clone, Default)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
}

/// Shared application state
pub struct AppState {
    pub config: Config,
    pub generator: GeneratorClient,
    pub provider: ProviderClient,
    /// Access tokens for every linked item; appended by `/api/link/exchange`
    pub credentials: Box<dyn CredentialStore>,
    pub rewards: RewardTable,
}

impl AppState {
    /// Build backends from configuration, seeding any pre-linked credentials
    pub fn from_config(config: Config) -> Self {
        let generator = GeneratorClient::from_config(&config.generator);
        let provider = ProviderClient::from_config(&config.plaid, &config.ingest);
        let credentials = InMemoryCredentialStore::with_tokens(
            config.access_tokens.iter().map(AccessToken::new),
        );

        Self {
            generator,
            provider,
            credentials: Box::new(credentials),
            rewards: RewardTable::default(),
            config,
        }
    }
}

/// Create the application router
pub fn create_router(state: AppState, config: ServerConfig) -> Router {
    let state = Arc::new(state);

    let api_routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/analyze", post(handlers::analyze))
        .route("/simulate", post(handlers::simulate))
        .route("/transactions", get(handlers::list_transactions))
        .route("/link/exchange", post(handlers::exchange_public_token))
        .route("/risk", post(handlers::assess))
        .route("/classify", post(handlers::classify_category));

    let cors = if config.allowed_origins.is_empty() {
        CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
    };

    Router::new()
        .nest("/api", api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Start the server
pub async fn serve(config: Config, host: &str, port: u16) -> anyhow::Result<()> {
    serve_with_config(config, host, port, ServerConfig::default()).await
}

/// Start the server with custom configuration
pub async fn serve_with_config(
    config: Config,
    host: &str,
    port: u16,
    server_config: ServerConfig,
) -> anyhow::Result<()> {
    let state = AppState::from_config(config);

    match state.credentials.credentials() {
        Ok(tokens) if tokens.is_empty() => {
            warn!("No linked accounts yet; POST /api/link/exchange to add one");
        }
        Ok(tokens) => info!("{} linked credential(s) loaded", tokens.len()),
        Err(e) => warn!("Failed to read credential store: {}", e),
    }
    info!(
        "Account data: {}, text generator: {}",
        state.provider.name(),
        state.generator.model()
    );

    let app = create_router(state, server_config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
    /// Extra top-level fields merged into the JSON body
    details: Option<Value>,
    internal: Option<anyhow::Error>,
}

impl AppError {
    fn with_status(status: StatusCode, msg: &str) -> Self {
        Self {
            status,
            message: msg.to_string(),
            details: None,
            internal: None,
        }
    }

    pub fn bad_request(msg: &str) -> Self {
        Self::with_status(StatusCode::BAD_REQUEST, msg)
    }

    pub fn bad_gateway(msg: &str) -> Self {
        Self::with_status(StatusCode::BAD_GATEWAY, msg)
    }

    pub fn unprocessable(msg: &str) -> Self {
        Self::with_status(StatusCode::UNPROCESSABLE_ENTITY, msg)
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Map a core error: bad input is the caller's fault, the rest is ours
    pub fn from_core(err: cardwise_core::Error) -> Self {
        match err {
            err @ cardwise_core::Error::Validation(_) => Self::bad_request(&err.to_string()),
            other => other.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let mut body = serde_json::json!({
            "error": self.message
        });
        if let (Some(Value::Object(extra)), Some(obj)) = (self.details, body.as_object_mut()) {
            obj.extend(extra);
        }

        (self.status, Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            details: None,
            // Keep full error for logging
            internal: Some(err),
        }
    }
}
