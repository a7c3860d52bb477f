//! Account linking handler

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use cardwise_core::AccountProvider;

use super::require_json;
use crate::{AppError, AppState};

#[derive(Debug, Deserialize)]
pub struct ExchangeRequest {
    #[serde(alias = "publicToken")]
    pub public_token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeResponse {
    pub linked: bool,
    /// Fingerprint of the stored access token; the token itself is never returned
    pub credential: String,
    pub linked_credentials: usize,
}

/// POST /api/link/exchange - Trade a link-flow public token for a stored credential
pub async fn exchange_public_token(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<ExchangeResponse>, AppError> {
    let req: ExchangeRequest = require_json(request).await?;
    if req.public_token.trim().is_empty() {
        return Err(AppError::bad_request("public_token is required"));
    }

    let token = state
        .provider
        .exchange_public_token(req.public_token.trim())
        .await
        .map_err(|e| {
            warn!(provider = state.provider.name(), error = %e, "Token exchange failed");
            AppError::bad_gateway("Token exchange failed")
        })?;

    let credential = token.fingerprint();
    state.credentials.add(token)?;
    let linked_credentials = state.credentials.credentials()?.len();

    Ok(Json(ExchangeResponse {
        linked: true,
        credential,
        linked_credentials,
    }))
}
