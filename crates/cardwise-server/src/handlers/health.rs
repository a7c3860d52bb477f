//! Health check handler

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use cardwise_core::{AccountProvider, TextGenerator};

use crate::{AppError, AppState};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub provider: String,
    pub generator: String,
    pub linked_credentials: usize,
}

/// GET /api/health - Backend names and linked credential count
pub async fn health(State(state): State<Arc<AppState>>) -> Result<Json<HealthResponse>, AppError> {
    let linked_credentials = state.credentials.credentials()?.len();

    Ok(Json(HealthResponse {
        status: "ok",
        provider: state.provider.name().to_string(),
        generator: state.generator.model().to_string(),
        linked_credentials,
    }))
}
