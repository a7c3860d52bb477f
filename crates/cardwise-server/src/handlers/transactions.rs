//! Linked-account transaction handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{Duration, Utc};
use serde::Deserialize;

use cardwise_core::config::MAX_LOOKBACK_DAYS;
use cardwise_core::{IngestionGateway, Transaction};

use crate::{AppError, AppState};

#[derive(Debug, Deserialize)]
pub struct TransactionQuery {
    /// Days back from today; defaults to the configured lookback
    pub days: Option<i64>,
}

/// GET /api/transactions - Merged transactions across linked credit accounts
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TransactionQuery>,
) -> Result<Json<Vec<Transaction>>, AppError> {
    let days = params.days.unwrap_or(state.config.ingest.lookback_days);
    if !(1..=MAX_LOOKBACK_DAYS).contains(&days) {
        return Err(AppError::bad_request(&format!(
            "days must be between 1 and {}",
            MAX_LOOKBACK_DAYS
        )));
    }

    let end = Utc::now().date_naive();
    let start = end - Duration::days(days);
    let credentials = state.credentials.credentials()?;

    let transactions = IngestionGateway::new(&state.provider, &state.config.ingest)
        .fetch_window(&credentials, start, end)
        .await;

    Ok(Json(transactions))
}
