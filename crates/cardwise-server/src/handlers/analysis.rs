//! Spending analysis handler

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    Json,
};
use serde::Deserialize;
use tracing::info;

use cardwise_core::{AnalysisReport, Card, IngestionGateway, InsightSynthesizer, Transaction};

use super::read_json;
use crate::{AppError, AppState, MAX_CARDS};

/// Request body for an analysis
///
/// Without `transactions`, every linked credential is fetched first.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub transactions: Option<Vec<Transaction>>,
    #[serde(default, alias = "userCards")]
    pub cards: Vec<CardInput>,
}

/// A held card, either by name or with limit/balance details
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CardInput {
    Name(String),
    Card(Card),
}

impl From<CardInput> for Card {
    fn from(input: CardInput) -> Self {
        match input {
            CardInput::Name(name) => Card::named(&name),
            CardInput::Card(card) => card,
        }
    }
}

/// POST /api/analyze - Aggregate spend and synthesize advice
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<AnalysisReport>, AppError> {
    let req: AnalyzeRequest = read_json(request).await?.unwrap_or_default();

    if req.cards.len() > MAX_CARDS {
        return Err(AppError::bad_request(&format!(
            "At most {} cards per request",
            MAX_CARDS
        )));
    }
    let cards: Vec<Card> = req.cards.into_iter().map(Card::from).collect();

    let transactions = match req.transactions {
        Some(transactions) => transactions,
        None => {
            let credentials = state.credentials.credentials()?;
            IngestionGateway::new(&state.provider, &state.config.ingest)
                .fetch_all(&credentials)
                .await
        }
    };

    let report = InsightSynthesizer::new(&state.generator)
        .with_timeout(state.config.generator.timeout)
        .analyze(&transactions, &cards, &state.rewards)
        .await;

    info!(
        transactions = transactions.len(),
        provenance = ?report.provenance,
        "Analysis complete"
    );

    Ok(Json(report))
}
