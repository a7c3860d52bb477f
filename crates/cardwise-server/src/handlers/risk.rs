//! Credit risk handler

use axum::{extract::Request, Json};
use serde::{Deserialize, Serialize};

use cardwise_core::risk::PortfolioSummary;
use cardwise_core::{assess_risk, Card, CardPortfolio, RiskAssessment};

use super::require_json;
use crate::{AppError, MAX_CARDS};

/// Either an explicit utilization or the cards to derive it from
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskRequest {
    #[serde(default)]
    pub utilization: Option<f64>,
    #[serde(default, alias = "missed_payments")]
    pub missed_payments: u32,
    #[serde(default)]
    pub cards: Vec<Card>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskResponse {
    #[serde(flatten)]
    pub assessment: RiskAssessment,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub portfolio: Option<PortfolioSummary>,
}

/// POST /api/risk - Score utilization and missed payments
pub async fn assess(request: Request) -> Result<Json<RiskResponse>, AppError> {
    let req: RiskRequest = require_json(request).await?;

    if req.cards.len() > MAX_CARDS {
        return Err(AppError::bad_request(&format!(
            "At most {} cards per request",
            MAX_CARDS
        )));
    }

    let response = match req.utilization {
        Some(utilization) if !utilization.is_finite() || utilization < 0.0 => {
            return Err(AppError::bad_request("utilization must be a non-negative number"));
        }
        Some(utilization) => RiskResponse {
            assessment: assess_risk(utilization, req.missed_payments),
            portfolio: None,
        },
        None => RiskResponse {
            assessment: CardPortfolio::assess(&req.cards, req.missed_payments),
            portfolio: Some(CardPortfolio::summary(&req.cards)),
        },
    };

    Ok(Json(response))
}
