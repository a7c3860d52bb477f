//! Payoff simulation handler

use axum::{extract::Request, Json};
use serde_json::json;

use cardwise_core::{AmortizationOutcome, AmortizationReport, AmortizationRequest};

use super::require_json;
use crate::AppError;

/// POST /api/simulate - Month-by-month payoff schedule for a fixed payment
///
/// A payment that never reduces the balance is a 422 carrying
/// `minimumViablePayment`.
pub async fn simulate(request: Request) -> Result<Json<AmortizationReport>, AppError> {
    let req: AmortizationRequest = require_json(request).await?;

    match req.simulate().map_err(AppError::from_core)? {
        AmortizationOutcome::Schedule(schedule) => Ok(Json(schedule.report())),
        AmortizationOutcome::Divergence {
            minimum_viable_payment,
        } => Err(
            AppError::unprocessable("Monthly payment is too low to cover interest.")
                .with_details(json!({ "minimumViablePayment": minimum_viable_payment })),
        ),
    }
}
