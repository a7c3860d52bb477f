//! Amortization engine
//!
//! Simulates paying down a balance with a fixed monthly payment. All
//! arithmetic is `Decimal`; values are rounded to cents only when a
//! [`AmortizationReport`] is produced for display.
//!
//! There are three terminal states:
//! - the schedule reaches a zero balance (`PayoffStatus::PaidOff`)
//! - the 360-period cap is hit first (`PayoffStatus::Capped`)
//! - the payment never exceeds the first month's interest, detected before
//!   any simulation ([`AmortizationOutcome::Divergence`])

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Hard cap on simulated periods (30 years of monthly payments)
pub const MAX_PERIODS: usize = 360;

/// Upper bound on accepted principal and monthly payment
const MAX_PRINCIPAL: Decimal = dec!(1000000000000);

/// Upper bound on accepted APR, in percent
const MAX_RATE_PERCENT: Decimal = dec!(1000);

/// Simulation inputs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmortizationRequest {
    pub principal: Decimal,
    #[serde(alias = "rate", alias = "annual_rate_percent")]
    pub annual_rate_percent: Decimal,
    #[serde(alias = "monthly_payment")]
    pub monthly_payment: Decimal,
}

impl AmortizationRequest {
    pub fn simulate(&self) -> Result<AmortizationOutcome> {
        simulate(self.principal, self.annual_rate_percent, self.monthly_payment)
    }
}

/// One month of the schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    /// 1-based month number
    pub index: u32,
    pub interest_paid: Decimal,
    pub principal_paid: Decimal,
    pub remaining_balance: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayoffStatus {
    /// Balance reached zero
    PaidOff,
    /// Stopped at `MAX_PERIODS` with a balance still outstanding
    Capped,
}

/// A simulated payoff schedule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    pub principal: Decimal,
    pub monthly_payment: Decimal,
    pub periods: Vec<Period>,
    pub total_interest: Decimal,
    /// Principal actually repaid plus interest
    pub total_payment: Decimal,
    /// Interest accrued in the first month; paying exactly this never
    /// reduces the balance
    pub min_payment: Decimal,
    pub status: PayoffStatus,
}

impl Schedule {
    pub fn period_count(&self) -> usize {
        self.periods.len()
    }

    pub fn remaining_balance(&self) -> Decimal {
        self.periods
            .last()
            .map(|p| p.remaining_balance)
            .unwrap_or(self.principal)
    }

    pub fn is_paid_off(&self) -> bool {
        self.status == PayoffStatus::PaidOff
    }

    /// Total paid per unit borrowed
    pub fn invisible_cost_ratio(&self) -> Decimal {
        if self.principal.is_zero() {
            Decimal::ZERO
        } else {
            self.total_payment / self.principal
        }
    }

    /// Cent-rounded view for display and serialization
    pub fn report(&self) -> AmortizationReport {
        AmortizationReport {
            total_interest: self.total_interest.round_dp(2),
            months_to_pay_off: self.period_count(),
            total_payment: self.total_payment.round_dp(2),
            schedule: self
                .periods
                .iter()
                .map(|p| ScheduleRow {
                    month: p.index,
                    principal_paid: p.principal_paid.round_dp(2),
                    interest_paid: p.interest_paid.round_dp(2),
                    remaining_balance: p.remaining_balance.round_dp(2),
                })
                .collect(),
            min_payment: self.min_payment.round_dp(2),
            invisible_cost_ratio: self.invisible_cost_ratio().round_dp(2),
            status: self.status,
            remaining_balance: self.remaining_balance().round_dp(2),
        }
    }
}

/// Result of a simulation that did not fail validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AmortizationOutcome {
    Schedule(Schedule),
    /// The payment cannot cover the first month's interest, so the balance
    /// never shrinks
    Divergence { minimum_viable_payment: Decimal },
}

/// Serializable schedule row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRow {
    pub month: u32,
    pub principal_paid: Decimal,
    pub interest_paid: Decimal,
    pub remaining_balance: Decimal,
}

/// Serializable schedule summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmortizationReport {
    pub total_interest: Decimal,
    pub months_to_pay_off: usize,
    pub total_payment: Decimal,
    pub schedule: Vec<ScheduleRow>,
    pub min_payment: Decimal,
    pub invisible_cost_ratio: Decimal,
    pub status: PayoffStatus,
    pub remaining_balance: Decimal,
}

/// Simulate a fixed-payment payoff
///
/// `annual_rate_percent` is an APR in percent (24 means 24%). Non-positive
/// principal or payment, a negative rate, or any input above its bound
/// (principal and payment 1e12, rate 1000%) is rejected as
/// [`Error::Validation`].
pub fn simulate(
    principal: Decimal,
    annual_rate_percent: Decimal,
    monthly_payment: Decimal,
) -> Result<AmortizationOutcome> {
    validate(principal, annual_rate_percent, monthly_payment)?;

    let monthly_rate = annual_rate_percent / dec!(100) / dec!(12);
    let first_interest = principal * monthly_rate;

    if monthly_payment <= first_interest {
        return Ok(AmortizationOutcome::Divergence {
            minimum_viable_payment: first_interest.ceil() + Decimal::ONE,
        });
    }

    let mut balance = principal;
    let mut total_interest = Decimal::ZERO;
    let mut periods = Vec::new();

    while balance > Decimal::ZERO && periods.len() < MAX_PERIODS {
        let interest = balance * monthly_rate;
        // Final month only pays what is left
        let principal_paid = (monthly_payment - interest).min(balance);
        balance = (balance - principal_paid).max(Decimal::ZERO);
        total_interest += interest;

        periods.push(Period {
            index: periods.len() as u32 + 1,
            interest_paid: interest,
            principal_paid,
            remaining_balance: balance,
        });
    }

    let status = if balance.is_zero() {
        PayoffStatus::PaidOff
    } else {
        tracing::debug!(
            remaining = %balance.round_dp(2),
            "Amortization capped before payoff"
        );
        PayoffStatus::Capped
    };

    Ok(AmortizationOutcome::Schedule(Schedule {
        principal,
        monthly_payment,
        total_payment: (principal - balance) + total_interest,
        periods,
        total_interest,
        min_payment: first_interest,
        status,
    }))
}

fn validate(principal: Decimal, rate: Decimal, payment: Decimal) -> Result<()> {
    if principal <= Decimal::ZERO {
        return Err(Error::Validation("principal must be positive".into()));
    }
    if principal > MAX_PRINCIPAL {
        return Err(Error::Validation(format!(
            "principal must not exceed {}",
            MAX_PRINCIPAL
        )));
    }
    if payment <= Decimal::ZERO {
        return Err(Error::Validation("monthly payment must be positive".into()));
    }
    if payment > MAX_PRINCIPAL {
        return Err(Error::Validation(format!(
            "monthly payment must not exceed {}",
            MAX_PRINCIPAL
        )));
    }
    if rate < Decimal::ZERO {
        return Err(Error::Validation(
            "annual rate must not be negative".into(),
        ));
    }
    if rate > MAX_RATE_PERCENT {
        return Err(Error::Validation(format!(
            "annual rate must not exceed {}%",
            MAX_RATE_PERCENT
        )));
    }
    Ok(())
}
