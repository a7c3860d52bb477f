//! Payoff simulation command

use anyhow::{bail, Result};
use rust_decimal::Decimal;

use cardwise_core::{simulate, AmortizationOutcome, AmortizationReport, PayoffStatus};

pub fn cmd_simulate(
    principal: Decimal,
    rate: Decimal,
    payment: Decimal,
    show_schedule: bool,
    json: bool,
) -> Result<()> {
    let report = simulation_report(principal, rate, payment)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!();
    println!("💳 Payoff of {} at {}% APR paying {}/month", principal, rate, payment);
    println!("   ─────────────────────────────────────────────");
    for line in summary_lines(&report) {
        println!("   {}", line);
    }

    if show_schedule {
        println!();
        println!("   {:>5}  {:>12}  {:>12}  {:>12}", "Month", "Principal", "Interest", "Balance");
        for row in &report.schedule {
            println!(
                "   {:>5}  {:>12}  {:>12}  {:>12}",
                row.month, row.principal_paid, row.interest_paid, row.remaining_balance
            );
        }
    }
    println!();

    Ok(())
}

/// Headline figures for a report, one per line
pub fn summary_lines(report: &AmortizationReport) -> Vec<String> {
    let mut lines = Vec::new();
    match report.status {
        PayoffStatus::PaidOff => {
            lines.push(format!("Months to pay off:   {}", report.months_to_pay_off))
        }
        PayoffStatus::Capped => lines.push(format!(
            "⚠️  Not paid off after {} months ({} still owed)",
            report.months_to_pay_off, report.remaining_balance
        )),
    }
    lines.push(format!("Total interest:      {}", report.total_interest));
    lines.push(format!("Total paid:          {}", report.total_payment));
    lines.push(format!("Total paid per 1.00: {}", report.invisible_cost_ratio));
    lines.push(format!("First month's interest: {}", report.min_payment));
    lines
}

/// Run the simulation, turning a payment that never shrinks the balance into an error
pub fn simulation_report(
    principal: Decimal,
    rate: Decimal,
    payment: Decimal,
) -> Result<AmortizationReport> {
    match simulate(principal, rate, payment)? {
        AmortizationOutcome::Schedule(schedule) => Ok(schedule.report()),
        AmortizationOutcome::Divergence {
            minimum_viable_payment,
        } => bail!(
            "Monthly payment is too low to cover interest. Pay at least {} per month.",
            minimum_viable_payment
        ),
    }
}
