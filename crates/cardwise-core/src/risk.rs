//! Credit risk heuristics

use serde::{Deserialize, Serialize};

use crate::models::Card;
use crate::spending::round_cents;

const MAX_SCORE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    fn from_score(score: u32) -> Self {
        if score >= 60 {
            Self::High
        } else if score >= 30 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    pub score: u32,
    pub level: RiskLevel,
}

/// Score risk from utilization (percent) and missed payment count
pub fn assess_risk(utilization_percent: f64, missed_payments: u32) -> RiskAssessment {
    let mut score: u32 = 0;

    if utilization_percent > 70.0 {
        score += 50;
    } else if utilization_percent > 30.0 {
        score += 20;
    }

    score = score.saturating_add(missed_payments.saturating_mul(30));
    let score = score.min(MAX_SCORE);

    RiskAssessment {
        score,
        level: RiskLevel::from_score(score),
    }
}

/// Totals across the cards a user holds
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub total_cards: usize,
    pub total_limit: f64,
    pub total_balance: f64,
    pub total_available: f64,
    /// Whole percent; 0 when there is no limit
    pub utilization: f64,
}

pub struct CardPortfolio;

impl CardPortfolio {
    /// Cards without a limit or balance contribute zero
    pub fn summary(cards: &[Card]) -> PortfolioSummary {
        let total_limit: f64 = cards.iter().filter_map(|c| c.limit).sum();
        let total_balance: f64 = cards.iter().filter_map(|c| c.balance).sum();
        let utilization = if total_limit > 0.0 {
            (total_balance / total_limit * 100.0).round()
        } else {
            0.0
        };

        PortfolioSummary {
            total_cards: cards.len(),
            total_limit: round_cents(total_limit),
            total_balance: round_cents(total_balance),
            total_available: round_cents(total_limit - total_balance),
            utilization,
        }
    }

    pub fn assess(cards: &[Card], missed_payments: u32) -> RiskAssessment {
        assess_risk(Self::summary(cards).utilization, missed_payments)
    }
}
