//! Insight output types

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::rewards::RewardEstimate;
use crate::spending::CategorySpend;

/// Where the advisory text came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Generated,
    Fallback,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Generated => "generated",
            Self::Fallback => "fallback",
        }
    }
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Advisory output for one analysis
///
/// Only `top_categories` carries authoritative figures, taken straight from
/// the spend summary. The three text fields are generated prose (or fallback
/// text) and are passed through unchecked, so any amounts or percentages
/// quoted in them are not guaranteed to match the summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightBundle {
    /// Always computed, never generated
    pub top_categories: Vec<CategorySpend>,
    pub spending_insights: Vec<String>,
    pub smart_card_usage_advice: String,
    pub reward_optimization_tips: Vec<String>,
    pub provenance: Provenance,
}

/// Full analysis response
///
/// `top_spending_categories`, `total_spend` and the reward fields are
/// computed. The advice fields are copied from the `InsightBundle` as is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub top_spending_categories: Vec<CategorySpend>,
    pub spending_insights: Vec<String>,
    pub smart_card_usage_advice: String,
    pub reward_optimization_tips: Vec<String>,
    pub provenance: Provenance,
    pub total_spend: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_card: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub potential_rewards: Option<BTreeMap<String, f64>>,
}

impl AnalysisReport {
    pub fn new(bundle: InsightBundle, total_spend: f64, rewards: Option<&RewardEstimate>) -> Self {
        Self {
            top_spending_categories: bundle.top_categories,
            spending_insights: bundle.spending_insights,
            smart_card_usage_advice: bundle.smart_card_usage_advice,
            reward_optimization_tips: bundle.reward_optimization_tips,
            provenance: bundle.provenance,
            total_spend,
            best_card: rewards.and_then(|r| r.best_card.clone()),
            potential_rewards: rewards.map(|r| {
                r.potential_rewards
                    .iter()
                    .map(|c| (c.card.clone(), c.reward))
                    .collect()
            }),
        }
    }
}
