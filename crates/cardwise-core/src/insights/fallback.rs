//! Deterministic advice used when generation fails

use crate::rewards::RewardEstimate;
use crate::spending::SpendSummary;

use super::types::{InsightBundle, Provenance};

const DEFAULT_CATEGORY: &str = "General";

pub fn fallback_bundle(
    summary: &SpendSummary,
    top_count: usize,
    rewards: Option<&RewardEstimate>,
) -> InsightBundle {
    let highest = summary.categories.first();
    let highest_label = highest
        .map(|c| c.category.as_str())
        .unwrap_or(DEFAULT_CATEGORY);

    let mut insights = vec![match highest {
        Some(c) => format!("Highest spend: {} – {:.2}", c.category, c.amount),
        None => format!("Highest spend: {} – 0.00", DEFAULT_CATEGORY),
    }];
    if summary.categories.len() >= 2 {
        let lowest = summary.lowest();
        insights.push(format!(
            "Lowest spend: {} – {:.2}",
            lowest.category, lowest.amount
        ));
    }
    insights.push("Consider reviewing your recurring subscriptions.".to_string());

    let advice = match rewards.and_then(RewardEstimate::best) {
        Some((card, _)) => format!(
            "Use your {} card for {} purchases.",
            card, highest_label
        ),
        None => format!(
            "Use your best rewards card for {} purchases.",
            highest_label
        ),
    };

    InsightBundle {
        top_categories: summary.top(top_count).to_vec(),
        spending_insights: insights,
        smart_card_usage_advice: advice,
        reward_optimization_tips: vec![
            "Pay your full balance to avoid interest.".to_string(),
            "Check for new card offers.".to_string(),
        ],
        provenance: Provenance::Fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Transaction;
    use crate::spending::aggregate;
    use chrono::NaiveDate;

    #[test]
    fn test_fallback_for_empty_summary() {
        let bundle = fallback_bundle(&SpendSummary::default(), 4, None);
        assert_eq!(bundle.provenance, Provenance::Fallback);
        assert!(bundle.top_categories.is_empty());
        assert_eq!(bundle.spending_insights[0], "Highest spend: General – 0.00");
        assert_eq!(bundle.spending_insights.len(), 2);
        assert_eq!(
            bundle.smart_card_usage_advice,
            "Use your best rewards card for General purchases."
        );
        assert_eq!(bundle.reward_optimization_tips.len(), 2);
    }

    #[test]
    fn test_fallback_mentions_highest_and_lowest() {
        let d = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let summary = aggregate(&[
            Transaction::new(d, "Cafe", 100.0, Some("FOOD_AND_DRINK")),
            Transaction::new(d, "Uber", 50.0, Some("TRAVEL")),
        ]);
        let bundle = fallback_bundle(&summary, 4, None);
        assert_eq!(bundle.spending_insights[0], "Highest spend: Food & Drink – 100.00");
        assert_eq!(bundle.spending_insights[1], "Lowest spend: Travel – 50.00");
        assert_eq!(bundle.top_categories.len(), 2);
    }

    #[test]
    fn test_fallback_uses_best_card() {
        let estimate = RewardEstimate {
            best_card: Some("Regions".into()),
            max_reward: 5.0,
            potential_rewards: vec![],
        };
        let bundle = fallback_bundle(&SpendSummary::default(), 4, Some(&estimate));
        assert_eq!(
            bundle.smart_card_usage_advice,
            "Use your Regions card for General purchases."
        );
    }
}
