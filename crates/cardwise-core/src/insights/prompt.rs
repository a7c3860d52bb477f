//! Advisory prompt
//!
//! The prompt carries only computed figures. The model is asked to phrase
//! advice around them, never to compute anything.

use crate::rewards::RewardEstimate;
use crate::spending::SpendSummary;

const GENERIC_CARDS: &str = "Recommend generic popular credit cards.";

/// Build the zephyr-style chat prompt for an analysis
pub fn build_prompt(
    summary: &SpendSummary,
    card_names: &[String],
    rewards: Option<&RewardEstimate>,
) -> String {
    let highest = summary.highest();
    let lowest = summary.lowest();

    let cards_context = if card_names.is_empty() {
        GENERIC_CARDS.to_string()
    } else {
        serde_json::to_string(card_names).unwrap_or_else(|_| GENERIC_CARDS.to_string())
    };

    let reward_line = match rewards.and_then(RewardEstimate::best) {
        Some((card, reward)) => format!(
            "- Best Rewards Card: {} (estimated ${:.2} back on this spend)\n",
            card, reward
        ),
        None => String::new(),
    };

    format!(
        r#"<|system|>
You are a financial advisor AI.
I will provide the user's spending data.
Your goal is to generate:
1. "spending_insights": simple text comments about their highest and lowest spending.
2. "smart_card_usage_advice": recommend WHICH of the available cards to use for their highest category.
3. "reward_optimization_tips": generic tips to save money.

User's Card Options: {cards}

Spending Data:
- Top Spending Category: {hi_cat} (${hi_amt:.2})
- Lowest Spending Category: {lo_cat} (${lo_amt:.2})
- Total Spend: ${total:.2}
{reward_line}
Return a valid JSON object matching this structure EXACTLY:
{{
  "spending_insights": ["Insight about highest spend", "Insight about lowest spend"],
  "smart_card_usage_advice": "Advice on which card to use for {hi_cat}",
  "reward_optimization_tips": ["Tip 1", "Tip 2"]
}}
Do NOT wrap in markdown. Return raw JSON.
</s>
<|user|>
Generate insights.
</s>
<|assistant|>
"#,
        cards = cards_context,
        hi_cat = highest.category,
        hi_amt = highest.amount,
        lo_cat = lowest.category,
        lo_amt = lowest.amount,
        total = summary.total_spend,
        reward_line = reward_line,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Transaction;
    use crate::rewards::{estimate_rewards, RewardTable};
    use crate::spending::aggregate;
    use chrono::NaiveDate;

    fn transactions() -> Vec<Transaction> {
        let d = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        vec![
            Transaction::new(d, "Cafe", 100.0, Some("FOOD_AND_DRINK")),
            Transaction::new(d, "Uber", 50.0, Some("TRAVEL")),
        ]
    }

    #[test]
    fn test_prompt_embeds_computed_facts() {
        let summary = aggregate(&transactions());
        let prompt = build_prompt(&summary, &["Chase Sapphire".to_string()], None);

        assert!(prompt.contains("Top Spending Category: Food & Drink ($100.00)"));
        assert!(prompt.contains("Lowest Spending Category: Travel ($50.00)"));
        assert!(prompt.contains("Total Spend: $150.00"));
        assert!(prompt.contains(r#"["Chase Sapphire"]"#));
        assert!(prompt.contains("Do NOT wrap in markdown"));
        assert!(!prompt.contains("Best Rewards Card"));
    }

    #[test]
    fn test_prompt_without_cards() {
        let summary = aggregate(&transactions());
        let prompt = build_prompt(&summary, &[], None);
        assert!(prompt.contains(GENERIC_CARDS));
    }

    #[test]
    fn test_prompt_with_reward_estimate() {
        let txs = transactions();
        let summary = aggregate(&txs);
        let rewards = estimate_rewards(&txs, &RewardTable::default());
        let prompt = build_prompt(&summary, &[], Some(&rewards));
        assert!(prompt.contains("Best Rewards Card: Regions"));
    }
}
