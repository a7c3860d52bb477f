//! Spend aggregation
//!
//! Reduces a transaction set to per-category totals ranked by amount. Only
//! positive amounts count as spend; credits, refunds and card payments are
//! ignored.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::classify::classify;
use crate::models::{CategoryKey, Transaction};

/// Default window used for "top categories" in the advisory bundle
pub const TOP_CATEGORY_COUNT: usize = 4;

/// Total spend for one canonical category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySpend {
    /// Display label
    pub category: String,
    #[serde(skip)]
    pub key: Option<CategoryKey>,
    pub amount: f64,
    /// Share of total spend, rounded to a whole percent
    pub percentage: u32,
}

impl CategorySpend {
    /// Placeholder returned by `highest`/`lowest` when there is no spend
    pub fn none() -> Self {
        Self {
            category: "None".to_string(),
            key: None,
            amount: 0.0,
            percentage: 0,
        }
    }
}

/// Ranked category totals
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendSummary {
    /// Sorted by amount, highest first; equal amounts keep first-seen order
    pub categories: Vec<CategorySpend>,
    pub total_spend: f64,
}

impl SpendSummary {
    /// The first `n` categories
    pub fn top(&self, n: usize) -> &[CategorySpend] {
        &self.categories[..n.min(self.categories.len())]
    }

    pub fn highest(&self) -> CategorySpend {
        self.categories
            .first()
            .cloned()
            .unwrap_or_else(CategorySpend::none)
    }

    pub fn lowest(&self) -> CategorySpend {
        self.categories
            .last()
            .cloned()
            .unwrap_or_else(CategorySpend::none)
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// Aggregate spend per canonical category
pub fn aggregate(transactions: &[Transaction]) -> SpendSummary {
    // (group id -> index into totals); preserves first-seen order
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut totals: Vec<(String, CategoryKey, f64)> = Vec::new();
    let mut total_spend = 0.0;

    for tx in transactions.iter().filter(|tx| tx.is_spend()) {
        let category = classify(tx.raw_category.as_deref(), &tx.merchant);

        // Unmatched categories are kept apart by their derived label
        let group = match category.key {
            CategoryKey::Other => format!("OTHER:{}", category.label),
            key => key.as_str().to_string(),
        };

        let slot = *index.entry(group).or_insert_with(|| {
            totals.push((category.label.clone(), category.key, 0.0));
            totals.len() - 1
        });
        totals[slot].2 += tx.amount;
        total_spend += tx.amount;
    }

    let mut categories: Vec<CategorySpend> = totals
        .into_iter()
        .map(|(label, key, amount)| CategorySpend {
            category: label,
            key: Some(key),
            amount,
            percentage: percentage_of(amount, total_spend),
        })
        .collect();

    // sort_by is stable, so ties stay in first-seen order
    categories.sort_by(|a, b| {
        b.amount
            .partial_cmp(&a.amount)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    for cat in &mut categories {
        cat.amount = round_cents(cat.amount);
    }

    SpendSummary {
        categories,
        total_spend: round_cents(total_spend),
    }
}

fn percentage_of(amount: f64, total: f64) -> u32 {
    if total > 0.0 {
        ((amount / total) * 100.0).round() as u32
    } else {
        0
    }
}

pub(crate) fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn tx(amount: f64, raw: Option<&str>, merchant: &str) -> Transaction {
        Transaction::new(
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            merchant,
            amount,
            raw,
        )
    }

    #[test]
    fn test_end_to_end_example() {
        let summary = aggregate(&[
            tx(100.0, Some("FOOD_AND_DRINK"), "Cafe"),
            tx(50.0, Some("TRAVEL"), "Uber"),
        ]);

        assert_eq!(summary.total_spend, 150.0);
        assert_eq!(summary.categories.len(), 2);
        assert_eq!(summary.categories[0].category, "Food & Drink");
        assert_eq!(summary.categories[0].amount, 100.0);
        assert_eq!(summary.categories[0].percentage, 67);
        assert_eq!(summary.categories[1].category, "Travel");
        assert_eq!(summary.categories[1].amount, 50.0);
        assert_eq!(summary.categories[1].percentage, 33);
    }

    #[test]
    fn test_non_positive_amounts_are_excluded() {
        let summary = aggregate(&[
            tx(-500.0, Some("INCOME"), "Payroll"),
            tx(0.0, Some("FOOD_AND_DRINK"), "Cafe"),
            tx(-25.0, Some("TRAVEL"), "Refund"),
        ]);
        assert_eq!(summary.total_spend, 0.0);
        assert!(summary.categories.is_empty());
    }

    #[test]
    fn test_empty_input() {
        let summary = aggregate(&[]);
        assert!(summary.is_empty());
        assert_eq!(summary.total_spend, 0.0);
        assert_eq!(summary.highest().category, "None");
        assert_eq!(summary.lowest().amount, 0.0);
        assert!(summary.top(4).is_empty());
    }

    #[test]
    fn test_accumulates_per_canonical_key() {
        let summary = aggregate(&[
            tx(10.0, Some("FOOD_AND_DRINK"), "Cafe A"),
            tx(20.0, Some("RESTAURANTS"), "Diner"),
            tx(5.0, None, "Swiggy order"),
        ]);
        assert_eq!(summary.categories.len(), 1);
        assert_eq!(summary.categories[0].amount, 35.0);
        assert_eq!(summary.categories[0].percentage, 100);
    }

    #[test]
    fn test_unmatched_categories_stay_separate() {
        let summary = aggregate(&[
            tx(30.0, Some("ENTERTAINMENT"), "Cinema"),
            tx(70.0, Some("RENT_AND_UTILITIES"), "Landlord"),
        ]);
        let labels: Vec<_> = summary.categories.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(labels, vec!["rent and utilities", "entertainment"]);
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let summary = aggregate(&[
            tx(40.0, Some("TRAVEL"), "Delta"),
            tx(40.0, Some("FOOD_AND_DRINK"), "Cafe"),
            tx(40.0, Some("SHOPS"), "Amazon"),
        ]);
        let labels: Vec<_> = summary.categories.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(labels, vec!["Travel", "Food & Drink", "Shopping"]);
    }

    #[test]
    fn test_percentages_sum_to_about_100() {
        let sets: Vec<Vec<Transaction>> = vec![
            vec![
                tx(33.33, Some("TRAVEL"), "a"),
                tx(33.33, Some("FOOD"), "b"),
                tx(33.34, Some("GROCERIES"), "c"),
            ],
            vec![
                tx(1.0, Some("TRAVEL"), "a"),
                tx(2.0, Some("FOOD"), "b"),
                tx(3.0, Some("GROCERIES"), "c"),
                tx(4.0, Some("FUEL"), "d"),
                tx(5.0, Some("ENTERTAINMENT"), "e"),
                tx(6.0, Some("MEDICAL"), "f"),
            ],
            vec![tx(12.5, Some("TRAVEL"), "a")],
        ];

        for set in sets {
            let summary = aggregate(&set);
            let sum: u32 = summary.categories.iter().map(|c| c.percentage).sum();
            let tolerance = summary.categories.len() as u32;
            assert!(
                sum.abs_diff(100) <= tolerance,
                "percentages summed to {}",
                sum
            );
        }
    }

    #[test]
    fn test_top_highest_lowest() {
        let summary = aggregate(&[
            tx(10.0, Some("TRAVEL"), "a"),
            tx(50.0, Some("FOOD"), "b"),
            tx(30.0, Some("GROCERIES"), "c"),
            tx(20.0, Some("FUEL"), "d"),
            tx(5.0, Some("SHOPS"), "e"),
        ]);
        assert_eq!(summary.top(4).len(), 4);
        assert_eq!(summary.top(10).len(), 5);
        assert_eq!(summary.highest().category, "Food & Drink");
        assert_eq!(summary.lowest().category, "Shopping");
    }

    #[test]
    fn test_totals_rounded_to_cents() {
        let summary = aggregate(&[
            tx(0.1, Some("TRAVEL"), "a"),
            tx(0.2, Some("TRAVEL"), "b"),
        ]);
        assert_eq!(summary.total_spend, 0.3);
        assert_eq!(summary.categories[0].amount, 0.3);
    }
}
