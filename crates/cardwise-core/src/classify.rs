//! Category classifier
//!
//! Maps a provider's raw category text plus the merchant description onto a
//! small set of canonical spending categories. Rules are evaluated in table
//! order and the first match wins, so more specific rules must come first
//! (a "cafe" is dining even though many cafes also sell retail goods).
//!
//! Matching is case-insensitive substring containment against either the
//! raw category or the merchant text.

use crate::models::{Category, CategoryKey};

/// Placeholder used when a transaction arrives without a raw category
pub const MISSING_CATEGORY: &str = "OTHER";

/// A single classification rule
#[derive(Debug, Clone, Copy)]
pub struct CategoryRule {
    pub key: CategoryKey,
    /// Keywords matched against the raw category (stored uppercase)
    pub category_keywords: &'static [&'static str],
    /// Keywords matched against the merchant text (stored uppercase)
    pub merchant_keywords: &'static [&'static str],
}

impl CategoryRule {
    /// Both inputs must already be uppercased
    fn matches(&self, raw_upper: &str, merchant_upper: &str) -> bool {
        self.category_keywords.iter().any(|k| raw_upper.contains(k))
            || self
                .merchant_keywords
                .iter()
                .any(|k| merchant_upper.contains(k))
    }
}

/// Ordered rule table. Precedence is position.
pub const RULES: &[CategoryRule] = &[
    CategoryRule {
        key: CategoryKey::FoodAndDrink,
        category_keywords: &["FOOD", "RESTAURANT", "DINING", "MEAL"],
        merchant_keywords: &["ZOMATO", "SWIGGY", "RESTAURANT", "CAFE"],
    },
    CategoryRule {
        key: CategoryKey::Travel,
        category_keywords: &["TRAVEL", "FLIGHT", "HOTEL", "TRANSPORT"],
        merchant_keywords: &["UBER", "OLA", "AIR", "FLIGHT", "HOTEL", "UNITED", "DELTA"],
    },
    CategoryRule {
        key: CategoryKey::Income,
        category_keywords: &["INCOME"],
        merchant_keywords: &[],
    },
    CategoryRule {
        key: CategoryKey::Fuel,
        category_keywords: &["FUEL", "GAS", "PETROL"],
        merchant_keywords: &["PETROL", "SHELL", "BHARAT"],
    },
    CategoryRule {
        key: CategoryKey::Shopping,
        category_keywords: &["SHOP", "STORE", "PURCHASE", "RETAIL"],
        merchant_keywords: &["AMAZON", "FLIPKART", "MYNTRA", "STORE"],
    },
    CategoryRule {
        key: CategoryKey::Groceries,
        category_keywords: &["GROC"],
        merchant_keywords: &["SUPERMARKET", "GROCERY", "KIRANA"],
    },
];

/// Classify a transaction into a canonical category
///
/// Never fails: anything unmatched becomes `OTHER` with a label derived from
/// the raw category (`"RENT_AND_UTILITIES"` → `"rent and utilities"`).
pub fn classify(raw_category: Option<&str>, merchant: &str) -> Category {
    let raw = raw_category
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(MISSING_CATEGORY);
    let raw_upper = raw.to_uppercase();
    let merchant_upper = merchant.to_uppercase();

    match RULES
        .iter()
        .find(|rule| rule.matches(&raw_upper, &merchant_upper))
    {
        Some(rule) => Category {
            key: rule.key,
            label: rule.key.label().to_string(),
            raw: raw_category
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or(rule.key.as_str())
                .to_string(),
        },
        None => Category {
            key: CategoryKey::Other,
            label: raw.replace('_', " ").to_lowercase(),
            raw: raw.to_string(),
        },
    }
}
