//! Domain models for Cardwise

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Canonical spending category keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CategoryKey {
    FoodAndDrink,
    Travel,
    Income,
    Fuel,
    Shopping,
    Groceries,
    Other,
}

impl CategoryKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FoodAndDrink => "FOOD_AND_DRINK",
            Self::Travel => "TRAVEL",
            Self::Income => "INCOME",
            Self::Fuel => "FUEL",
            Self::Shopping => "SHOPPING",
            Self::Groceries => "GROCERIES",
            Self::Other => "OTHER",
        }
    }

    /// Display label for matched keys. `Other` has no fixed label; the
    /// classifier derives one from the raw category text.
    pub fn label(&self) -> &'static str {
        match self {
            Self::FoodAndDrink => "Food & Drink",
            Self::Travel => "Travel",
            Self::Income => "Income",
            Self::Fuel => "Fuel",
            Self::Shopping => "Shopping",
            Self::Groceries => "Groceries",
            Self::Other => "Other",
        }
    }
}

impl std::str::FromStr for CategoryKey {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "FOOD_AND_DRINK" => Ok(Self::FoodAndDrink),
            "TRAVEL" => Ok(Self::Travel),
            "INCOME" => Ok(Self::Income),
            "FUEL" => Ok(Self::Fuel),
            "SHOPPING" => Ok(Self::Shopping),
            "GROCERIES" => Ok(Self::Groceries),
            "OTHER" => Ok(Self::Other),
            _ => Err(format!("Unknown category key: {}", s)),
        }
    }
}

impl std::fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of classifying a transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub key: CategoryKey,
    pub label: String,
    /// The raw category text that was classified (or the placeholder used
    /// when none was provided)
    pub raw: String,
}

/// A spend or credit record from a linked account
///
/// Amounts follow the provider convention: positive is money leaving the
/// account (spend), negative is a credit or payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub date: NaiveDate,
    pub merchant: String,
    pub amount: f64,
    #[serde(default, alias = "category", alias = "raw_category")]
    pub raw_category: Option<String>,
    /// Set by the ingestion gateway; the aggregator re-classifies from the
    /// raw fields either way
    #[serde(
        default,
        rename = "canonicalCategory",
        skip_serializing_if = "Option::is_none"
    )]
    pub category: Option<Category>,
    #[serde(default, alias = "card", alias = "account_label")]
    pub account_label: String,
}

impl Transaction {
    pub fn new(date: NaiveDate, merchant: &str, amount: f64, raw_category: Option<&str>) -> Self {
        Self {
            date,
            merchant: merchant.to_string(),
            amount,
            raw_category: raw_category.map(String::from),
            category: None,
            account_label: String::new(),
        }
    }

    /// Whether this record counts toward spend totals
    pub fn is_spend(&self) -> bool {
        self.amount > 0.0
    }
}

/// A linked financial account as reported by the account-data provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
    /// Provider account type (e.g. "credit", "depository")
    pub account_type: String,
    pub subtype: Option<String>,
    /// Last four digits
    pub mask: Option<String>,
    pub institution_id: Option<String>,
}

impl Account {
    /// Only credit lines contribute to card spend analysis
    pub fn is_credit(&self) -> bool {
        let is_credit_label = |s: &str| {
            let s = s.to_lowercase();
            s == "credit" || s == "credit card" || s == "credit_card"
        };
        is_credit_label(&self.account_type) || self.subtype.as_deref().is_some_and(is_credit_label)
    }

    /// Composite label: `institution – name (last4)`
    pub fn display_label(&self, institution: &str) -> String {
        let mask = self.mask.as_deref().unwrap_or("....");
        if institution.is_empty() {
            format!("{} ({})", self.name, mask)
        } else {
            format!("{} – {} ({})", institution, self.name, mask)
        }
    }
}

/// A card the user holds, supplied with analysis requests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub name: String,
    #[serde(default, alias = "last_four")]
    pub last_four: Option<String>,
    #[serde(default)]
    pub limit: Option<f64>,
    #[serde(default)]
    pub balance: Option<f64>,
}

impl Card {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            last_four: None,
            limit: None,
            balance: None,
        }
    }
}
