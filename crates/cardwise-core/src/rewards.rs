//! Reward estimation
//!
//! Estimates what each card in a reward table would have earned on the
//! given spend and picks the best one.

use serde::{Deserialize, Serialize};

use crate::classify::classify;
use crate::models::{CategoryKey, Transaction};
use crate::spending::round_cents;

/// Reward buckets a card publishes rates for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RewardBucket {
    Dining,
    Travel,
    Shopping,
    Fuel,
    Bills,
    Default,
}

impl RewardBucket {
    /// Bucket for a canonical category key
    pub fn for_key(key: &str) -> Self {
        let key = key.to_lowercase();
        if key.contains("food") || key.contains("dining") {
            Self::Dining
        } else if key.contains("travel") {
            Self::Travel
        } else if key.contains("shopping") || key.contains("grocer") {
            Self::Shopping
        } else if key.contains("fuel") || key.contains("gas") {
            Self::Fuel
        } else if key.contains("bill") {
            Self::Bills
        } else {
            Self::Default
        }
    }
}

impl From<CategoryKey> for RewardBucket {
    fn from(key: CategoryKey) -> Self {
        Self::for_key(key.as_str())
    }
}

/// Percentage rates for one card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardRewards {
    pub card: String,
    pub dining: f64,
    pub travel: f64,
    pub shopping: f64,
    pub fuel: f64,
    pub bills: f64,
    pub default: f64,
}

impl CardRewards {
    pub fn rate(&self, bucket: RewardBucket) -> f64 {
        match bucket {
            RewardBucket::Dining => self.dining,
            RewardBucket::Travel => self.travel,
            RewardBucket::Shopping => self.shopping,
            RewardBucket::Fuel => self.fuel,
            RewardBucket::Bills => self.bills,
            RewardBucket::Default => self.default,
        }
    }
}

/// Ordered list of cards; order breaks ties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardTable {
    pub cards: Vec<CardRewards>,
}

impl Default for RewardTable {
    fn default() -> Self {
        let card = |name: &str, dining, travel, shopping, fuel, bills, default| CardRewards {
            card: name.to_string(),
            dining,
            travel,
            shopping,
            fuel,
            bills,
            default,
        };
        Self {
            cards: vec![
                card("Chase", 4.0, 4.0, 2.0, 1.0, 1.0, 1.0),
                card("Regions", 5.0, 2.0, 5.0, 2.0, 5.0, 1.0),
                card("Bank of America", 2.0, 1.0, 5.0, 2.0, 2.0, 1.0),
            ],
        }
    }
}

/// Estimated reward for one card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardReward {
    pub card: String,
    pub reward: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardEstimate {
    /// `None` when the table is empty
    pub best_card: Option<String>,
    pub max_reward: f64,
    /// One entry per card, in table order
    pub potential_rewards: Vec<CardReward>,
}

impl RewardEstimate {
    pub fn best(&self) -> Option<(&str, f64)> {
        self.best_card.as_deref().map(|c| (c, self.max_reward))
    }
}

pub fn estimate_rewards(transactions: &[Transaction], table: &RewardTable) -> RewardEstimate {
    let mut rewards: Vec<f64> = vec![0.0; table.cards.len()];

    for tx in transactions.iter().filter(|tx| tx.is_spend()) {
        let key = match &tx.category {
            Some(c) => c.key,
            None => classify(tx.raw_category.as_deref(), &tx.merchant).key,
        };
        let bucket = RewardBucket::from(key);
        for (slot, card) in rewards.iter_mut().zip(&table.cards) {
            *slot += tx.amount * card.rate(bucket) / 100.0;
        }
    }

    // First maximum wins
    let best = rewards
        .iter()
        .enumerate()
        .fold(None::<(usize, f64)>, |best, (i, &r)| match best {
            Some((_, b)) if b >= r => best,
            _ => Some((i, r)),
        });

    RewardEstimate {
        best_card: best.map(|(i, _)| table.cards[i].card.clone()),
        max_reward: best.map(|(_, r)| round_cents(r)).unwrap_or(0.0),
        potential_rewards: table
            .cards
            .iter()
            .zip(rewards)
            .map(|(card, reward)| CardReward {
                card: card.card.clone(),
                reward: round_cents(reward),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn tx(amount: f64, raw: &str) -> Transaction {
        Transaction::new(
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            "merchant",
            amount,
            Some(raw),
        )
    }

    #[test]
    fn test_bucket_mapping() {
        assert_eq!(RewardBucket::from(CategoryKey::FoodAndDrink), RewardBucket::Dining);
        assert_eq!(RewardBucket::from(CategoryKey::Travel), RewardBucket::Travel);
        assert_eq!(RewardBucket::from(CategoryKey::Groceries), RewardBucket::Shopping);
        assert_eq!(RewardBucket::from(CategoryKey::Shopping), RewardBucket::Shopping);
        assert_eq!(RewardBucket::from(CategoryKey::Fuel), RewardBucket::Fuel);
        assert_eq!(RewardBucket::from(CategoryKey::Other), RewardBucket::Default);
        assert_eq!(RewardBucket::for_key("UTILITY_BILLS"), RewardBucket::Bills);
    }

    #[test]
    fn test_dining_heavy_spend_picks_regions() {
        let estimate = estimate_rewards(
            &[tx(100.0, "FOOD_AND_DRINK"), tx(20.0, "TRAVEL")],
            &RewardTable::default(),
        );
        // Chase: 4 + 0.8, Regions: 5 + 0.4, BofA: 2 + 0.2
        assert_eq!(estimate.best_card.as_deref(), Some("Regions"));
        assert_eq!(estimate.max_reward, 5.4);
        assert_eq!(estimate.potential_rewards.len(), 3);
        assert_eq!(estimate.potential_rewards[0].reward, 4.8);
    }

    #[test]
    fn test_travel_heavy_spend_picks_chase() {
        let estimate = estimate_rewards(&[tx(200.0, "TRAVEL")], &RewardTable::default());
        assert_eq!(estimate.best(), Some(("Chase", 8.0)));
    }

    #[test]
    fn test_ties_go_to_first_card() {
        // Every card pays 1% on unmatched spend
        let estimate = estimate_rewards(&[tx(100.0, "ENTERTAINMENT")], &RewardTable::default());
        assert_eq!(estimate.best_card.as_deref(), Some("Chase"));
        assert_eq!(estimate.max_reward, 1.0);
    }

    #[test]
    fn test_non_positive_amounts_ignored() {
        let estimate = estimate_rewards(&[tx(-100.0, "TRAVEL")], &RewardTable::default());
        assert!(estimate.potential_rewards.iter().all(|r| r.reward == 0.0));
    }

    #[test]
    fn test_empty_table() {
        let estimate = estimate_rewards(&[tx(100.0, "TRAVEL")], &RewardTable { cards: vec![] });
        assert_eq!(estimate.best_card, None);
        assert_eq!(estimate.max_reward, 0.0);
        assert!(estimate.best().is_none());
    }
}
