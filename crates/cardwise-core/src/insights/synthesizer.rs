//! Insight synthesizer
//!
//! Turns a spend summary into advisory text with one bounded generator
//! call. Every failure path (transport, timeout, unparseable or incomplete
//! reply) degrades to deterministic fallback text, so synthesis never fails.

use std::time::Duration;

use tracing::{debug, warn};

use crate::ai::parsing::parse_advice;
use crate::ai::{AdviceReply, GenerationParams, TextGenerator};
use crate::config::DEFAULT_GENERATOR_TIMEOUT_SECS;
use crate::error::{Error, Result};
use crate::models::{Card, Transaction};
use crate::rewards::{estimate_rewards, RewardEstimate, RewardTable};
use crate::spending::{aggregate, SpendSummary, TOP_CATEGORY_COUNT};

use super::fallback::fallback_bundle;
use super::prompt::build_prompt;
use super::types::{AnalysisReport, InsightBundle, Provenance};

pub struct InsightSynthesizer<'a, G: TextGenerator + ?Sized> {
    generator: &'a G,
    params: GenerationParams,
    timeout: Duration,
}

impl<'a, G: TextGenerator + ?Sized> InsightSynthesizer<'a, G> {
    pub fn new(generator: &'a G) -> Self {
        Self {
            generator,
            params: GenerationParams::default(),
            timeout: Duration::from_secs(DEFAULT_GENERATOR_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    /// Produce advice for a summary. Never fails.
    pub async fn synthesize(
        &self,
        summary: &SpendSummary,
        card_names: &[String],
        rewards: Option<&RewardEstimate>,
    ) -> InsightBundle {
        match self.generate_advice(summary, card_names, rewards).await {
            Ok(reply) => InsightBundle {
                top_categories: summary.top(TOP_CATEGORY_COUNT).to_vec(),
                spending_insights: reply.spending_insights,
                smart_card_usage_advice: reply.smart_card_usage_advice,
                reward_optimization_tips: reply.reward_optimization_tips,
                provenance: Provenance::Generated,
            },
            Err(e) => {
                warn!(
                    error = %e,
                    model = self.generator.model(),
                    "Insight generation failed, using fallback"
                );
                fallback_bundle(summary, TOP_CATEGORY_COUNT, rewards)
            }
        }
    }

    /// Aggregate, estimate rewards, and synthesize in one pass
    pub async fn analyze(
        &self,
        transactions: &[Transaction],
        cards: &[Card],
        table: &RewardTable,
    ) -> AnalysisReport {
        let summary = aggregate(transactions);
        let rewards = estimate_rewards(transactions, table);
        let card_names: Vec<String> = cards.iter().map(|c| c.name.clone()).collect();

        let bundle = self.synthesize(&summary, &card_names, Some(&rewards)).await;
        AnalysisReport::new(bundle, summary.total_spend, Some(&rewards))
    }

    async fn generate_advice(
        &self,
        summary: &SpendSummary,
        card_names: &[String],
        rewards: Option<&RewardEstimate>,
    ) -> Result<AdviceReply> {
        let prompt = build_prompt(summary, card_names, rewards);
        debug!(chars = prompt.len(), model = self.generator.model(), "Requesting insights");

        let text = tokio::time::timeout(self.timeout, self.generator.generate(&prompt, &self.params))
            .await
            .map_err(|_| {
                Error::Generator(format!("no reply within {}s", self.timeout.as_secs_f32()))
            })??;

        debug!(reply = %text, "Generator reply");
        parse_advice(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{GeneratorClient, MockGenerator};
    use chrono::NaiveDate;

    fn transactions() -> Vec<Transaction> {
        let d = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        vec![
            Transaction::new(d, "Cafe", 100.0, Some("FOOD_AND_DRINK")),
            Transaction::new(d, "Uber", 50.0, Some("TRAVEL")),
            Transaction::new(d, "Amazon", 30.0, Some("SHOPS")),
            Transaction::new(d, "Shell", 20.0, Some("GAS")),
            Transaction::new(d, "Kirana", 10.0, None),
        ]
    }

    #[tokio::test]
    async fn test_generated_advice() {
        let generator = MockGenerator::new();
        let summary = aggregate(&transactions());
        let bundle = InsightSynthesizer::new(&generator)
            .synthesize(&summary, &[], None)
            .await;

        assert_eq!(bundle.provenance, Provenance::Generated);
        assert_eq!(bundle.top_categories.len(), 4);
        assert!(!bundle.spending_insights.is_empty());
        assert_eq!(generator.call_count(), 1);
    }

    #[tokio::test]
    async fn test_failing_generator_is_stable() {
        let generator = MockGenerator::failing();
        let summary = aggregate(&transactions());
        let synth = InsightSynthesizer::new(&generator);

        let first = synth.synthesize(&summary, &[], None).await;
        for _ in 0..3 {
            let again = synth.synthesize(&summary, &[], None).await;
            assert_eq!(again.top_categories, first.top_categories);
            assert!(!again.spending_insights.is_empty());
            assert_eq!(again.provenance, Provenance::Fallback);
        }
        assert_eq!(first.top_categories, summary.top(4).to_vec());
        // One attempt per synthesis, no retries
        assert_eq!(generator.call_count(), 4);
    }

    #[tokio::test]
    async fn test_top_categories_independent_of_provenance() {
        let summary = aggregate(&transactions());
        let ok = MockGenerator::new();
        let bad = MockGenerator::failing();

        let generated = InsightSynthesizer::new(&ok).synthesize(&summary, &[], None).await;
        let fallback = InsightSynthesizer::new(&bad).synthesize(&summary, &[], None).await;
        assert_eq!(generated.top_categories, fallback.top_categories);
    }

    #[tokio::test]
    async fn test_generated_figures_do_not_override_computed_categories() {
        let reply = r#"{"spending_insights": ["You spent 99999.00 on Travel (87%)"],
            "smart_card_usage_advice": "Pay 12345 now",
            "reward_optimization_tips": ["Travel is 87% of spend"]}"#;
        let generator = MockGenerator::with_reply(reply);
        let summary = aggregate(&transactions());
        let bundle = InsightSynthesizer::new(&generator)
            .synthesize(&summary, &[], None)
            .await;

        assert_eq!(bundle.provenance, Provenance::Generated);
        assert_eq!(bundle.spending_insights, vec!["You spent 99999.00 on Travel (87%)"]);
        assert_eq!(bundle.top_categories, summary.top(4).to_vec());
        assert!(bundle.top_categories.iter().all(|c| c.amount < 99999.0));
    }

    #[tokio::test]
    async fn test_timeout_falls_back() {
        let generator = MockGenerator::slow(Duration::from_secs(5));
        let summary = aggregate(&transactions());
        let bundle = InsightSynthesizer::new(&generator)
            .with_timeout(Duration::from_millis(20))
            .synthesize(&summary, &[], None)
            .await;
        assert_eq!(bundle.provenance, Provenance::Fallback);
    }

    #[tokio::test]
    async fn test_malformed_reply_falls_back() {
        for reply in [
            "no json here",
            "{broken",
            r#"{"spending_insights": [], "smart_card_usage_advice": "x", "reward_optimization_tips": ["y"]}"#,
        ] {
            let generator = MockGenerator::with_reply(reply);
            let bundle = InsightSynthesizer::new(&generator)
                .synthesize(&SpendSummary::default(), &[], None)
                .await;
            assert_eq!(bundle.provenance, Provenance::Fallback, "reply: {}", reply);
        }
    }

    #[tokio::test]
    async fn test_analyze_report() {
        let client = GeneratorClient::Mock(MockGenerator::failing());
        let report = InsightSynthesizer::new(&client)
            .analyze(&transactions(), &[Card::named("Chase")], &RewardTable::default())
            .await;

        assert_eq!(report.total_spend, 210.0);
        assert_eq!(report.top_spending_categories.len(), 4);
        assert_eq!(report.top_spending_categories[0].category, "Food & Drink");
        assert_eq!(report.best_card.as_deref(), Some("Regions"));
        assert_eq!(report.potential_rewards.as_ref().map(|r| r.len()), Some(3));

        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("topSpendingCategories").is_some());
        assert!(json.get("smartCardUsageAdvice").is_some());
        assert_eq!(json["provenance"], "fallback");
    }
}
