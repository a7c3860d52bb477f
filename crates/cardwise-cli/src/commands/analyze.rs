//! Spending analysis command

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use cardwise_core::{
    load_transactions, AccessToken, AnalysisReport, Card, Config, GeneratorClient,
    IngestionGateway, InsightSynthesizer, Provenance, ProviderClient, RewardTable, Transaction,
};

use cardwise_core::provider::SAMPLE_ACCESS_TOKEN;

use super::truncate;

pub async fn cmd_analyze(
    config: &Config,
    file: Option<&Path>,
    cards: &[String],
    json: bool,
) -> Result<()> {
    let report = build_report(config, file, cards).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_report(&report);
    Ok(())
}

/// Load or fetch transactions, then run the analysis pipeline
pub async fn build_report(
    config: &Config,
    file: Option<&Path>,
    cards: &[String],
) -> Result<AnalysisReport> {
    let transactions = match file {
        Some(path) => load_transactions(path)
            .with_context(|| format!("Failed to read transactions from {}", path.display()))?,
        None => fetch_linked(config).await,
    };
    info!("Analyzing {} transactions", transactions.len());

    let cards: Vec<Card> = cards.iter().map(|name| Card::named(name)).collect();
    let generator = GeneratorClient::from_config(&config.generator);

    Ok(InsightSynthesizer::new(&generator)
        .with_timeout(config.generator.timeout)
        .analyze(&transactions, &cards, &RewardTable::default())
        .await)
}

async fn fetch_linked(config: &Config) -> Vec<Transaction> {
    let provider = ProviderClient::from_config(&config.plaid, &config.ingest);
    let mut tokens: Vec<AccessToken> = config.access_tokens.iter().map(AccessToken::new).collect();
    if tokens.is_empty() && matches!(provider, ProviderClient::Mock(_)) {
        tokens.push(AccessToken::new(SAMPLE_ACCESS_TOKEN));
    }

    IngestionGateway::new(&provider, &config.ingest)
        .fetch_all(&tokens)
        .await
}

fn print_report(report: &AnalysisReport) {
    println!();
    println!("📊 Spending Analysis");
    println!("   ─────────────────────────────────────────────");
    println!("   Total spend: {:.2}", report.total_spend);

    if report.top_spending_categories.is_empty() {
        println!("   No spending found.");
    } else {
        println!();
        for cat in &report.top_spending_categories {
            println!(
                "   {:<24} {:>10.2}  {:>3}%",
                truncate(&cat.category, 24),
                cat.amount,
                cat.percentage
            );
        }
    }

    println!();
    println!("💡 Insights");
    for insight in &report.spending_insights {
        println!("   • {}", insight);
    }

    println!();
    println!("💳 Card usage");
    println!("   {}", report.smart_card_usage_advice);

    if let Some(rewards) = &report.potential_rewards {
        println!();
        println!("🎁 Estimated rewards");
        for (card, reward) in rewards {
            let marker = if report.best_card.as_deref() == Some(card.as_str()) {
                " ⭐"
            } else {
                ""
            };
            println!("   {:<24} {:>10.2}{}", truncate(card, 24), reward, marker);
        }
    }

    if !report.reward_optimization_tips.is_empty() {
        println!();
        println!("✨ Tips");
        for tip in &report.reward_optimization_tips {
            println!("   • {}", tip);
        }
    }

    if report.provenance == Provenance::Fallback {
        println!();
        println!("   ℹ️  Text generator unavailable; showing built-in advice");
    }
    println!();
}
