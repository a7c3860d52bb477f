//! Status and quick lookup commands (status, classify, risk)

use std::path::Path;

use anyhow::{bail, Result};

use cardwise_core::config::default_config_path;
use cardwise_core::{assess_risk, classify, Config};

pub fn cmd_status(config: &Config, config_path: Option<&Path>) -> Result<()> {
    println!();
    println!("📊 Cardwise Status");
    println!("   ─────────────────────────────────────────────────────────────");

    match config_path.map(Path::to_path_buf).or_else(default_config_path) {
        Some(path) if path.exists() => println!("   Config: {}", path.display()),
        Some(path) => println!("   Config: {} (not found, using defaults)", path.display()),
        None => println!("   Config: (no config directory)"),
    }

    println!();
    if config.plaid.is_configured() {
        println!("   ✅ Plaid: {}", config.plaid.environment.as_str());
    } else {
        println!("   ⚠️  Plaid: not configured (sample data)");
        println!("      Set PLAID_CLIENT_ID and PLAID_SECRET to link real accounts");
    }
    println!("   Linked credentials: {}", config.access_tokens.len());
    println!("   Lookback: {} days", config.ingest.lookback_days);

    println!();
    println!("   Text generator: {:?}", config.generator.backend);
    println!("   Model: {}", config.generator.model_url);
    if config.generator.api_key.is_some() {
        println!("   🔒 API key: set");
    } else {
        println!("   ⚠️  API key: not set (advice will use built-in text)");
    }
    println!("   Timeout: {}s", config.generator.timeout.as_secs());

    println!();
    Ok(())
}

pub fn cmd_classify(category: &str, merchant: &str) -> Result<()> {
    let raw = Some(category).filter(|c| !c.trim().is_empty());
    let result = classify(raw, merchant);
    println!("{} ({})", result.label, result.key);
    Ok(())
}

pub fn cmd_risk(utilization: f64, missed: u32) -> Result<()> {
    if !utilization.is_finite() || utilization < 0.0 {
        bail!("Utilization must be a non-negative percentage");
    }

    let risk = assess_risk(utilization, missed);
    println!("Risk: {} (score {}/100)", risk.level, risk.score);
    Ok(())
}
