//! Cardwise CLI - Credit card spending analytics
//!
//! Usage:
//!   cardwise analyze --file tx.csv --card Chase   Analyze spending
//!   cardwise simulate --principal 1000 --rate 24 --payment 50
//!   cardwise serve --port 3000                    Start web server

mod cli;
mod commands;


use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cardwise_core::Config;
use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Commands::Serve {
            port,
            host,
            allowed_origins,
        } => commands::cmd_serve(config, &host, port, allowed_origins).await,
        Commands::Simulate {
            principal,
            rate,
            payment,
            schedule,
            json,
        } => commands::cmd_simulate(principal, rate, payment, schedule, json),
        Commands::Analyze { file, cards, json } => {
            commands::cmd_analyze(&config, file.as_deref(), &cards, json).await
        }
        Commands::Classify { category, merchant } => commands::cmd_classify(&category, &merchant),
        Commands::Risk {
            utilization,
            missed,
        } => commands::cmd_risk(utilization, missed),
        Commands::Status => commands::cmd_status(&config, cli.config.as_deref()),
    }
}
