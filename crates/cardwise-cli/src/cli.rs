//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

/// Cardwise - See where your card spend goes
#[derive(Parser)]
#[command(name = "cardwise")]
#[command(about = "Credit card spending analytics and payoff simulation", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to <config dir>/cardwise/cardwise.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Allowed CORS origin (repeatable)
        #[arg(long = "allow-origin")]
        allowed_origins: Vec<String>,
    },

    /// Simulate paying off a balance with a fixed monthly payment
    Simulate {
        /// Starting balance
        #[arg(long)]
        principal: Decimal,

        /// Annual rate in percent (24 means 24% APR)
        #[arg(long)]
        rate: Decimal,

        /// Fixed monthly payment
        #[arg(long)]
        payment: Decimal,

        /// Print the month-by-month schedule
        #[arg(long)]
        schedule: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Analyze spending and generate advice
    Analyze {
        /// Transactions file (CSV or JSON); linked accounts are fetched when omitted
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Card you hold (repeatable)
        #[arg(short, long = "card")]
        cards: Vec<String>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Classify a raw category and merchant
    Classify {
        /// Raw provider category (e.g. FOOD_AND_DRINK)
        category: String,

        /// Merchant name
        #[arg(default_value = "")]
        merchant: String,
    },

    /// Score credit risk
    Risk {
        /// Credit utilization in percent
        #[arg(short, long)]
        utilization: f64,

        /// Number of missed payments
        #[arg(short, long, default_value = "0")]
        missed: u32,
    },

    /// Show configuration status
    Status,
}
