//! Cardwise Core Library
//!
//! Spending analytics for linked credit cards:
//! - Rule-based category classification
//! - Spend aggregation and ranking
//! - Fixed-payment amortization with divergence detection
//! - Multi-credential transaction ingestion (Plaid)
//! - Generated spending advice with deterministic fallback
//! - Reward estimation and credit risk heuristics

pub mod ai;
pub mod amortization;
pub mod classify;
pub mod config;
pub mod credentials;
pub mod error;
pub mod import;
pub mod ingest;
pub mod insights;
pub mod models;
pub mod provider;
pub mod rewards;
pub mod risk;
pub mod spending;

/// Test utilities including mock inference and Plaid servers
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use ai::{
    AdviceReply, GenerationParams, GeneratorClient, HuggingFaceBackend, MockGenerator,
    TextGenerator,
};
pub use amortization::{
    simulate, AmortizationOutcome, AmortizationReport, AmortizationRequest, PayoffStatus,
    Schedule,
};
pub use classify::classify;
pub use config::Config;
pub use credentials::{AccessToken, CredentialStore, InMemoryCredentialStore};
pub use error::{Error, Result};
pub use import::load_transactions;
pub use ingest::IngestionGateway;
pub use insights::{AnalysisReport, InsightBundle, InsightSynthesizer, Provenance};
pub use models::{Account, Card, Category, CategoryKey, Transaction};
pub use provider::{AccountProvider, MockProvider, PlaidProvider, ProviderClient};
pub use rewards::{estimate_rewards, RewardEstimate, RewardTable};
pub use risk::{assess_risk, CardPortfolio, RiskAssessment, RiskLevel};
pub use spending::{aggregate, CategorySpend, SpendSummary};
