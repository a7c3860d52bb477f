//! Insight synthesis
//!
//! Computes nothing itself: the aggregator supplies the figures, the reward
//! estimator the best card, and a text generator phrases the advice. When
//! generation fails the bundle is built from fixed templates instead.
//!
//! ```rust,ignore
//! let generator = GeneratorClient::from_config(&config.generator);
//! let report = InsightSynthesizer::new(&generator)
//!     .with_timeout(config.generator.timeout)
//!     .analyze(&transactions, &cards, &RewardTable::default())
//!     .await;
//! ```

mod fallback;
pub mod prompt;
mod synthesizer;
pub mod types;

pub use fallback::fallback_bundle;
pub use synthesizer::InsightSynthesizer;
pub use types::{AnalysisReport, InsightBundle, Provenance};
