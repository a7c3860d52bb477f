//! Pluggable text-generation backend
//!
//! # Architecture
//!
//! - `TextGenerator` trait: one prompt in, raw text out
//! - `GeneratorClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `HuggingFaceBackend`, `MockGenerator`
//!
//! Backends only transport text. Interpreting the reply (see [`parsing`]) and
//! falling back on failure is the synthesizer's job.
//!
//! # Configuration
//!
//! Environment variables (see [`crate::config`]):
//! - `GENERATOR_BACKEND`: `huggingface` (default) or `mock`
//! - `HF_API_KEY`: bearer credential for the inference endpoint
//! - `HF_MODEL_URL`: inference endpoint (default: zephyr-7b-beta)

mod huggingface;
mod mock;
pub mod parsing;
pub mod types;

pub use huggingface::HuggingFaceBackend;
pub use mock::MockGenerator;
pub use types::*;

use async_trait::async_trait;

use crate::config::{GeneratorBackend, GeneratorConfig};
use crate::error::Result;

/// Trait implemented by every text-generation backend
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a completion for `prompt`. Only the generated text is
    /// returned, never the echoed prompt.
    async fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<String>;

    /// Model identifier (for logging)
    fn model(&self) -> &str;
}

/// Concrete generator client enum
#[derive(Clone)]
pub enum GeneratorClient {
    HuggingFace(HuggingFaceBackend),
    Mock(MockGenerator),
}

impl GeneratorClient {
    pub fn from_config(config: &GeneratorConfig) -> Self {
        match config.backend {
            GeneratorBackend::HuggingFace => GeneratorClient::HuggingFace(
                HuggingFaceBackend::new(&config.model_url, config.api_key.as_deref()),
            ),
            GeneratorBackend::Mock => GeneratorClient::Mock(MockGenerator::new()),
        }
    }

    /// Create a mock generator for testing
    pub fn mock() -> Self {
        GeneratorClient::Mock(MockGenerator::new())
    }
}

#[async_trait]
impl TextGenerator for GeneratorClient {
    async fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<String> {
        match self {
            GeneratorClient::HuggingFace(b) => b.generate(prompt, params).await,
            GeneratorClient::Mock(b) => b.generate(prompt, params).await,
        }
    }

    fn model(&self) -> &str {
        match self {
            GeneratorClient::HuggingFace(b) => b.model(),
            GeneratorClient::Mock(b) => b.model(),
        }
    }
}
