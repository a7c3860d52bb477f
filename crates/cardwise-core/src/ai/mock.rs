//! Mock generator for testing
//!
//! Useful for unit tests and development without network access.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::types::GenerationParams;
use super::TextGenerator;

const DEFAULT_REPLY: &str = r#"{"spending_insights": ["Most of your spend is concentrated in your top category."], "smart_card_usage_advice": "Route your top category through the card with the highest rate for it.", "reward_optimization_tips": ["Pay your full balance every month."]}"#;

#[derive(Clone)]
enum Behavior {
    Reply(String),
    Fail,
    Delay(Duration, String),
}

/// Mock generator
///
/// Returns a fixed reply, always fails, or replies after a delay. Counts
/// calls so tests can assert on request volume.
#[derive(Clone)]
pub struct MockGenerator {
    behavior: Behavior,
    calls: Arc<AtomicUsize>,
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGenerator {
    /// A generator returning a well-formed advice reply
    pub fn new() -> Self {
        Self::with_reply(DEFAULT_REPLY)
    }

    pub fn with_reply(reply: &str) -> Self {
        Self {
            behavior: Behavior::Reply(reply.to_string()),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A generator whose every call fails
    pub fn failing() -> Self {
        Self {
            behavior: Behavior::Fail,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A generator that replies only after `delay`
    pub fn slow(delay: Duration) -> Self {
        Self {
            behavior: Behavior::Delay(delay, DEFAULT_REPLY.to_string()),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(&self, _prompt: &str, _params: &GenerationParams) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            Behavior::Reply(reply) => Ok(reply.clone()),
            Behavior::Fail => Err(Error::Generator("mock generator failure".into())),
            Behavior::Delay(delay, reply) => {
                tokio::time::sleep(*delay).await;
                Ok(reply.clone())
            }
        }
    }

    fn model(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::parsing::parse_advice;

    #[tokio::test]
    async fn test_default_reply_is_valid_advice() {
        let mock = MockGenerator::new();
        let reply = mock
            .generate("anything", &GenerationParams::default())
            .await
            .unwrap();
        assert!(parse_advice(&reply).is_ok());
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_failing() {
        let mock = MockGenerator::failing();
        let result = mock.generate("x", &GenerationParams::default()).await;
        assert!(matches!(result, Err(Error::Generator(_))));
        assert_eq!(mock.call_count(), 1);
    }
}
