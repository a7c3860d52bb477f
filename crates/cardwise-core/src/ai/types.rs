//! Types shared by generator backends

use serde::{Deserialize, Serialize};

/// Sampling parameters sent with every generation request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub max_new_tokens: u32,
    pub temperature: f32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_new_tokens: 1000,
            temperature: 0.3,
        }
    }
}

/// Structured advice expected back from the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdviceReply {
    pub spending_insights: Vec<String>,
    pub smart_card_usage_advice: String,
    pub reward_optimization_tips: Vec<String>,
}
