//! Hugging Face inference backend
//!
//! POSTs `{inputs, parameters}` to a hosted text-generation model and reads
//! `[{"generated_text": ...}]` back. Requests carry the API key as a bearer
//! token.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

use super::types::GenerationParams;
use super::TextGenerator;

#[derive(Clone)]
pub struct HuggingFaceBackend {
    http_client: Client,
    model_url: String,
    model: String,
    api_key: Option<String>,
}

impl HuggingFaceBackend {
    pub fn new(model_url: &str, api_key: Option<&str>) -> Self {
        let model_url = model_url.trim_end_matches('/').to_string();
        let model = model_url
            .split_once("/models/")
            .map(|(_, m)| m.to_string())
            .unwrap_or_else(|| model_url.clone());
        Self {
            http_client: Client::new(),
            model_url,
            model,
            api_key: api_key.map(String::from),
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    parameters: InferenceParameters,
}

#[derive(Debug, Serialize)]
struct InferenceParameters {
    max_new_tokens: u32,
    temperature: f32,
    return_full_text: bool,
}

#[derive(Debug, Deserialize)]
struct Generation {
    generated_text: String,
}

#[async_trait]
impl TextGenerator for HuggingFaceBackend {
    async fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| Error::Generator("HF_API_KEY is not configured".into()))?;

        let request = InferenceRequest {
            inputs: prompt,
            parameters: InferenceParameters {
                max_new_tokens: params.max_new_tokens,
                temperature: params.temperature,
                return_full_text: false,
            },
        };

        let response = self
            .http_client
            .post(&self.model_url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Generator(format!(
                "Inference API returned {}: {}",
                status, body
            )));
        }

        let generations: Vec<Generation> = response.json().await?;
        let text = generations
            .into_iter()
            .next()
            .map(|g| g.generated_text)
            .ok_or_else(|| Error::Generator("Inference API returned no generations".into()))?;

        debug!(model = %self.model, chars = text.len(), "Generation complete");
        Ok(text)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
