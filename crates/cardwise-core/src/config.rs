//! Runtime configuration
//!
//! Resolution order, lowest to highest precedence:
//! 1. Built-in defaults
//! 2. TOML file (`--config` path, else `<config dir>/cardwise/cardwise.toml`)
//! 3. Environment variables
//!
//! ```toml
//! access_tokens = ["access-sandbox-..."]
//!
//! [plaid]
//! client_id = "..."
//! secret = "..."
//! environment = "sandbox"
//!
//! [generator]
//! backend = "huggingface"
//! model_url = "https://router.huggingface.co/models/HuggingFaceH4/zephyr-7b-beta"
//! timeout_secs = 30
//!
//! [ingest]
//! lookback_days = 395
//! page_size = 500
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};

pub const DEFAULT_MODEL_URL: &str =
    "https://router.huggingface.co/models/HuggingFaceH4/zephyr-7b-beta";
pub const DEFAULT_GENERATOR_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LOOKBACK_DAYS: i64 = 395;
pub const DEFAULT_PAGE_SIZE: u32 = 500;

/// Longest ingestion window, in days
pub const MAX_LOOKBACK_DAYS: i64 = 730;
/// Largest page Plaid will return per `/transactions/get` call
pub const MAX_PAGE_SIZE: u32 = 500;

/// Plaid deployment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PlaidEnvironment {
    #[default]
    Sandbox,
    Development,
    Production,
}

impl PlaidEnvironment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sandbox => "sandbox",
            Self::Development => "development",
            Self::Production => "production",
        }
    }

    pub fn base_url(&self) -> &'static str {
        match self {
            Self::Sandbox => "https://sandbox.plaid.com",
            Self::Development => "https://development.plaid.com",
            Self::Production => "https://production.plaid.com",
        }
    }
}

impl std::str::FromStr for PlaidEnvironment {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sandbox" => Ok(Self::Sandbox),
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(format!("Unknown Plaid environment: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaidConfig {
    pub client_id: Option<String>,
    pub secret: Option<String>,
    pub environment: PlaidEnvironment,
}

impl PlaidConfig {
    pub fn is_configured(&self) -> bool {
        self.client_id.is_some() && self.secret.is_some()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GeneratorBackend {
    #[default]
    HuggingFace,
    Mock,
}

impl std::str::FromStr for GeneratorBackend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "huggingface" | "hf" => Ok(Self::HuggingFace),
            "mock" => Ok(Self::Mock),
            _ => Err(format!("Unknown generator backend: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    pub backend: GeneratorBackend,
    pub model_url: String,
    /// Bearer credential; absence is reported per call, not at startup
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            backend: GeneratorBackend::default(),
            model_url: DEFAULT_MODEL_URL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(DEFAULT_GENERATOR_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestConfig {
    pub lookback_days: i64,
    pub page_size: u32,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub plaid: PlaidConfig,
    pub generator: GeneratorConfig,
    pub ingest: IngestConfig,
    /// Credentials linked before startup
    pub access_tokens: Vec<String>,
}

impl Config {
    /// Defaults overlaid with the process environment
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Defaults, then the TOML file (if any), then the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();

        let path = path.map(Path::to_path_buf).or_else(|| {
            default_config_path().filter(|p| p.exists())
        });
        if let Some(path) = path {
            let content = fs::read_to_string(&path).map_err(|e| {
                Error::Config(format!("Failed to read {}: {}", path.display(), e))
            })?;
            config.apply_toml(&content)?;
            tracing::debug!(path = %path.display(), "Loaded config file");
        }

        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    fn apply_toml(&mut self, content: &str) -> Result<()> {
        let raw: RawConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

        if let Some(tokens) = raw.access_tokens {
            self.access_tokens = tokens;
        }

        if let Some(plaid) = raw.plaid {
            if let Some(id) = plaid.client_id {
                self.plaid.client_id = Some(id);
            }
            if let Some(secret) = plaid.secret {
                self.plaid.secret = Some(secret);
            }
            if let Some(env) = plaid.environment {
                self.plaid.environment = env.parse().map_err(Error::Config)?;
            }
        }

        if let Some(generator) = raw.generator {
            if let Some(backend) = generator.backend {
                self.generator.backend = backend.parse().map_err(Error::Config)?;
            }
            if let Some(url) = generator.model_url {
                self.generator.model_url = url;
            }
            if let Some(key) = generator.api_key {
                self.generator.api_key = Some(key);
            }
            if let Some(secs) = generator.timeout_secs {
                self.generator.timeout = Duration::from_secs(secs);
            }
        }

        if let Some(ingest) = raw.ingest {
            if let Some(days) = ingest.lookback_days {
                self.ingest.lookback_days = check_lookback_days(days)?;
            }
            if let Some(size) = ingest.page_size {
                if !(1..=MAX_PAGE_SIZE).contains(&size) {
                    return Err(Error::Config(format!(
                        "page_size must be between 1 and {}, got {}",
                        MAX_PAGE_SIZE, size
                    )));
                }
                self.ingest.page_size = size;
            }
        }

        Ok(())
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<()> {
        let var = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        if let Some(id) = var("PLAID_CLIENT_ID") {
            self.plaid.client_id = Some(id);
        }
        if let Some(secret) = var("PLAID_SECRET").or_else(|| var("PLAID_SANDBOX_SECRET")) {
            self.plaid.secret = Some(secret);
        }
        if let Some(env) = var("PLAID_ENV") {
            self.plaid.environment = env.parse().map_err(Error::Config)?;
        }

        if let Some(backend) = var("GENERATOR_BACKEND") {
            self.generator.backend = backend.parse().map_err(Error::Config)?;
        }
        if let Some(key) = var("HF_API_KEY") {
            self.generator.api_key = Some(key);
        }
        if let Some(url) = var("HF_MODEL_URL") {
            self.generator.model_url = url;
        }
        if let Some(secs) = var("CARDWISE_GENERATOR_TIMEOUT_SECS") {
            let secs: u64 = secs.parse().map_err(|_| {
                Error::Config(format!("Invalid CARDWISE_GENERATOR_TIMEOUT_SECS: {}", secs))
            })?;
            self.generator.timeout = Duration::from_secs(secs);
        }

        if let Some(days) = var("CARDWISE_LOOKBACK_DAYS") {
            let days = days
                .parse()
                .map_err(|_| Error::Config(format!("Invalid CARDWISE_LOOKBACK_DAYS: {}", days)))?;
            self.ingest.lookback_days = check_lookback_days(days)?;
        }
        if let Some(tokens) = var("CARDWISE_ACCESS_TOKENS") {
            self.access_tokens = tokens
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(String::from)
                .collect();
        }

        Ok(())
    }
}

fn check_lookback_days(days: i64) -> Result<i64> {
    if (1..=MAX_LOOKBACK_DAYS).contains(&days) {
        Ok(days)
    } else {
        Err(Error::Config(format!(
            "lookback_days must be between 1 and {}, got {}",
            MAX_LOOKBACK_DAYS, days
        )))
    }
}

/// Default config file location
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("cardwise").join("cardwise.toml"))
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    access_tokens: Option<Vec<String>>,
    plaid: Option<RawPlaid>,
    generator: Option<RawGenerator>,
    ingest: Option<RawIngest>,
}

#[derive(Debug, Deserialize)]
struct RawPlaid {
    client_id: Option<String>,
    secret: Option<String>,
    environment: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawGenerator {
    backend: Option<String>,
    model_url: Option<String>,
    api_key: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RawIngest {
    lookback_days: Option<i64>,
    page_size: Option<u32>,
}
