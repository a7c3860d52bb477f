//! Server command implementation

use anyhow::{Context, Result};

use cardwise_core::Config;
use cardwise_server::ServerConfig;

pub async fn cmd_serve(
    config: Config,
    host: &str,
    port: u16,
    allowed_origins: Vec<String>,
) -> Result<()> {
    println!("🚀 Starting Cardwise web server...");
    println!("   Listening: http://{}:{}", host, port);
    println!("   Plaid: {}", config.plaid.environment.as_str());
    if !config.plaid.is_configured() {
        println!("   ⚠️  Plaid credentials not set - serving sample account data");
    }
    if !allowed_origins.is_empty() {
        println!("   CORS origins: {}", allowed_origins.join(", "));
    }
    println!();

    cardwise_server::serve_with_config(config, host, port, ServerConfig { allowed_origins })
        .await
        .context("Server error")
}
