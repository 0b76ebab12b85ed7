//! File-based provider endpoint configuration
//!
//! Loads provider endpoint definitions from a JSON file. Each entry maps
//! a provider name to the connection details its adapter needs.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

/// Provider endpoint configuration loaded from JSON file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointsConfig {
    /// Endpoint definitions by provider name
    pub providers: HashMap<String, EndpointConfig>,
}

/// Connection details for one provider endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Base URL for the provider API
    #[serde(rename = "baseUrl")]
    pub base_url: String,

    /// API key (can be empty if the endpoint needs none)
    #[serde(rename = "apiKey", default)]
    pub api_key: String,

    /// Model served by this endpoint
    pub model: String,

    /// Default request timeout in seconds
    #[serde(rename = "timeoutSecs", default = "default_timeout")]
    pub timeout_secs: u64,

    /// Price per 1000 tokens, used for cost estimates
    #[serde(rename = "costPerKiloTokens", skip_serializing_if = "Option::is_none")]
    pub cost_per_kilo_tokens: Option<f64>,
}

fn default_timeout() -> u64 {
    30
}

impl EndpointsConfig {
    /// Load configuration from JSON file
    pub fn load(path: &Path) -> Result<Self> {
        info!("Loading provider endpoints from: {:?}", path);

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read endpoints file: {:?}", path))?;

        let config: EndpointsConfig =
            serde_json::from_str(&content).context("Failed to parse endpoints JSON")?;

        config.validate()?;

        debug!("Loaded {} provider endpoints", config.providers.len());
        Ok(config)
    }

    /// Load configuration from default locations
    /// Searches in order:
    /// 1. ~/.config/aifallback/aifallback.json
    /// 2. ./aifallback.json
    ///
    /// Returns error if no configuration file is found.
    pub fn load_default() -> Result<Self> {
        if let Some(home) = dirs::home_dir() {
            let config_path = home.join(".config").join("aifallback").join("aifallback.json");
            if config_path.exists() {
                return Self::load(&config_path);
            }
        }

        let local_path = Path::new("aifallback.json");
        if local_path.exists() {
            return Self::load(local_path);
        }

        anyhow::bail!(
            "Provider endpoints file not found. Please create one at:\n\
             - ~/.config/aifallback/aifallback.json (recommended)\n\
             - ./aifallback.json (current directory)\n\
             \n\
             See aifallback.example.json for reference."
        )
    }

    /// Validate configuration
    fn validate(&self) -> Result<()> {
        if self.providers.is_empty() {
            anyhow::bail!("At least one provider endpoint must be configured");
        }

        for (name, endpoint) in &self.providers {
            if !endpoint.base_url.starts_with("http") {
                anyhow::bail!("Invalid base URL for provider '{}': {}", name, endpoint.base_url);
            }

            if endpoint.model.is_empty() {
                anyhow::bail!("Provider '{}' must configure a model", name);
            }

            if endpoint.timeout_secs == 0 {
                anyhow::bail!("Timeout for provider '{}' cannot be 0", name);
            }

            if let Some(price) = endpoint.cost_per_kilo_tokens {
                if price < 0.0 {
                    anyhow::bail!("Negative token price for provider '{}'", name);
                }
            }
        }

        Ok(())
    }
}
