//! Application configuration settings
//!
//! Defines all environment-driven configuration and loading logic.
//! Provider chains are configuration data, never hard-coded enumerations,
//! so operators can reorder or shrink them without code changes.

use crate::models::Mode;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Server configuration
    pub server: ServerConfig,
    /// Fallback executor configuration
    pub fallback: FallbackConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen host
    pub host: String,
    /// Listen port
    pub port: u16,
}

/// Fallback executor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackConfig {
    /// Feature flag: when false, only the default provider is called
    /// directly (staged rollout / instant rollback)
    pub enabled: bool,
    /// Provider used when fallback is disabled
    pub default_provider: String,
    /// Per-mode ordered provider chains
    pub chains: ChainConfig,
    /// Delay after a 429 before trying the next provider
    pub rate_limit_delay_ms: u64,
    /// Per-attempt timeout used when a request does not specify one
    pub attempt_timeout_secs: u64,
}

/// Ordered provider-name lists, one per execution mode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Chain for direct mode
    pub direct: Vec<String>,
    /// Chain for research mode
    pub research: Vec<String>,
    /// Chain for code-generation mode
    pub code_generation: Vec<String>,
    /// Chain used when a mode has no chain of its own
    pub default: Vec<String>,
}

impl ChainConfig {
    /// Get the configured chain for a mode, falling back to the default
    /// list when the mode has none
    pub fn for_mode(&self, mode: Mode) -> &[String] {
        let chain = match mode {
            Mode::Direct => &self.direct,
            Mode::Research => &self.research,
            Mode::CodeGeneration => &self.code_generation,
        };
        if chain.is_empty() {
            &self.default
        } else {
            chain
        }
    }

    /// Parse a comma-separated chain, trimming whitespace and dropping
    /// empty segments
    pub fn parse_chain(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect()
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    pub level: String,
    /// Log format (text/json)
    pub format: String,
}

impl Settings {
    /// Create a new configuration instance from the environment
    pub fn new() -> Result<Self> {
        // Load .env file if it exists
        dotenv::dotenv().ok();

        let settings = Self {
            server: ServerConfig {
                host: get_env_or_default("SERVER_HOST", "127.0.0.1"),
                port: get_env_or_default("SERVER_PORT", "8083")
                    .parse()
                    .context("Invalid port number")?,
            },
            fallback: FallbackConfig {
                enabled: get_env_or_default("FALLBACK_ENABLED", "true")
                    .parse()
                    .context("Invalid fallback enabled flag")?,
                default_provider: get_env_or_default("FALLBACK_DEFAULT_PROVIDER", "openai"),
                chains: ChainConfig {
                    direct: ChainConfig::parse_chain(&get_env_or_default(
                        "FALLBACK_CHAIN_DIRECT",
                        "",
                    )),
                    research: ChainConfig::parse_chain(&get_env_or_default(
                        "FALLBACK_CHAIN_RESEARCH",
                        "",
                    )),
                    code_generation: ChainConfig::parse_chain(&get_env_or_default(
                        "FALLBACK_CHAIN_CODE_GENERATION",
                        "",
                    )),
                    default: ChainConfig::parse_chain(&get_env_or_default(
                        "FALLBACK_CHAIN_DEFAULT",
                        "openai",
                    )),
                },
                rate_limit_delay_ms: get_env_or_default("FALLBACK_RATE_LIMIT_DELAY_MS", "250")
                    .parse()
                    .context("Invalid rate-limit delay")?,
                attempt_timeout_secs: get_env_or_default("FALLBACK_ATTEMPT_TIMEOUT", "30")
                    .parse()
                    .context("Invalid attempt timeout")?,
            },
            logging: LoggingConfig {
                level: get_env_or_default("RUST_LOG", "info"),
                format: get_env_or_default("LOG_FORMAT", "text"),
            },
        };

        // Validate configuration
        settings.validate()?;

        Ok(settings)
    }

    /// Validate configuration validity
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("Port number cannot be 0");
        }

        if self.fallback.chains.default.is_empty() {
            anyhow::bail!("Default provider chain cannot be empty");
        }

        if self.fallback.default_provider.is_empty() {
            anyhow::bail!("Default provider cannot be empty");
        }

        if self.fallback.attempt_timeout_secs == 0 {
            anyhow::bail!("Attempt timeout cannot be 0");
        }

        // A rate-limit delay is a courtesy pause, not a backoff schedule
        if self.fallback.rate_limit_delay_ms > 10_000 {
            anyhow::bail!("Rate-limit delay cannot exceed 10 seconds");
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            anyhow::bail!("Invalid log level: {}", self.logging.level);
        }

        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            anyhow::bail!("Invalid log format: {}", self.logging.format);
        }

        Ok(())
    }
}

/// Get environment variable or default value
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_settings() -> Settings {
        Settings {
            server: ServerConfig {
                host: "localhost".to_string(),
                port: 8083,
            },
            fallback: FallbackConfig {
                enabled: true,
                default_provider: "openai".to_string(),
                chains: ChainConfig {
                    direct: vec!["openai".to_string(), "backup".to_string()],
                    research: vec![],
                    code_generation: vec!["coder".to_string()],
                    default: vec!["openai".to_string()],
                },
                rate_limit_delay_ms: 250,
                attempt_timeout_secs: 30,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "text".to_string(),
            },
        }
    }

    #[test]
    fn test_parse_chain() {
        assert_eq!(
            ChainConfig::parse_chain("a, b ,c"),
            vec!["a".to_string(), "b".to_string(), "c".to_string()]
        );
        assert_eq!(ChainConfig::parse_chain(""), Vec::<String>::new());
        assert_eq!(ChainConfig::parse_chain(" , ,"), Vec::<String>::new());
    }

    #[test]
    fn test_for_mode_falls_back_to_default() {
        let settings = test_settings();
        let chains = &settings.fallback.chains;

        assert_eq!(chains.for_mode(Mode::Direct), &["openai", "backup"]);
        assert_eq!(chains.for_mode(Mode::CodeGeneration), &["coder"]);
        // Research has no chain, so the default applies
        assert_eq!(chains.for_mode(Mode::Research), &["openai"]);
    }

    #[test]
    fn test_validate_rejects_empty_default_chain() {
        let mut settings = test_settings();
        settings.fallback.chains.default.clear();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_excessive_delay() {
        let mut settings = test_settings();
        settings.fallback.rate_limit_delay_ms = 60_000;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_ok() {
        assert!(test_settings().validate().is_ok());
    }
}
