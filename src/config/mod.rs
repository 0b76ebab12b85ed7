//! Configuration management module
//!
//! Environment-driven settings plus the JSON provider endpoints file

pub mod endpoints;
pub mod settings;

pub use endpoints::{EndpointConfig, EndpointsConfig};
pub use settings::{ChainConfig, FallbackConfig, LoggingConfig, ServerConfig, Settings};
