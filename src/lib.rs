//! AI Fallback Executor Library
//!
//! Deterministic, observable fallback across interchangeable text
//! generation providers: attempt each configured provider in order until
//! one succeeds, recording every attempt along the way.

pub mod config;
pub mod handlers;
pub mod models;
pub mod providers;
pub mod services;
pub mod utils;

// Re-export common types
pub use config::{EndpointsConfig, Settings};
pub use handlers::{create_router, AppState};
pub use models::{GenerationMetadata, Mode, ProviderAttempt};
pub use providers::{AdapterReply, AdapterRequest, ProviderAdapter, ProviderRegistry};
pub use services::FallbackExecutor;
pub use utils::{GenError, GenResult};

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Library description
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Get version information
pub fn version_info() -> String {
    format!("{} v{} - {}", NAME, VERSION, DESCRIPTION)
}
