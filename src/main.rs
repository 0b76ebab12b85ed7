//! AI Fallback Executor Server
//!
//! HTTP service exposing a deterministic multi-provider fallback executor
//! for text generation requests

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

mod config;
mod handlers;
mod models;
mod providers;
mod services;
mod utils;

use config::{EndpointsConfig, Settings};
use handlers::create_router;
use providers::ProviderRegistry;

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    init_logging();

    // Load settings from environment (.env supported)
    let settings = Settings::new().context("Failed to load settings")?;
    info!("Settings loaded");

    // Load provider endpoints from JSON file (required)
    let endpoints = EndpointsConfig::load_default()
        .context("Failed to load provider endpoints")?;
    info!("📁 Provider endpoints loaded");

    // Build the registry once at startup; the executor borrows it by Arc
    let registry = Arc::new(
        ProviderRegistry::from_endpoints(&endpoints)
            .context("Failed to build provider registry")?,
    );

    // Create router
    let app = create_router(settings.clone(), registry)?;

    let addr = format!("{}:{}", settings.server.host, settings.server.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("🚀 AI fallback server started!");
    info!("📝 Health check: http://{}/health", addr);
    info!("🔄 Generation endpoint: http://{}/v1/generate", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to start server: {}", e))?;

    Ok(())
}

/// Initialize logging system
fn init_logging() {
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::new(log_level);

    if log_format == "json" {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
