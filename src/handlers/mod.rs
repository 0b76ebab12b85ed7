//! HTTP handlers module
//!
//! Contains all HTTP endpoint handling logic

pub mod generate;
pub mod health;

use crate::config::Settings;
use crate::providers::ProviderRegistry;
use crate::services::FallbackExecutor;
use anyhow::Result;
use axum::{routing::get, routing::post, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Application state
pub struct AppState {
    pub settings: Settings,
    pub executor: FallbackExecutor,
}

/// Create application router
pub fn create_router(settings: Settings, registry: Arc<ProviderRegistry>) -> Result<Router> {
    let executor = FallbackExecutor::new(registry, settings.fallback.clone());

    let app_state = Arc::new(AppState { settings, executor });

    let middleware_stack = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    let router = Router::new()
        .route("/v1/generate", post(generate::handle_generate))
        .route("/health", get(health::health_check))
        .route("/health/live", get(health::liveness_check))
        .with_state(app_state)
        .layer(middleware_stack);

    Ok(router)
}
