//! Health check handlers

use super::AppState;
use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::{json, Value};
use std::sync::Arc;

/// Health check with service details
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": crate::NAME,
        "version": crate::VERSION,
        "providers": state.executor.provider_count(),
        "fallback_enabled": state.executor.fallback_enabled(),
    }))
}

/// Liveness probe
pub async fn liveness_check() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}
