//! Generation endpoint handler
//!
//! Builds a fresh metadata record per request, invokes the executor, and
//! serializes the response envelope. Raw provider error text never leaves
//! this boundary.

use super::AppState;
use crate::models::{GenerateRequest, GenerateResponse, GenerationMetadata};
use axum::{extract::State, http::StatusCode, response::Json};
use std::sync::Arc;
use tracing::debug;

/// Handle `POST /v1/generate`
pub async fn handle_generate(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GenerateRequest>,
) -> (StatusCode, Json<GenerateResponse>) {
    let mut meta = GenerationMetadata::new(request.mode, request.tools.clone());

    if request.prompt.trim().is_empty() {
        let err = crate::utils::GenError::terminal("prompt must not be empty");
        // No provider was contacted; respond without invoking the executor
        let mut envelope = GenerateResponse::from_failure(&err, &meta);
        envelope.error = Some("Prompt must not be empty.".to_string());
        return (StatusCode::BAD_REQUEST, Json(envelope));
    }

    let timeout_secs = request
        .timeout
        .unwrap_or(state.settings.fallback.attempt_timeout_secs);

    debug!(
        request_id = %meta.request_id,
        mode = %request.mode,
        timeout_secs,
        "handling generation request"
    );

    match state
        .executor
        .generate(
            &request.prompt,
            request.mode,
            &request.tools,
            &mut meta,
            timeout_secs,
        )
        .await
    {
        Ok(text) => (
            StatusCode::OK,
            Json(GenerateResponse::from_success(text, &meta)),
        ),
        Err(err) => (
            err.status_code(),
            Json(GenerateResponse::from_failure(&err, &meta)),
        ),
    }
}
