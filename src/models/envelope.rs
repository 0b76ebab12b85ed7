//! HTTP boundary types
//!
//! Request body and response envelope for the generation endpoint. The
//! envelope exposes the full metadata record alongside the generated text;
//! failure envelopes carry only a generic user-facing message, never raw
//! provider error text.

use crate::models::{ErrorCategory, GenerationMetadata, Mode, ProviderAttempt};
use crate::utils::GenError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Body of `POST /v1/generate`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// The prompt to generate from
    pub prompt: String,
    /// Execution mode (defaults to direct)
    #[serde(default)]
    pub mode: Mode,
    /// Tool names available for this request
    #[serde(default)]
    pub tools: Vec<String>,
    /// Per-attempt timeout in seconds; server default when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

/// Response envelope for the generation endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// Whether generation succeeded
    pub success: bool,
    /// Generated text, present on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Request identifier for log correlation
    pub request_id: Uuid,
    /// Echo of the execution mode
    pub mode: Mode,
    /// Echo of the tool list
    pub tools_used: Vec<String>,
    /// Winning provider on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    /// Winning model on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Latency of the winning attempt
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    /// True iff more than one attempt was made
    pub fallback_used: bool,
    /// Why fallback occurred, when it did
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
    /// Generic user-facing error message on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Machine-readable failure classification
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_category: Option<ErrorCategory>,
    /// Machine-readable failure code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    /// Full ordered attempt history
    pub provider_attempts: Vec<ProviderAttempt>,
}

impl GenerateResponse {
    /// Build the success envelope from the populated metadata
    pub fn from_success(text: String, meta: &GenerationMetadata) -> Self {
        Self {
            success: true,
            text: Some(text),
            request_id: meta.request_id,
            mode: meta.mode,
            tools_used: meta.tools_used.clone(),
            provider: meta.provider.clone(),
            model: meta.model.clone(),
            latency_ms: meta.latency_ms,
            fallback_used: meta.fallback_used,
            fallback_reason: meta.fallback_reason.clone(),
            error: None,
            error_category: None,
            error_code: None,
            provider_attempts: meta.provider_attempts.clone(),
        }
    }

    /// Build the failure envelope; the error message is the generic
    /// non-leaking one, the category/code stay machine-readable
    pub fn from_failure(err: &GenError, meta: &GenerationMetadata) -> Self {
        Self {
            success: false,
            text: None,
            request_id: meta.request_id,
            mode: meta.mode,
            tools_used: meta.tools_used.clone(),
            provider: None,
            model: None,
            latency_ms: None,
            fallback_used: meta.fallback_used,
            fallback_reason: meta.fallback_reason.clone(),
            error: Some(err.user_message().to_string()),
            error_category: Some(err.category()),
            error_code: Some(err.code().to_string()),
            provider_attempts: meta.provider_attempts.clone(),
        }
    }
}
