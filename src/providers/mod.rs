//! Provider module
//!
//! Defines the adapter contract every backend client must satisfy, the
//! registry the executor resolves names against, and the reference
//! OpenAI-compatible adapter.

pub mod openai;
pub mod registry;

use crate::utils::{GenError, GenResult};
use async_trait::async_trait;

/// Request payload handed to an adapter for one attempt
///
/// The executor clones one immutable base per call, so every provider in
/// a chain receives a byte-identical prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterRequest {
    /// The prompt to generate from
    pub prompt: String,
    /// Tool names available for this request
    pub tools: Vec<String>,
    /// Per-attempt timeout in seconds
    pub timeout_secs: u64,
}

/// Raw value an adapter returns on success
///
/// The executor inspects this defensively before trusting it (see the
/// contract-violation detector); `error` and `finish_reason` exist so a
/// misbehaving adapter's error-shaped "success" can be caught.
#[derive(Debug, Clone, Default)]
pub struct AdapterReply {
    /// Generated text
    pub text: String,
    /// Model identifier that produced the text
    pub model: String,
    /// Prompt tokens consumed, if reported
    pub tokens_in: Option<u32>,
    /// Completion tokens produced, if reported
    pub tokens_out: Option<u32>,
    /// Estimated cost in USD, if computable
    pub cost_usd_est: Option<f64>,
    /// Upstream completion reason, if reported
    pub finish_reason: Option<String>,
    /// Explicit error field; a conforming adapter never sets this
    pub error: Option<String>,
}

/// Contract every backend client must implement
///
/// Adapters classify content-policy refusals before any HTTP-status
/// mapping, map rate limiting to code "429" and 5xx to the status code,
/// map internal timeouts to the timeout kind, and perform no internal
/// retries: retry/backoff policy belongs exclusively to the executor.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Get the provider name
    fn name(&self) -> &str;

    /// Generate text from a prompt, or return one of the taxonomy kinds
    async fn generate(&self, request: AdapterRequest) -> GenResult<AdapterReply>;
}

/// Markers identifying a content-policy or safety refusal
const REFUSAL_MARKERS: [&str; 6] = [
    "content policy",
    "content_policy",
    "content management policy",
    "safety system",
    "safety policy",
    "responsible ai",
];

/// Classify a provider error message as a terminal refusal, if it is one
///
/// Adapters must call this before any status-code mapping: a refusal is
/// terminal regardless of the HTTP status that accompanied it.
pub fn classify_refusal(message: &str) -> Option<GenError> {
    let lowered = message.to_lowercase();
    if REFUSAL_MARKERS.iter().any(|m| lowered.contains(m)) {
        Some(GenError::terminal(message))
    } else {
        None
    }
}

pub use openai::OpenAiAdapter;
pub use registry::ProviderRegistry;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refusal_detected_regardless_of_wording_case() {
        assert!(classify_refusal("Blocked by Content Policy").is_some());
        assert!(classify_refusal("the safety system rejected this prompt").is_some());
        assert!(classify_refusal("flagged by our Responsible AI filters").is_some());
    }

    #[test]
    fn test_plain_errors_are_not_refusals() {
        assert!(classify_refusal("connection reset by peer").is_none());
        assert!(classify_refusal("internal server error").is_none());
        assert!(classify_refusal("quota exceeded").is_none());
    }

    #[test]
    fn test_refusal_is_terminal() {
        let err = classify_refusal("violates content policy").unwrap();
        assert!(!err.is_retryable());
    }
}
