//! Error handling module
//!
//! Defines the failure taxonomy shared by provider adapters and the
//! fallback executor. Every failure carries a category (driving the
//! retry-vs-abort decision) and a machine-readable code.

use crate::models::ErrorCategory;
use axum::http::StatusCode;
use thiserror::Error;

/// Well-known error codes carried by failed attempts.
pub mod codes {
    /// Rate limited by the upstream provider.
    pub const RATE_LIMITED: &str = "429";
    /// Network-level failure before an HTTP status was received.
    pub const NETWORK_ERROR: &str = "network_error";
    /// The adapter task panicked or was cancelled.
    pub const ADAPTER_ERROR: &str = "adapter_error";
    /// A configured provider name has no registered adapter.
    pub const PROVIDER_NOT_FOUND: &str = "provider_not_found";
    /// An adapter returned an error disguised as a successful value.
    pub const CONTRACT_VIOLATION: &str = "contract_violation";
    /// Chain sanitization left no providers to try.
    pub const NO_AVAILABLE_PROVIDERS: &str = "no_available_providers";
    /// The prompt was refused by a content-policy or safety system.
    pub const CONTENT_FILTER: &str = "content_filter";
    /// The attempt exceeded its allotted time.
    pub const TIMEOUT: &str = "timeout";
}

/// Generation failure taxonomy
///
/// Adapters may only return the first three kinds; `Exhausted` is raised
/// by the executor itself when the whole chain has been used up.
#[derive(Error, Debug, Clone)]
pub enum GenError {
    /// The prompt itself was rejected (content policy or invalid request).
    /// Stops the entire chain; retrying another provider must never be
    /// used to circumvent a safety refusal.
    #[error("request rejected by provider: {reason}")]
    Terminal {
        /// Provider-side refusal reason
        reason: String,
    },

    /// The attempt exceeded its allotted time. Retryable.
    #[error("provider timed out after {seconds}s")]
    Timeout {
        /// The per-attempt timeout that elapsed
        seconds: u64,
    },

    /// Infrastructure-level provider failure (rate limit, 5xx, auth,
    /// network, missing registration). Retryable.
    #[error("provider failure ({code}): {message}")]
    Provider {
        /// Machine-readable code (see [`codes`])
        code: String,
        /// Internal diagnostic message, never forwarded to end users
        message: String,
    },

    /// Every provider in the chain failed. The category mirrors the
    /// first failure encountered; the full breakdown lives in the
    /// metadata's attempt list.
    #[error("all providers failed after {attempts} attempts (first failure: {category}:{code})")]
    Exhausted {
        /// Category of the first failed attempt
        category: ErrorCategory,
        /// Code of the first failed attempt
        code: String,
        /// Total number of attempts recorded
        attempts: usize,
    },
}

impl GenError {
    /// Create a terminal failure
    pub fn terminal(reason: impl Into<String>) -> Self {
        GenError::Terminal { reason: reason.into() }
    }

    /// Create a timeout failure
    pub fn timeout(seconds: u64) -> Self {
        GenError::Timeout { seconds }
    }

    /// Create a provider failure with a code
    pub fn provider(code: impl Into<String>, message: impl Into<String>) -> Self {
        GenError::Provider {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Category driving the retry-vs-abort decision
    pub fn category(&self) -> ErrorCategory {
        match self {
            GenError::Terminal { .. } => ErrorCategory::AiError,
            GenError::Timeout { .. } => ErrorCategory::Timeout,
            GenError::Provider { .. } => ErrorCategory::ProviderError,
            GenError::Exhausted { category, .. } => *category,
        }
    }

    /// Machine-readable code recorded on the attempt
    pub fn code(&self) -> &str {
        match self {
            GenError::Terminal { .. } => codes::CONTENT_FILTER,
            GenError::Timeout { .. } => codes::TIMEOUT,
            GenError::Provider { code, .. } => code,
            GenError::Exhausted { code, .. } => code,
        }
    }

    /// Whether the chain may continue past this failure
    pub fn is_retryable(&self) -> bool {
        !matches!(self, GenError::Terminal { .. } | GenError::Exhausted { .. })
    }

    /// Get the HTTP status code for the response boundary
    pub fn status_code(&self) -> StatusCode {
        match self {
            GenError::Terminal { .. } => StatusCode::BAD_REQUEST,
            GenError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            GenError::Provider { code, .. } if code == codes::RATE_LIMITED => {
                StatusCode::TOO_MANY_REQUESTS
            }
            GenError::Provider { .. } => StatusCode::BAD_GATEWAY,
            GenError::Exhausted { category, .. } => match category {
                ErrorCategory::Timeout => StatusCode::GATEWAY_TIMEOUT,
                ErrorCategory::AiError => StatusCode::BAD_REQUEST,
                _ => StatusCode::BAD_GATEWAY,
            },
        }
    }

    /// Generic user-facing message
    ///
    /// Raw provider exception text never crosses the response boundary;
    /// callers get this plus the machine-readable category/code.
    pub fn user_message(&self) -> &'static str {
        match self.category() {
            ErrorCategory::AiError => "The request was declined by the provider's content policy.",
            ErrorCategory::Timeout => "The request timed out. Please try again.",
            ErrorCategory::ProviderError | ErrorCategory::Exception => {
                "The service is temporarily unavailable. Please try again later."
            }
        }
    }
}

/// Result type alias for generation outcomes
pub type GenResult<T> = Result<T, GenError>;
