//! Attempt and metadata records
//!
//! The data structures that accumulate the full per-request generation
//! history. One `ProviderAttempt` is recorded per contacted (or skipped)
//! provider; one `GenerationMetadata` exists per caller request and is
//! mutated in place by the executor.

use crate::utils::codes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Execution mode selecting which provider chain to use
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Plain single-turn generation
    #[default]
    Direct,
    /// Research-oriented generation
    Research,
    /// Code generation
    CodeGeneration,
}

impl Mode {
    /// Get the mode name as used in configuration keys and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Direct => "direct",
            Mode::Research => "research",
            Mode::CodeGeneration => "code_generation",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a single provider attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptStatus {
    Success,
    Failed,
}

/// Failure classification recorded on attempts and on the final error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// The attempt exceeded its allotted time
    Timeout,
    /// Infrastructure-level provider failure
    ProviderError,
    /// The prompt itself was rejected (content policy / invalid request)
    AiError,
    /// The adapter task panicked
    Exception,
}

impl ErrorCategory {
    /// Get the category as its wire string
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Timeout => "timeout",
            ErrorCategory::ProviderError => "provider_error",
            ErrorCategory::AiError => "ai_error",
            ErrorCategory::Exception => "exception",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Record of one contacted (or skipped) provider during one call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderAttempt {
    /// Name of the backend tried
    pub provider: String,
    /// Model used; populated only on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Outcome of the attempt
    pub status: AttemptStatus,
    /// Failure classification, absent on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_category: Option<ErrorCategory>,
    /// Backend-specific code, absent on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    /// Elapsed time for this attempt; recorded even on failure
    pub latency_ms: u64,
    /// Creation time of the attempt
    pub timestamp: DateTime<Utc>,
    /// Prompt tokens consumed, populated only on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens_in: Option<u32>,
    /// Completion tokens produced, populated only on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens_out: Option<u32>,
    /// Estimated cost in USD, populated only on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_usd_est: Option<f64>,
}

impl ProviderAttempt {
    /// Record a successful attempt
    pub fn success(
        provider: &str,
        model: &str,
        latency_ms: u64,
        tokens_in: Option<u32>,
        tokens_out: Option<u32>,
        cost_usd_est: Option<f64>,
    ) -> Self {
        Self {
            provider: provider.to_string(),
            model: Some(model.to_string()),
            status: AttemptStatus::Success,
            error_category: None,
            error_code: None,
            latency_ms,
            timestamp: Utc::now(),
            tokens_in,
            tokens_out,
            cost_usd_est,
        }
    }

    /// Record a failed attempt
    pub fn failure(provider: &str, category: ErrorCategory, code: &str, latency_ms: u64) -> Self {
        Self {
            provider: provider.to_string(),
            model: None,
            status: AttemptStatus::Failed,
            error_category: Some(category),
            error_code: Some(code.to_string()),
            latency_ms,
            timestamp: Utc::now(),
            tokens_in: None,
            tokens_out: None,
            cost_usd_est: None,
        }
    }

    /// Record a provider skipped during chain sanitization
    pub fn skipped(provider: &str) -> Self {
        Self::failure(
            provider,
            ErrorCategory::ProviderError,
            codes::PROVIDER_NOT_FOUND,
            0,
        )
    }

    /// Whether this attempt failed
    pub fn is_failure(&self) -> bool {
        self.status == AttemptStatus::Failed
    }
}

/// Per-request generation record, mutated in place by the executor
///
/// Owned exclusively by a single request; never shared across concurrent
/// calls. The executor holds no state of its own, so concurrent calls
/// against one executor instance are safe without locking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationMetadata {
    /// Request identifier for log correlation
    pub request_id: Uuid,
    /// Echo of the requested execution mode
    pub mode: Mode,
    /// Echo of the requested tool list
    pub tools_used: Vec<String>,
    /// Winning provider, populated on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    /// Winning model, populated on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Latency of the winning attempt
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    /// Internal error summary, populated only on total failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Final failure classification, populated only on total failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_category: Option<ErrorCategory>,
    /// True iff more than one attempt was made
    pub fallback_used: bool,
    /// Short summary of why fallback occurred
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
    /// Ordered, complete attempt history; never empty after a call
    pub provider_attempts: Vec<ProviderAttempt>,
}

impl GenerationMetadata {
    /// Create a fresh record for one request
    pub fn new(mode: Mode, tools: Vec<String>) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            mode,
            tools_used: tools,
            provider: None,
            model: None,
            latency_ms: None,
            error: None,
            error_category: None,
            fallback_used: false,
            fallback_reason: None,
            provider_attempts: Vec::new(),
        }
    }

    /// Append an attempt, keeping `fallback_used` consistent with the
    /// attempt count
    pub fn record_attempt(&mut self, attempt: ProviderAttempt) {
        self.provider_attempts.push(attempt);
        self.fallback_used = self.provider_attempts.len() > 1;
    }

    /// First failed attempt; drives `fallback_reason`
    pub fn first_failure(&self) -> Option<&ProviderAttempt> {
        self.provider_attempts.iter().find(|a| a.is_failure())
    }

    /// Last recorded attempt
    pub fn last_attempt(&self) -> Option<&ProviderAttempt> {
        self.provider_attempts.last()
    }
}
