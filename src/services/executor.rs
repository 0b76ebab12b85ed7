//! Fallback executor
//!
//! The control loop that drives provider adapters in order, classifies
//! outcomes, and decides whether to continue, delay, or stop. Stateless
//! between calls: all per-request state lives in the caller-supplied
//! metadata record, so concurrent calls need no locking. Within one call
//! providers are contacted strictly sequentially, which keeps the attempt
//! history deterministic and auditable.

use crate::config::FallbackConfig;
use crate::models::{ErrorCategory, GenerationMetadata, Mode, ProviderAttempt};
use crate::providers::{AdapterReply, AdapterRequest, ProviderAdapter, ProviderRegistry};
use crate::services::contract;
use crate::utils::{codes, GenError, GenResult};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::{sleep, timeout};
use tracing::{debug, error, info, warn};

/// Grace added to the executor-side backstop so a conforming adapter's
/// own timeout mapping wins the race against a hung one
const BACKSTOP_GRACE: Duration = Duration::from_secs(1);

/// Single-pass, per-request fallback executor
pub struct FallbackExecutor {
    registry: Arc<ProviderRegistry>,
    config: FallbackConfig,
}

impl FallbackExecutor {
    /// Create an executor over an injected registry
    pub fn new(registry: Arc<ProviderRegistry>, config: FallbackConfig) -> Self {
        Self { registry, config }
    }

    /// Whether the fallback mechanism is enabled
    pub fn fallback_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Number of registered providers
    pub fn provider_count(&self) -> usize {
        self.registry.len()
    }

    /// Attempt each provider in the mode's chain until one succeeds
    ///
    /// On success the metadata's winning provider/model/latency are
    /// populated and the text is returned; on failure the metadata holds
    /// the full attempt history and the returned error summarizes it.
    /// Every provider receives a byte-identical copy of the prompt:
    /// failure text from one attempt is never appended to the next.
    pub async fn generate(
        &self,
        prompt: &str,
        mode: Mode,
        tools: &[String],
        meta: &mut GenerationMetadata,
        timeout_secs: u64,
    ) -> GenResult<String> {
        let base = AdapterRequest {
            prompt: prompt.to_string(),
            tools: tools.to_vec(),
            timeout_secs,
        };

        let working = self.working_chain(mode, meta);
        debug!(
            request_id = %meta.request_id,
            mode = %mode,
            chain_len = working.len(),
            "starting fallback chain"
        );

        if working.is_empty() {
            self.summarize_failure(meta);
            let err = GenError::provider(
                codes::NO_AVAILABLE_PROVIDERS,
                format!("no available providers for mode {mode}"),
            );
            meta.error = Some(err.to_string());
            meta.error_category = Some(err.category());
            error!(request_id = %meta.request_id, mode = %mode, "no available providers");
            return Err(err);
        }

        for (name, adapter) in working {
            let started = Instant::now();
            let (outcome, category_override) =
                Self::invoke(adapter, base.clone(), timeout_secs).await;
            let latency_ms = started.elapsed().as_millis() as u64;

            match outcome {
                Ok(reply) => {
                    if let Some(reason) = contract::detect_violation(&reply) {
                        warn!(provider = %name, %reason, "adapter contract violation");
                        meta.record_attempt(ProviderAttempt::failure(
                            &name,
                            ErrorCategory::ProviderError,
                            codes::CONTRACT_VIOLATION,
                            latency_ms,
                        ));
                        continue;
                    }

                    self.finish_success(&name, &reply, latency_ms, meta);
                    return Ok(reply.text);
                }
                Err(err) if !err.is_retryable() => {
                    // Terminal: the chain stops here even if providers
                    // remain. A refusal must never be "fixed" by trying
                    // a different backend.
                    meta.record_attempt(ProviderAttempt::failure(
                        &name,
                        err.category(),
                        err.code(),
                        latency_ms,
                    ));
                    meta.error = Some(err.to_string());
                    meta.error_category = Some(err.category());
                    error!(provider = %name, latency_ms, "terminal failure, aborting chain");
                    return Err(err);
                }
                Err(err) => {
                    let category = category_override.unwrap_or_else(|| err.category());
                    let code = err.code().to_string();
                    meta.record_attempt(ProviderAttempt::failure(
                        &name, category, &code, latency_ms,
                    ));
                    warn!(
                        provider = %name,
                        category = %category,
                        code = %code,
                        latency_ms,
                        "attempt failed, falling back"
                    );

                    // Brief pause before hitting the next provider of an
                    // already rate-limited fleet
                    if code == codes::RATE_LIMITED {
                        sleep(Duration::from_millis(self.config.rate_limit_delay_ms)).await;
                    }
                }
            }
        }

        let (category, code) = self.summarize_failure(meta);
        let err = GenError::Exhausted {
            category,
            code,
            attempts: meta.provider_attempts.len(),
        };
        meta.error = Some(err.to_string());
        error!(
            request_id = %meta.request_id,
            attempts = meta.provider_attempts.len(),
            "all providers failed"
        );
        Err(err)
    }

    /// Sanitize the configured chain for a mode
    ///
    /// Unregistered names are recorded as skipped attempts and dropped
    /// without aborting the call. When fallback is disabled the working
    /// chain is exactly the configured default provider.
    fn working_chain(
        &self,
        mode: Mode,
        meta: &mut GenerationMetadata,
    ) -> Vec<(String, Arc<dyn ProviderAdapter>)> {
        let configured: Vec<String> = if self.config.enabled {
            self.config.chains.for_mode(mode).to_vec()
        } else {
            vec![self.config.default_provider.clone()]
        };

        let mut working = Vec::with_capacity(configured.len());
        for name in configured {
            match self.registry.get(&name) {
                Some(adapter) => working.push((name, adapter)),
                None => {
                    warn!(provider = %name, "configured provider not registered, skipping");
                    meta.record_attempt(ProviderAttempt::skipped(&name));
                }
            }
        }
        working
    }

    /// Drive one adapter attempt with panic isolation and a backstop
    /// timeout guarding hung adapters
    ///
    /// Returns the outcome plus an optional category override (panics are
    /// recorded as `exception` rather than `provider_error`).
    async fn invoke(
        adapter: Arc<dyn ProviderAdapter>,
        request: AdapterRequest,
        timeout_secs: u64,
    ) -> (GenResult<AdapterReply>, Option<ErrorCategory>) {
        let backstop = Duration::from_secs(timeout_secs) + BACKSTOP_GRACE;
        let mut handle = tokio::spawn(async move { adapter.generate(request).await });

        match timeout(backstop, &mut handle).await {
            Ok(Ok(outcome)) => (outcome, None),
            Ok(Err(join_err)) => {
                if join_err.is_panic() {
                    (
                        Err(GenError::provider(codes::ADAPTER_ERROR, "adapter panicked")),
                        Some(ErrorCategory::Exception),
                    )
                } else {
                    (
                        Err(GenError::provider(codes::ADAPTER_ERROR, "adapter task cancelled")),
                        None,
                    )
                }
            }
            Err(_) => {
                handle.abort();
                (Err(GenError::timeout(timeout_secs)), None)
            }
        }
    }

    /// Populate the metadata for a winning attempt
    fn finish_success(
        &self,
        name: &str,
        reply: &AdapterReply,
        latency_ms: u64,
        meta: &mut GenerationMetadata,
    ) {
        meta.record_attempt(ProviderAttempt::success(
            name,
            &reply.model,
            latency_ms,
            reply.tokens_in,
            reply.tokens_out,
            reply.cost_usd_est,
        ));
        meta.provider = Some(name.to_string());
        meta.model = Some(reply.model.clone());
        meta.latency_ms = Some(latency_ms);

        // The reason comes from the first failed attempt, if any
        let reason = meta.first_failure().map(attempt_reason);
        meta.fallback_reason = reason;

        info!(
            request_id = %meta.request_id,
            provider = %name,
            model = %reply.model,
            latency_ms,
            attempts = meta.provider_attempts.len(),
            fallback_used = meta.fallback_used,
            "generation succeeded"
        );
    }

    /// Classify total failure from the first failed attempt and stamp the
    /// metadata; returns the (category, code) pair driving the raised error
    fn summarize_failure(&self, meta: &mut GenerationMetadata) -> (ErrorCategory, String) {
        let first = meta.first_failure();
        let category = first
            .and_then(|a| a.error_category)
            .unwrap_or(ErrorCategory::ProviderError);
        let code = first
            .and_then(|a| a.error_code.clone())
            .unwrap_or_else(|| codes::NO_AVAILABLE_PROVIDERS.to_string());

        meta.error_category = Some(category);
        if !meta.provider_attempts.is_empty() {
            meta.fallback_reason = Some(format!("all_failed:{}:{}", category.as_str(), code));
        }
        (category, code)
    }
}

/// Short `<category>:<code>` summary of a failed attempt
fn attempt_reason(attempt: &ProviderAttempt) -> String {
    let category = attempt
        .error_category
        .map(|c| c.as_str())
        .unwrap_or("provider_error");
    let code = attempt.error_code.as_deref().unwrap_or("unknown");
    format!("{category}:{code}")
}
