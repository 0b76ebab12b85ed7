//! Reference adapter: OpenAI-compatible chat completions
//!
//! Demonstrates the full adapter contract against any endpoint speaking
//! the OpenAI chat-completions wire format. Performs no internal retries;
//! retry policy belongs exclusively to the executor.

use super::{classify_refusal, AdapterReply, AdapterRequest, ProviderAdapter};
use crate::config::EndpointConfig;
use crate::utils::{codes, GenError, GenResult};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// OpenAI-compatible provider adapter
pub struct OpenAiAdapter {
    name: String,
    endpoint: EndpointConfig,
    client: Client,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    model: Option<String>,
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    prompt_tokens: Option<u32>,
    completion_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl OpenAiAdapter {
    /// Create an adapter for one configured endpoint
    pub fn new(name: String, endpoint: EndpointConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(endpoint.timeout_secs))
            .user_agent("aifallback/0.1.0")
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { name, endpoint, client })
    }

    /// Build the chat payload; tool names are surfaced to the model via a
    /// system message since the executor passes names only
    fn build_payload(&self, request: &AdapterRequest) -> ChatRequest {
        let mut messages = Vec::with_capacity(2);

        if !request.tools.is_empty() {
            messages.push(ChatMessage {
                role: "system".to_string(),
                content: format!("Available tools: {}", request.tools.join(", ")),
            });
        }

        messages.push(ChatMessage {
            role: "user".to_string(),
            content: request.prompt.clone(),
        });

        ChatRequest {
            model: self.endpoint.model.clone(),
            messages,
        }
    }

    /// Estimate cost from usage and the configured per-kilotoken price
    fn estimate_cost(&self, tokens_in: Option<u32>, tokens_out: Option<u32>) -> Option<f64> {
        let price = self.endpoint.cost_per_kilo_tokens?;
        let total = tokens_in.unwrap_or(0) + tokens_out.unwrap_or(0);
        Some(f64::from(total) / 1000.0 * price)
    }

    /// Map a non-success HTTP response to a taxonomy kind
    ///
    /// Refusal classification runs before any status-code mapping: a
    /// content-policy rejection is terminal even when it rides on a 400.
    fn map_error(&self, status: StatusCode, body: &str) -> GenError {
        let message = serde_json::from_str::<ApiErrorBody>(body)
            .map(|b| b.error.message)
            .unwrap_or_else(|_| body.to_string());

        if let Some(terminal) = classify_refusal(&message) {
            return terminal;
        }

        match status.as_u16() {
            429 => GenError::provider(codes::RATE_LIMITED, message),
            code => GenError::provider(code.to_string(), message),
        }
    }
}

#[async_trait]
impl ProviderAdapter for OpenAiAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(&self, request: AdapterRequest) -> GenResult<AdapterReply> {
        debug!(provider = %self.name, model = %self.endpoint.model, "sending chat completion request");

        let url = format!("{}/chat/completions", self.endpoint.base_url);
        let payload = self.build_payload(&request);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.endpoint.api_key))
            .header("Content-Type", "application/json")
            .timeout(Duration::from_secs(request.timeout_secs))
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenError::timeout(request.timeout_secs)
                } else {
                    GenError::provider(codes::NETWORK_ERROR, e.to_string())
                }
            })?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(provider = %self.name, %status, "upstream returned error status");
            return Err(self.map_error(status, &body));
        }

        let chat: ChatResponse = response.json().await.map_err(|e| {
            GenError::provider(codes::NETWORK_ERROR, format!("failed to parse response: {e}"))
        })?;

        let choice = chat
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| GenError::provider("empty_response", "response contained no choices"))?;

        // A filtered completion is a refusal, not a degraded success
        if choice.finish_reason.as_deref() == Some("content_filter") {
            return Err(GenError::terminal("completion stopped by content filter"));
        }

        let tokens_in = chat.usage.as_ref().and_then(|u| u.prompt_tokens);
        let tokens_out = chat.usage.as_ref().and_then(|u| u.completion_tokens);

        Ok(AdapterReply {
            text: choice.message.content,
            model: chat.model.unwrap_or_else(|| self.endpoint.model.clone()),
            tokens_in,
            tokens_out,
            cost_usd_est: self.estimate_cost(tokens_in, tokens_out),
            finish_reason: choice.finish_reason,
            error: None,
        })
    }
}
