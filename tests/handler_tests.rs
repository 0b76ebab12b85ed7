//! HTTP surface tests
//!
//! Exercises the axum layer end to end with fake adapters behind the
//! registry.

use aifallback::config::{ChainConfig, FallbackConfig, LoggingConfig, ServerConfig, Settings};
use aifallback::create_router;
use aifallback::providers::{AdapterReply, AdapterRequest, ProviderAdapter, ProviderRegistry};
use aifallback::utils::{GenError, GenResult};
use async_trait::async_trait;
use axum_test::TestServer;
use serde_json::{json, Value};
use std::sync::Arc;

struct FakeAdapter {
    name: String,
    outcome: Result<String, GenError>,
}

#[async_trait]
impl ProviderAdapter for FakeAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(&self, _request: AdapterRequest) -> GenResult<AdapterReply> {
        match &self.outcome {
            Ok(text) => Ok(AdapterReply {
                text: text.clone(),
                model: format!("{}-model", self.name),
                tokens_in: Some(5),
                tokens_out: Some(10),
                ..Default::default()
            }),
            Err(err) => Err(err.clone()),
        }
    }
}

fn test_settings(chain: Vec<&str>) -> Settings {
    Settings {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8083,
        },
        fallback: FallbackConfig {
            enabled: true,
            default_provider: chain.first().map(|s| s.to_string()).unwrap_or_default(),
            chains: ChainConfig {
                direct: chain.iter().map(|s| s.to_string()).collect(),
                research: vec![],
                code_generation: vec![],
                default: chain.iter().map(|s| s.to_string()).collect(),
            },
            rate_limit_delay_ms: 1,
            attempt_timeout_secs: 5,
        },
        logging: LoggingConfig {
            level: "info".to_string(),
            format: "text".to_string(),
        },
    }
}

fn server_with(adapters: Vec<FakeAdapter>, chain: Vec<&str>) -> TestServer {
    let mut registry = ProviderRegistry::new();
    for adapter in adapters {
        registry.register(adapter.name.clone(), Arc::new(adapter));
    }

    let router = create_router(test_settings(chain), Arc::new(registry)).unwrap();
    TestServer::new(router).unwrap()
}

#[tokio::test]
async fn generate_success_envelope() {
    let server = server_with(
        vec![FakeAdapter {
            name: "primary".to_string(),
            outcome: Ok("hello there".to_string()),
        }],
        vec!["primary"],
    );

    let response = server
        .post("/v1/generate")
        .json(&json!({"prompt": "say hello", "mode": "direct"}))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();

    assert_eq!(body["success"], true);
    assert_eq!(body["text"], "hello there");
    assert_eq!(body["provider"], "primary");
    assert_eq!(body["model"], "primary-model");
    assert_eq!(body["fallback_used"], false);
    assert_eq!(body["provider_attempts"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn generate_failure_envelope_is_generic() {
    let server = server_with(
        vec![FakeAdapter {
            name: "primary".to_string(),
            outcome: Err(GenError::provider("500", "secret internal detail")),
        }],
        vec!["primary"],
    );

    let response = server
        .post("/v1/generate")
        .json(&json!({"prompt": "say hello"}))
        .await;

    assert_eq!(response.status_code().as_u16(), 502);
    let body: Value = response.json();

    assert_eq!(body["success"], false);
    assert_eq!(body["error_category"], "provider_error");
    // The raw upstream message never crosses this boundary
    assert!(!body["error"].as_str().unwrap().contains("secret"));
    assert_eq!(body["provider_attempts"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn fallback_surfaces_in_envelope() {
    let server = server_with(
        vec![
            FakeAdapter {
                name: "flaky".to_string(),
                outcome: Err(GenError::provider("429", "rate limited")),
            },
            FakeAdapter {
                name: "backup".to_string(),
                outcome: Ok("saved".to_string()),
            },
        ],
        vec!["flaky", "backup"],
    );

    let response = server
        .post("/v1/generate")
        .json(&json!({"prompt": "anything"}))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();

    assert_eq!(body["success"], true);
    assert_eq!(body["fallback_used"], true);
    assert_eq!(body["fallback_reason"], "provider_error:429");
    assert_eq!(body["provider"], "backup");
}

#[tokio::test]
async fn terminal_failure_returns_400() {
    let server = server_with(
        vec![FakeAdapter {
            name: "primary".to_string(),
            outcome: Err(GenError::terminal("content policy refusal")),
        }],
        vec!["primary"],
    );

    let response = server
        .post("/v1/generate")
        .json(&json!({"prompt": "do something bad"}))
        .await;

    assert_eq!(response.status_code().as_u16(), 400);
    let body: Value = response.json();
    assert_eq!(body["error_category"], "ai_error");
}

#[tokio::test]
async fn empty_prompt_is_rejected_without_contacting_providers() {
    let server = server_with(
        vec![FakeAdapter {
            name: "primary".to_string(),
            outcome: Ok("should not run".to_string()),
        }],
        vec!["primary"],
    );

    let response = server
        .post("/v1/generate")
        .json(&json!({"prompt": "   "}))
        .await;

    assert_eq!(response.status_code().as_u16(), 400);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["provider_attempts"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn health_reports_providers_and_flag() {
    let server = server_with(
        vec![FakeAdapter {
            name: "primary".to_string(),
            outcome: Ok("x".to_string()),
        }],
        vec!["primary"],
    );

    let response = server.get("/health").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["providers"], 1);
    assert_eq!(body["fallback_enabled"], true);

    let live = server.get("/health/live").await;
    live.assert_status_ok();
}
