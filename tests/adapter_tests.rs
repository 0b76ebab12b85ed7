//! Reference adapter wire-mapping tests
//!
//! Drives the OpenAI-compatible adapter against a mock HTTP server and
//! checks that every upstream outcome lands in the right taxonomy kind.

use aifallback::config::EndpointConfig;
use aifallback::providers::{AdapterRequest, OpenAiAdapter, ProviderAdapter};
use aifallback::utils::{codes, GenError};
use httpmock::prelude::*;
use serde_json::json;
use std::time::Duration;

fn adapter_for(server: &MockServer, price: Option<f64>) -> OpenAiAdapter {
    OpenAiAdapter::new(
        "mock".to_string(),
        EndpointConfig {
            base_url: format!("{}/v1", server.base_url()),
            api_key: "test-key".to_string(),
            model: "mock-model".to_string(),
            timeout_secs: 5,
            cost_per_kilo_tokens: price,
        },
    )
    .unwrap()
}

fn request(prompt: &str) -> AdapterRequest {
    AdapterRequest {
        prompt: prompt.to_string(),
        tools: vec![],
        timeout_secs: 5,
    }
}

#[tokio::test]
async fn success_with_usage_and_cost() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(200).json_body(json!({
            "model": "mock-model-2024",
            "choices": [{
                "message": {"role": "assistant", "content": "Paris."},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 400, "completion_tokens": 600}
        }));
    });

    let adapter = adapter_for(&server, Some(0.01));
    let reply = adapter.generate(request("capital of France?")).await.unwrap();

    mock.assert();
    assert_eq!(reply.text, "Paris.");
    assert_eq!(reply.model, "mock-model-2024");
    assert_eq!(reply.tokens_in, Some(400));
    assert_eq!(reply.tokens_out, Some(600));
    assert!((reply.cost_usd_est.unwrap() - 0.01).abs() < 1e-9);
    assert!(reply.error.is_none());
}

#[tokio::test]
async fn rate_limit_maps_to_429_code() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(429)
            .json_body(json!({"error": {"message": "Rate limit reached"}}));
    });

    let adapter = adapter_for(&server, None);
    let err = adapter.generate(request("hi")).await.unwrap_err();

    assert_eq!(err.code(), codes::RATE_LIMITED);
    assert!(err.is_retryable());
}

#[tokio::test]
async fn server_error_maps_to_status_code() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(503)
            .json_body(json!({"error": {"message": "overloaded"}}));
    });

    let adapter = adapter_for(&server, None);
    let err = adapter.generate(request("hi")).await.unwrap_err();

    assert_eq!(err.code(), "503");
}

#[tokio::test]
async fn refusal_is_terminal_even_on_400() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(400).json_body(json!({
            "error": {"message": "Your request was rejected by our content policy."}
        }));
    });

    let adapter = adapter_for(&server, None);
    let err = adapter.generate(request("hi")).await.unwrap_err();

    assert!(matches!(err, GenError::Terminal { .. }));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn content_filter_finish_reason_is_terminal() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(200).json_body(json!({
            "model": "mock-model",
            "choices": [{
                "message": {"role": "assistant", "content": ""},
                "finish_reason": "content_filter"
            }]
        }));
    });

    let adapter = adapter_for(&server, None);
    let err = adapter.generate(request("hi")).await.unwrap_err();

    assert!(matches!(err, GenError::Terminal { .. }));
}

#[tokio::test]
async fn slow_upstream_maps_to_timeout() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(200)
            .delay(Duration::from_secs(3))
            .json_body(json!({
                "model": "mock-model",
                "choices": [{"message": {"role": "assistant", "content": "late"}, "finish_reason": "stop"}]
            }));
    });

    let adapter = adapter_for(&server, None);
    let err = adapter
        .generate(AdapterRequest {
            prompt: "hi".to_string(),
            tools: vec![],
            timeout_secs: 1,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, GenError::Timeout { seconds: 1 }));
}

#[tokio::test]
async fn unreachable_host_maps_to_network_error() {
    let adapter = OpenAiAdapter::new(
        "unreachable".to_string(),
        EndpointConfig {
            base_url: "http://127.0.0.1:1/v1".to_string(),
            api_key: String::new(),
            model: "m".to_string(),
            timeout_secs: 2,
            cost_per_kilo_tokens: None,
        },
    )
    .unwrap();

    let err = adapter.generate(request("hi")).await.unwrap_err();
    assert_eq!(err.code(), codes::NETWORK_ERROR);
}

#[tokio::test]
async fn auth_failure_maps_to_status_code() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(401)
            .json_body(json!({"error": {"message": "Incorrect API key provided"}}));
    });

    let adapter = adapter_for(&server, None);
    let err = adapter.generate(request("hi")).await.unwrap_err();

    assert_eq!(err.code(), "401");
    assert!(err.is_retryable());
}
