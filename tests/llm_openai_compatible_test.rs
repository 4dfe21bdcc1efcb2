// ABOUTME: Integration tests for the OpenAI-compatible provider against a local stub server
// ABOUTME: Validates request shape, auth header, JSON mode, response parsing, and error mapping
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::sync::{Arc, Mutex};

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use neurofuel_relay::config::LlmConfig;
use neurofuel_relay::errors::ErrorCode;
use neurofuel_relay::llm::{
    ChatMessage, ChatRequest, LlmCapabilities, LlmProvider, OpenAiCompatibleConfig,
    OpenAiCompatibleProvider,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// What the stub answers and what it saw
#[derive(Clone)]
struct StubState {
    status: StatusCode,
    body: String,
    seen: Arc<Mutex<Vec<(Option<String>, Value)>>>,
}

async fn completions(
    State(state): State<StubState>,
    headers: HeaderMap,
    Json(request): Json<Value>,
) -> (StatusCode, String) {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    state.seen.lock().unwrap().push((auth, request));
    (state.status, state.body.clone())
}

async fn models(State(state): State<StubState>) -> StatusCode {
    state.status
}

/// Start a stub on an ephemeral port and return its base URL
async fn start_stub(status: StatusCode, body: &str) -> (String, StubState) {
    let state = StubState {
        status,
        body: body.to_owned(),
        seen: Arc::new(Mutex::new(Vec::new())),
    };
    let app = Router::new()
        .route("/v1/chat/completions", post(completions))
        .route("/v1/models", get(models))
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}/v1"), state)
}

fn provider_for(base_url: &str, api_key: Option<&str>) -> OpenAiCompatibleProvider {
    let llm = LlmConfig {
        api_key: api_key.map(str::to_owned),
        base_url: base_url.to_owned(),
        model: "stub-model".to_owned(),
        timeout_secs: 5,
        ..LlmConfig::default()
    };
    let mut config = OpenAiCompatibleConfig::from_llm_config(&llm);
    config.capabilities |= LlmCapabilities::JSON_MODE;
    OpenAiCompatibleProvider::new(config).unwrap()
}

fn advice_request() -> ChatRequest {
    ChatRequest::new(vec![
        ChatMessage::system("Answer with JSON."),
        ChatMessage::user("Profile: {}"),
    ])
    .with_temperature(0.4)
    .with_max_tokens(700)
    .with_json_mode()
}

#[tokio::test]
async fn test_successful_completion() {
    let body = json!({
        "model": "stub-model-2024",
        "choices": [{
            "message": {"role": "assistant", "content": "{\"proteinG\":150}"},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 12, "completion_tokens": 8, "total_tokens": 20}
    });
    let (base_url, state) = start_stub(StatusCode::OK, &body.to_string()).await;
    let provider = provider_for(&base_url, Some("sk-stub"));

    let response = provider.complete(&advice_request()).await.unwrap();

    assert_eq!(response.content, "{\"proteinG\":150}");
    assert_eq!(response.model, "stub-model-2024");
    assert_eq!(response.finish_reason.as_deref(), Some("stop"));
    assert_eq!(response.usage.unwrap().total_tokens, 20);

    let seen = state.seen.lock().unwrap();
    let (auth, request) = &seen[0];
    assert_eq!(auth.as_deref(), Some("Bearer sk-stub"));
    assert_eq!(request["model"], "stub-model");
    assert_eq!(request["max_tokens"], 700);
    assert_eq!(request["response_format"]["type"], "json_object");
    assert_eq!(request["messages"][0]["role"], "system");
    assert_eq!(request["messages"][1]["content"], "Profile: {}");
}

#[tokio::test]
async fn test_no_auth_header_without_key() {
    let body = json!({"choices": [{"message": {"content": "ok"}, "finish_reason": null}]});
    let (base_url, state) = start_stub(StatusCode::OK, &body.to_string()).await;
    let provider = provider_for(&base_url, None);

    let response = provider.complete(&advice_request()).await.unwrap();
    assert_eq!(response.content, "ok");
    assert_eq!(response.model, "stub-model");
    assert!(state.seen.lock().unwrap()[0].0.is_none());
}

#[tokio::test]
async fn test_system_prompt_merged_for_provider_without_system_role() {
    let body = json!({"choices": [{"message": {"content": "ok"}, "finish_reason": "stop"}]});
    let (base_url, state) = start_stub(StatusCode::OK, &body.to_string()).await;

    let llm = LlmConfig {
        base_url,
        timeout_secs: 5,
        ..LlmConfig::default()
    };
    let mut config = OpenAiCompatibleConfig::from_llm_config(&llm);
    config.capabilities = LlmCapabilities::empty();
    let provider = OpenAiCompatibleProvider::new(config).unwrap();

    provider.complete(&advice_request()).await.unwrap();

    let seen = state.seen.lock().unwrap();
    let messages = seen[0].1["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["role"], "user");
    assert_eq!(messages[0]["content"], "Answer with JSON.\n\nProfile: {}");
    assert!(seen[0].1.get("response_format").is_none());
}

#[tokio::test]
async fn test_unauthorized_maps_to_auth_failure() {
    let body = json!({"error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}});
    let (base_url, _) = start_stub(StatusCode::UNAUTHORIZED, &body.to_string()).await;

    let error = provider_for(&base_url, Some("sk-wrong"))
        .complete(&advice_request())
        .await
        .unwrap_err();

    assert_eq!(error.code, ErrorCode::ExternalAuthFailed);
    assert!(error.message.contains("Incorrect API key"));
}

#[tokio::test]
async fn test_rate_limit_message_is_friendly() {
    let body = json!({"error": {"message": "Rate limit reached. Please try again in 20s.", "type": "requests"}});
    let (base_url, _) = start_stub(StatusCode::TOO_MANY_REQUESTS, &body.to_string()).await;

    let error = provider_for(&base_url, Some("sk"))
        .complete(&advice_request())
        .await
        .unwrap_err();

    assert_eq!(error.code, ErrorCode::ExternalRateLimited);
    assert_eq!(
        error.message,
        "LLM rate limit reached. Please try again in 20 seconds."
    );
}

#[tokio::test]
async fn test_empty_choices_is_an_error() {
    let (base_url, _) = start_stub(StatusCode::OK, r#"{"choices": []}"#).await;

    let error = provider_for(&base_url, Some("sk"))
        .complete(&advice_request())
        .await
        .unwrap_err();

    assert_eq!(error.code, ErrorCode::ExternalServiceError);
    assert!(error.message.contains("no choices"));
}

#[tokio::test]
async fn test_malformed_success_body_is_an_error() {
    let (base_url, _) = start_stub(StatusCode::OK, "<html>proxy page</html>").await;

    let error = provider_for(&base_url, Some("sk"))
        .complete(&advice_request())
        .await
        .unwrap_err();

    assert_eq!(error.code, ErrorCode::ExternalServiceError);
}

#[tokio::test]
async fn test_unreachable_endpoint_is_unavailable() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let error = provider_for(&format!("http://{addr}/v1"), Some("sk"))
        .complete(&advice_request())
        .await
        .unwrap_err();

    assert_eq!(error.code, ErrorCode::ExternalServiceUnavailable);
}

#[tokio::test]
async fn test_health_check_reflects_status() {
    let (healthy_url, _) = start_stub(StatusCode::OK, "{}").await;
    assert!(provider_for(&healthy_url, Some("sk")).health_check().await.unwrap());

    let (unhealthy_url, _) = start_stub(StatusCode::UNAUTHORIZED, "{}").await;
    assert!(!provider_for(&unhealthy_url, Some("sk")).health_check().await.unwrap());
}
