// ABOUTME: Generic OpenAI-compatible LLM provider for cloud and local endpoints
// ABOUTME: Sends non-streaming chat completions and maps HTTP failures onto AppError codes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # `OpenAI`-Compatible Provider
//!
//! Implementation for any endpoint that speaks the `OpenAI` chat completions
//! API: `OpenAI` itself, or a local server such as Ollama, vLLM, or `LocalAI`.
//!
//! ## Example
//!
//! ```rust,no_run
//! use neurofuel_relay::config::LlmConfig;
//! use neurofuel_relay::errors::AppError;
//! use neurofuel_relay::llm::{ChatMessage, ChatRequest, LlmProvider, OpenAiCompatibleConfig, OpenAiCompatibleProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), AppError> {
//!     let config = OpenAiCompatibleConfig::from_llm_config(&LlmConfig::default());
//!     let provider = OpenAiCompatibleProvider::new(config)?;
//!     let request = ChatRequest::new(vec![ChatMessage::user("Hello!")]);
//!     let response = provider.complete(&request).await?;
//!     println!("{}", response.content);
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, instrument, warn};

use super::{
    ChatMessage, ChatRequest, ChatResponse, LlmCapabilities, LlmProvider, MessageRole, TokenUsage,
};
use crate::config::LlmConfig;
use crate::errors::{AppError, ErrorCode};

/// Connection timeout
const CONNECT_TIMEOUT_SECS: u64 = 10;

// ============================================================================
// API Request/Response Types (OpenAI-compatible format)
// ============================================================================

#[derive(Debug, Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<OpenAiResponseFormat>,
}

#[derive(Debug, Serialize)]
struct OpenAiResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

impl From<&ChatMessage> for OpenAiMessage {
    fn from(msg: &ChatMessage) -> Self {
        Self {
            role: msg.role.as_str().to_owned(),
            content: msg.content.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
    #[serde(default)]
    usage: Option<OpenAiUsage>,
    #[serde(default)]
    model: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    #[serde(rename = "prompt_tokens")]
    prompt: u32,
    #[serde(rename = "completion_tokens")]
    completion: u32,
    #[serde(rename = "total_tokens")]
    total: u32,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorResponse {
    error: OpenAiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorDetail {
    message: String,
    #[serde(rename = "type")]
    error_type: Option<String>,
}

// ============================================================================
// Provider Configuration
// ============================================================================

/// Configuration for the `OpenAI`-compatible provider
#[derive(Clone)]
pub struct OpenAiCompatibleConfig {
    /// Base URL for the API (e.g., <https://api.openai.com/v1>)
    pub base_url: String,
    /// API key (optional for local servers)
    pub api_key: Option<String>,
    /// Default model to use
    pub default_model: String,
    /// Provider name for logging
    pub provider_name: String,
    /// Provider display name
    pub display_name: String,
    /// Capabilities of this provider
    pub capabilities: LlmCapabilities,
    /// Request timeout applied by the HTTP client
    pub request_timeout: Duration,
}

impl OpenAiCompatibleConfig {
    /// Derive provider settings from the relay's LLM configuration
    ///
    /// The provider identity is detected from the base URL so logs name the
    /// backend actually in use.
    #[must_use]
    pub fn from_llm_config(llm: &LlmConfig) -> Self {
        let (provider_name, display_name, capabilities) = if llm.base_url.contains("api.openai.com")
        {
            (
                "openai",
                "OpenAI",
                LlmCapabilities::SYSTEM_MESSAGES | LlmCapabilities::JSON_MODE,
            )
        } else if llm.base_url.contains(":11434") {
            ("ollama", "Ollama (Local)", LlmCapabilities::SYSTEM_MESSAGES)
        } else if llm.base_url.contains(":8000") {
            (
                "vllm",
                "vLLM (Local)",
                LlmCapabilities::SYSTEM_MESSAGES | LlmCapabilities::JSON_MODE,
            )
        } else {
            ("openai-compatible", "OpenAI-compatible", LlmCapabilities::SYSTEM_MESSAGES)
        };

        Self {
            base_url: llm.base_url.clone(),
            api_key: llm.api_key.clone(),
            default_model: llm.model.clone(),
            provider_name: provider_name.to_owned(),
            display_name: display_name.to_owned(),
            capabilities,
            request_timeout: llm.timeout(),
        }
    }
}

impl Default for OpenAiCompatibleConfig {
    fn default() -> Self {
        Self::from_llm_config(&LlmConfig::default())
    }
}

// Manual impl so the credential never reaches logs
impl std::fmt::Debug for OpenAiCompatibleConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiCompatibleConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("default_model", &self.default_model)
            .field("provider_name", &self.provider_name)
            .field("capabilities", &self.capabilities)
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// Generic `OpenAI`-compatible LLM provider
pub struct OpenAiCompatibleProvider {
    client: Client,
    config: OpenAiCompatibleConfig,
}

impl OpenAiCompatibleProvider {
    /// Create a new provider with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: OpenAiCompatibleConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Provider configuration
    #[must_use]
    pub const fn config(&self) -> &OpenAiCompatibleConfig {
        &self.config
    }

    /// Build the API URL for a given endpoint
    fn api_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            endpoint
        )
    }

    /// Add authorization header if API key is configured
    fn add_auth_header(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(ref api_key) = self.config.api_key {
            request.bearer_auth(api_key)
        } else {
            request
        }
    }

    /// Map a transport failure to an `AppError`
    fn send_error(&self, e: &reqwest::Error) -> AppError {
        error!(
            "Failed to send request to {}: {}",
            self.config.provider_name, e
        );
        if e.is_timeout() {
            AppError::timeout(
                &self.config.display_name,
                self.config.request_timeout.as_secs(),
            )
        } else if e.is_connect() {
            AppError::new(
                ErrorCode::ExternalServiceUnavailable,
                format!(
                    "{}: cannot connect to {}",
                    self.config.display_name, self.config.base_url
                ),
            )
        } else {
            AppError::external_service(&self.config.display_name, format!("Request failed: {e}"))
        }
    }

    /// Convert chat messages to wire format
    ///
    /// Providers without system message support get the system text prepended
    /// to the first user message instead.
    fn wire_messages(&self, messages: &[ChatMessage]) -> Vec<OpenAiMessage> {
        if self.config.capabilities.supports_system_messages() {
            return messages.iter().map(OpenAiMessage::from).collect();
        }

        let system = messages
            .iter()
            .filter(|m| m.role == MessageRole::System)
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        let mut wire: Vec<OpenAiMessage> = messages
            .iter()
            .filter(|m| m.role != MessageRole::System)
            .map(OpenAiMessage::from)
            .collect();

        if system.is_empty() {
            return wire;
        }

        let user_role = MessageRole::User.as_str();
        if let Some(index) = wire.iter().position(|m| m.role == user_role) {
            wire[index].content = format!("{system}\n\n{}", wire[index].content);
        } else {
            wire.insert(
                0,
                OpenAiMessage {
                    role: user_role.to_owned(),
                    content: system,
                },
            );
        }
        wire
    }

    /// Parse error response from API
    fn parse_error_response(&self, status: reqwest::StatusCode, body: &str) -> AppError {
        let service = self.config.display_name.as_str();

        let Ok(error_response) = serde_json::from_str::<OpenAiErrorResponse>(body) else {
            // Local servers and proxies often answer with plain text
            return match status.as_u16() {
                502..=504 => AppError::new(
                    ErrorCode::ExternalServiceUnavailable,
                    format!("{service}: upstream is not responding ({status})"),
                ),
                _ => AppError::external_service(
                    service,
                    format!(
                        "API error ({}): {}",
                        status,
                        body.chars().take(200).collect::<String>()
                    ),
                ),
            };
        };

        let detail = error_response.error;
        match status.as_u16() {
            401 | 403 => AppError::external_auth(
                service,
                format!("API authentication failed: {}", detail.message),
            ),
            429 => AppError::new(
                ErrorCode::ExternalRateLimited,
                extract_rate_limit_message(&detail.message),
            ),
            400 => AppError::invalid_input(format!("API validation error: {}", detail.message)),
            404 => AppError::not_found(format!("Model or endpoint ({})", detail.message)),
            _ => AppError::external_service(
                service,
                format!(
                    "{} - {}",
                    detail.error_type.unwrap_or_else(|| "unknown".to_owned()),
                    detail.message
                ),
            ),
        }
    }
}

/// Extract a user-friendly rate limit message from an `OpenAI`-style error
fn extract_rate_limit_message(message: &str) -> String {
    let lower = message.to_lowercase();
    if let Some(retry_pos) = lower.find("try again in ") {
        let after_prefix = &lower[retry_pos + "try again in ".len()..];
        let end_pos = after_prefix
            .find(|c: char| !c.is_ascii_digit() && c != '.')
            .unwrap_or(after_prefix.len());
        if let Ok(seconds) = after_prefix[..end_pos].parse::<f64>() {
            let seconds_int = seconds.ceil() as u64;
            return format!("LLM rate limit reached. Please try again in {seconds_int} seconds.");
        }
    }
    "LLM rate limit reached. Please wait a moment and try again.".to_owned()
}

#[async_trait]
impl LlmProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        &self.config.provider_name
    }

    fn display_name(&self) -> &str {
        &self.config.display_name
    }

    fn capabilities(&self) -> LlmCapabilities {
        self.config.capabilities
    }

    fn default_model(&self) -> &str {
        &self.config.default_model
    }

    #[instrument(skip(self, request), fields(provider = %self.config.provider_name))]
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        let model = request
            .model
            .as_deref()
            .unwrap_or(&self.config.default_model);

        let json_mode = request.json_mode && self.config.capabilities.supports_json_mode();
        let openai_request = OpenAiRequest {
            model: model.to_owned(),
            messages: self.wire_messages(&request.messages),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            response_format: json_mode.then_some(OpenAiResponseFormat {
                format_type: "json_object",
            }),
        };

        debug!(
            "Sending chat completion request with {} messages (json_mode={json_mode})",
            openai_request.messages.len()
        );

        let http_request = self
            .client
            .post(self.api_url("chat/completions"))
            .json(&openai_request);

        let response = self
            .add_auth_header(http_request)
            .send()
            .await
            .map_err(|e| self.send_error(&e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!("Failed to read API response: {}", e);
            AppError::external_service(
                &self.config.display_name,
                format!("Failed to read response: {e}"),
            )
        })?;

        if !status.is_success() {
            warn!("{} returned HTTP {}", self.config.provider_name, status);
            return Err(self.parse_error_response(status, &body));
        }

        let openai_response: OpenAiResponse = serde_json::from_str(&body).map_err(|e| {
            error!(
                "Failed to parse API response: {} - body: {}",
                e,
                body.chars().take(500).collect::<String>()
            );
            AppError::external_service(
                &self.config.display_name,
                format!("Failed to parse response: {e}"),
            )
        })?;

        let choice = openai_response.choices.into_iter().next().ok_or_else(|| {
            AppError::external_service(&self.config.display_name, "API returned no choices")
        })?;

        let content = choice.message.content.unwrap_or_default();

        debug!(
            "Received response: {} chars, finish_reason: {:?}",
            content.len(),
            choice.finish_reason
        );

        Ok(ChatResponse {
            content,
            model: openai_response.model.unwrap_or_else(|| model.to_owned()),
            usage: openai_response.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt,
                completion_tokens: u.completion,
                total_tokens: u.total,
            }),
            finish_reason: choice.finish_reason,
        })
    }

    #[instrument(skip(self), fields(provider = %self.config.provider_name))]
    async fn health_check(&self) -> Result<bool, AppError> {
        let http_request = self.client.get(self.api_url("models"));

        let response = self
            .add_auth_header(http_request)
            .send()
            .await
            .map_err(|e| self.send_error(&e))?;

        let healthy = response.status().is_success();
        if !healthy {
            warn!(
                "{} health check failed with status: {}",
                self.config.provider_name,
                response.status()
            );
        }

        Ok(healthy)
    }
}
