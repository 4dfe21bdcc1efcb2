// ABOUTME: Advice generation domain service deciding between the remote provider and the local engine
// ABOUTME: Bounds the remote call with a timeout and falls back to deterministic advice on any failure
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::LlmConfig;
use crate::errors::{AppError, AppResult};
use crate::intelligence::{AdviceHeuristicEngine, AdviceInput};
use crate::llm::{build_advice_messages, ChatRequest, LlmProvider};

/// Which path produced an advice response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AdviceSource {
    /// Local engine, remote provider not consulted
    Mock,
    /// Remote provider text forwarded verbatim
    Remote,
    /// Local engine after a remote failure
    Fallback,
}

impl AdviceSource {
    /// Header value for this source
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Mock => "mock",
            Self::Remote => "remote",
            Self::Fallback => "fallback",
        }
    }
}

impl fmt::Display for AdviceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one advice request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdviceOutcome {
    /// String placed in the response envelope's `result` field
    pub result: String,
    /// Path that produced `result`
    pub source: AdviceSource,
    /// Failure description when the remote path degraded to the engine
    pub warning: Option<String>,
}

impl AdviceOutcome {
    /// Whether the response is degraded
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        matches!(self.source, AdviceSource::Fallback)
    }
}

/// JSON response envelope
///
/// `result` holds a JSON document encoded as a string; clients decode it a
/// second time.
#[derive(Debug, Serialize)]
pub struct AdviceEnvelope {
    /// Serialized advice payload or verbatim provider text
    pub result: String,
    /// Present only for fallback responses
    #[serde(rename = "_warning", skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl From<AdviceOutcome> for AdviceEnvelope {
    fn from(outcome: AdviceOutcome) -> Self {
        Self {
            result: outcome.result,
            warning: outcome.warning,
        }
    }
}

/// Chooses between the remote provider and the heuristic engine per request
#[derive(Clone)]
pub struct AdviceService {
    config: LlmConfig,
    provider: Option<Arc<dyn LlmProvider>>,
}

impl AdviceService {
    /// Create a service; `provider` is ignored while mock mode is active
    #[must_use]
    pub fn new(config: LlmConfig, provider: Option<Arc<dyn LlmProvider>>) -> Self {
        Self { config, provider }
    }

    /// Service that never contacts a provider
    #[must_use]
    pub fn mock(config: LlmConfig) -> Self {
        Self::new(config, None)
    }

    /// Whether requests are answered locally without a remote attempt
    #[must_use]
    pub fn is_mock(&self) -> bool {
        self.config.mock_mode_active() || self.provider.is_none()
    }

    /// Model requested from the provider
    #[must_use]
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Provider configuration in use
    #[must_use]
    pub const fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Produce advice for one request
    ///
    /// # Errors
    ///
    /// Returns `SerializationError` only if the engine payload cannot be
    /// encoded; provider failures are absorbed into a fallback outcome.
    pub async fn generate(&self, input: &AdviceInput) -> AppResult<AdviceOutcome> {
        let provider = match &self.provider {
            Some(provider) if !self.config.mock_mode_active() => provider,
            _ => {
                debug!(protocol = %input.protocol, "Answering advice request from local engine");
                return Ok(AdviceOutcome {
                    result: AdviceHeuristicEngine::compute_for(input).to_json_string()?,
                    source: AdviceSource::Mock,
                    warning: None,
                });
            }
        };

        match self.call_remote(provider.as_ref(), input).await {
            Ok(content) => {
                info!(
                    provider = provider.name(),
                    chars = content.len(),
                    "Advice generated by remote provider"
                );
                Ok(AdviceOutcome {
                    result: content,
                    source: AdviceSource::Remote,
                    warning: None,
                })
            }
            Err(error) => {
                warn!(
                    provider = provider.name(),
                    code = ?error.code,
                    "Remote advice failed, using local engine: {}",
                    error.message
                );
                Ok(AdviceOutcome {
                    result: AdviceHeuristicEngine::compute_for(input).to_json_string()?,
                    source: AdviceSource::Fallback,
                    warning: Some(fallback_warning(&error)),
                })
            }
        }
    }

    /// One bounded completion attempt
    async fn call_remote(
        &self,
        provider: &dyn LlmProvider,
        input: &AdviceInput,
    ) -> Result<String, AppError> {
        let request = ChatRequest::new(build_advice_messages(input))
            .with_model(self.config.model.clone())
            .with_temperature(self.config.temperature)
            .with_max_tokens(self.config.max_tokens)
            .with_json_mode();

        let response = tokio::time::timeout(self.config.timeout(), provider.complete(&request))
            .await
            .map_err(|_| AppError::timeout(provider.display_name(), self.config.timeout_secs))??;

        if response.content.trim().is_empty() {
            return Err(AppError::external_service(
                provider.display_name(),
                "empty completion content",
            ));
        }

        Ok(response.content)
    }
}

impl fmt::Debug for AdviceService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdviceService")
            .field("config", &self.config)
            .field("provider", &self.provider.as_ref().map(|p| p.name().to_owned()))
            .finish()
    }
}

fn fallback_warning(error: &AppError) -> String {
    format!("Upstream advice unavailable, served local advice instead: {error}")
}
