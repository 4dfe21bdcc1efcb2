// ABOUTME: Scripted completion provider for testing the advice paths without network access
// ABOUTME: Returns a fixed reply or error after an optional delay and records the requests it saw

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use async_trait::async_trait;
use neurofuel_relay::errors::{AppError, ErrorCode};
use neurofuel_relay::llm::{ChatRequest, ChatResponse, LlmCapabilities, LlmProvider};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// What the provider answers with
#[derive(Clone)]
pub enum Script {
    /// Completion text
    Reply(String),
    /// Provider failure with this code
    Fail(ErrorCode),
}

/// Provider whose behaviour is fixed up front
pub struct ScriptedProvider {
    script: Script,
    delay: Duration,
    requests: Arc<Mutex<Vec<ChatRequest>>>,
}

impl ScriptedProvider {
    /// Provider that answers with `content`
    pub fn replying(content: &str) -> Self {
        Self {
            script: Script::Reply(content.to_owned()),
            delay: Duration::ZERO,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Provider that fails with `code`
    pub fn failing(code: ErrorCode) -> Self {
        Self {
            script: Script::Fail(code),
            delay: Duration::ZERO,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Wait before answering
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Shared handle to the recorded requests
    #[allow(dead_code)]
    pub fn requests(&self) -> Arc<Mutex<Vec<ChatRequest>>> {
        Arc::clone(&self.requests)
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    fn display_name(&self) -> &str {
        "Scripted Provider"
    }

    fn capabilities(&self) -> LlmCapabilities {
        LlmCapabilities::SYSTEM_MESSAGES | LlmCapabilities::JSON_MODE
    }

    fn default_model(&self) -> &str {
        "scripted-1"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        self.requests.lock().unwrap().push(request.clone());
        tokio::time::sleep(self.delay).await;

        match &self.script {
            Script::Reply(content) => Ok(ChatResponse {
                content: content.clone(),
                model: "scripted-1".to_owned(),
                usage: None,
                finish_reason: Some("stop".to_owned()),
            }),
            Script::Fail(code) => Err(AppError::new(*code, "scripted provider failure")),
        }
    }

    async fn health_check(&self) -> Result<bool, AppError> {
        Ok(true)
    }
}
