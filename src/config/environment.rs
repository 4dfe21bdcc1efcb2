// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Loads server, completion provider, and CORS settings once at startup into an explicit struct
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration
//!
//! Configuration is read once at startup and passed to the HTTP layer as a
//! value. Apart from logging setup in `crate::logging`, request handling never
//! reads the process environment.

use crate::constants::{defaults, env_config};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Environment type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Completion provider settings
#[derive(Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Provider credential; `None` forces mock mode
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Explicit mock-mode switch
    pub force_mock: bool,
    /// Base URL of the `OpenAI`-compatible API
    pub base_url: String,
    /// Model identifier
    pub model: String,
    /// Upper bound on one remote completion call
    pub timeout_secs: u64,
    /// Sampling temperature
    pub temperature: f32,
    /// Completion token cap
    pub max_tokens: u32,
}

impl LlmConfig {
    /// Whether requests are answered by the local engine without contacting the provider
    #[must_use]
    pub const fn mock_mode_active(&self) -> bool {
        self.force_mock || self.api_key.is_none()
    }

    /// Remote call bound as a `Duration`
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            force_mock: false,
            base_url: defaults::OPENAI_BASE_URL.to_owned(),
            model: defaults::OPENAI_MODEL.to_owned(),
            timeout_secs: defaults::LLM_TIMEOUT_SECS,
            temperature: defaults::LLM_TEMPERATURE,
            max_tokens: defaults::LLM_MAX_TOKENS,
        }
    }
}

// Manual impl so the credential never reaches logs
impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("force_mock", &self.force_mock)
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

/// Cross-origin settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// `*` or a comma-separated origin list
    pub allowed_origins: String,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: "*".to_owned(),
        }
    }
}

/// Top-level server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,
    /// Bind address
    pub host: String,
    /// Deployment environment
    pub environment: Environment,
    /// Request body limit in bytes
    pub max_body_bytes: usize,
    /// Completion provider settings
    pub llm: LlmConfig,
    /// Cross-origin settings
    pub cors: CorsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: defaults::HTTP_PORT,
            host: defaults::HOST.to_owned(),
            environment: Environment::default(),
            max_body_bytes: defaults::MAX_BODY_BYTES,
            llm: LlmConfig::default(),
            cors: CorsConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from process environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable is set but cannot be parsed
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable is set but cannot be parsed, or
    /// if the provider timeout is zero
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Empty values are treated as unset
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let http_port = match var(env_config::HTTP_PORT).or_else(|| var(env_config::PORT)) {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("Invalid {} value: {raw}", env_config::HTTP_PORT))?,
            None => defaults::HTTP_PORT,
        };

        let timeout_secs = parse_or(
            var(env_config::LLM_TIMEOUT_SECS),
            env_config::LLM_TIMEOUT_SECS,
            defaults::LLM_TIMEOUT_SECS,
        )?;
        if timeout_secs == 0 {
            bail!(
                "Invalid {} value: 0 (must be at least 1 second)",
                env_config::LLM_TIMEOUT_SECS
            );
        }

        let llm = LlmConfig {
            api_key: var(env_config::OPENAI_API_KEY).map(|k| k.trim().to_owned()),
            force_mock: var(env_config::MOCK_MODE).is_some_and(|v| parse_flag(&v)),
            base_url: var(env_config::OPENAI_BASE_URL)
                .unwrap_or_else(|| defaults::OPENAI_BASE_URL.to_owned()),
            model: var(env_config::OPENAI_MODEL)
                .unwrap_or_else(|| defaults::OPENAI_MODEL.to_owned()),
            timeout_secs,
            temperature: parse_or(
                var(env_config::LLM_TEMPERATURE),
                env_config::LLM_TEMPERATURE,
                defaults::LLM_TEMPERATURE,
            )?,
            max_tokens: parse_or(
                var(env_config::LLM_MAX_TOKENS),
                env_config::LLM_MAX_TOKENS,
                defaults::LLM_MAX_TOKENS,
            )?,
        };

        Ok(Self {
            http_port,
            host: var(env_config::HOST).unwrap_or_else(|| defaults::HOST.to_owned()),
            environment: var(env_config::ENVIRONMENT)
                .map(|v| Environment::from_str_or_default(&v))
                .unwrap_or_default(),
            max_body_bytes: parse_or(
                var(env_config::MAX_BODY_BYTES),
                env_config::MAX_BODY_BYTES,
                defaults::MAX_BODY_BYTES,
            )?,
            llm,
            cors: CorsConfig {
                allowed_origins: var(env_config::CORS_ALLOWED_ORIGINS)
                    .unwrap_or_else(|| "*".to_owned()),
            },
        })
    }

    /// Socket address string to bind
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.http_port)
    }

    /// Log-safe configuration summary
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "NeuroFuel Relay Configuration:\n\
             - Bind: {}\n\
             - Environment: {}\n\
             - Advice Mode: {}\n\
             - Provider: {} (model {})\n\
             - API Key: {}\n\
             - Provider Timeout: {}s\n\
             - CORS Origins: {}\n\
             - Max Body: {} bytes",
            self.bind_address(),
            self.environment,
            if self.llm.mock_mode_active() {
                "mock"
            } else {
                "live"
            },
            self.llm.base_url,
            self.llm.model,
            if self.llm.api_key.is_some() {
                "Configured"
            } else {
                "Missing"
            },
            self.llm.timeout_secs,
            self.cors.allowed_origins,
            self.max_body_bytes,
        )
    }
}

/// Interpret a boolean-ish flag value (`true`, `1`, `yes`, `on`)
#[must_use]
pub fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}

/// Parse an optional raw value, falling back to a default when unset
fn parse_or<T>(raw: Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.map_or(Ok(default), |value| {
        value
            .trim()
            .parse()
            .with_context(|| format!("Invalid {key} value: {value}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_variables() {
        let config = ServerConfig::from_lookup(|_| None).unwrap();

        assert_eq!(config.http_port, 3001);
        assert_eq!(config.host, "0.0.0.0");
        assert!(config.llm.mock_mode_active());
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.llm.timeout(), Duration::from_secs(20));
    }

    #[test]
    fn test_port_falls_back_to_platform_variable() {
        let config = ServerConfig::from_lookup(lookup_from(&[("PORT", "8080")])).unwrap();
        assert_eq!(config.http_port, 8080);

        let config =
            ServerConfig::from_lookup(lookup_from(&[("PORT", "8080"), ("HTTP_PORT", "9000")]))
                .unwrap();
        assert_eq!(config.http_port, 9000);
    }

    #[test]
    fn test_invalid_number_is_an_error() {
        let result = ServerConfig::from_lookup(lookup_from(&[("LLM_TIMEOUT_SECS", "soon")]));
        let message = format!("{:#}", result.unwrap_err());
        assert!(message.contains("LLM_TIMEOUT_SECS"));
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let result = ServerConfig::from_lookup(lookup_from(&[("LLM_TIMEOUT_SECS", "0")]));
        let message = format!("{:#}", result.unwrap_err());
        assert!(message.contains("LLM_TIMEOUT_SECS"));
        assert!(message.contains("at least 1 second"));

        let config =
            ServerConfig::from_lookup(lookup_from(&[("LLM_TIMEOUT_SECS", "1")])).unwrap();
        assert_eq!(config.llm.timeout_secs, 1);
    }

    #[test]
    fn test_blank_api_key_means_mock() {
        let config = ServerConfig::from_lookup(lookup_from(&[("OPENAI_API_KEY", "  ")])).unwrap();
        assert!(config.llm.api_key.is_none());
        assert!(config.llm.mock_mode_active());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config =
            ServerConfig::from_lookup(lookup_from(&[("OPENAI_API_KEY", "sk-secret-value")]))
                .unwrap();
        let rendered = format!("{config:?}");

        assert!(!rendered.contains("sk-secret-value"));
        assert!(rendered.contains("[REDACTED]"));
        assert!(!config.summary().contains("sk-secret-value"));
    }
}
