// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Service identity, endpoints, environment variable names, and defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Constants are grouped by domain rather than kept in one flat list.

/// Service identity used in logs and health responses
pub mod service_names {
    /// Name reported by the relay server
    pub const NEUROFUEL_RELAY: &str = "neurofuel-relay";
}

/// HTTP endpoints
pub mod endpoints {
    /// Health check endpoint
    pub const HEALTH: &str = "/health";
    /// Readiness endpoint
    pub const READY: &str = "/ready";
    /// Advice generation endpoint
    pub const ADVICE: &str = "/api/advice";
    /// Legacy advice endpoint kept for older web clients
    pub const GENERATE_ADVICE: &str = "/api/generate-advice";
}

/// HTTP header names
pub mod headers {
    /// Request correlation header
    pub const REQUEST_ID: &str = "x-request-id";
    /// Reports which branch produced the advice (mock, remote, fallback)
    pub const ADVICE_SOURCE: &str = "x-advice-source";
}

/// Environment variable names
pub mod env_config {
    /// HTTP listen port
    pub const HTTP_PORT: &str = "HTTP_PORT";
    /// Platform-provided port (fallback for `HTTP_PORT`)
    pub const PORT: &str = "PORT";
    /// Bind address
    pub const HOST: &str = "HOST";
    /// Deployment environment
    pub const ENVIRONMENT: &str = "ENVIRONMENT";
    /// Completion provider credential
    pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
    /// Completion provider base URL
    pub const OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";
    /// Completion model identifier
    pub const OPENAI_MODEL: &str = "OPENAI_MODEL";
    /// Forces the local engine even when a key is configured
    pub const MOCK_MODE: &str = "MOCK_MODE";
    /// Upper bound on the remote completion call
    pub const LLM_TIMEOUT_SECS: &str = "LLM_TIMEOUT_SECS";
    /// Sampling temperature
    pub const LLM_TEMPERATURE: &str = "LLM_TEMPERATURE";
    /// Completion token cap
    pub const LLM_MAX_TOKENS: &str = "LLM_MAX_TOKENS";
    /// Allowed CORS origins (`*` or comma-separated list)
    pub const CORS_ALLOWED_ORIGINS: &str = "CORS_ALLOWED_ORIGINS";
    /// Request body size limit in bytes
    pub const MAX_BODY_BYTES: &str = "MAX_BODY_BYTES";
}

/// Default configuration values
pub mod defaults {
    /// Default HTTP port
    pub const HTTP_PORT: u16 = 3001;
    /// Default bind address
    pub const HOST: &str = "0.0.0.0";
    /// Default completion endpoint
    pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
    /// Default completion model
    pub const OPENAI_MODEL: &str = "gpt-4o-mini";
    /// Default remote call bound in seconds
    pub const LLM_TIMEOUT_SECS: u64 = 20;
    /// Default sampling temperature
    pub const LLM_TEMPERATURE: f32 = 0.4;
    /// Default completion token cap
    pub const LLM_MAX_TOKENS: u32 = 700;
    /// Default request body limit (64 KiB)
    pub const MAX_BODY_BYTES: usize = 64 * 1024;
}
