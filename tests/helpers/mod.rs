// ABOUTME: Shared test helpers and utilities for integration tests
// ABOUTME: Exports the axum request helper, a scripted provider, and router builders
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

pub mod axum_test;
pub mod scripted_provider;

use neurofuel_relay::config::{LlmConfig, ServerConfig};
use neurofuel_relay::llm::LlmProvider;
use neurofuel_relay::server::{build_router, ServerResources};
use std::sync::Arc;

/// Configuration with a credential so the remote path is taken
#[allow(dead_code)]
pub fn live_config(timeout_secs: u64) -> ServerConfig {
    ServerConfig {
        llm: LlmConfig {
            api_key: Some("sk-test-key".to_owned()),
            timeout_secs,
            ..LlmConfig::default()
        },
        ..ServerConfig::default()
    }
}

/// Full router with every middleware layer
#[allow(dead_code)]
pub fn router_with(config: ServerConfig, provider: Option<Arc<dyn LlmProvider>>) -> axum::Router {
    let resources = Arc::new(ServerResources::with_provider(config, provider));
    build_router(&resources)
}

/// Full router in mock mode
#[allow(dead_code)]
pub fn mock_router() -> axum::Router {
    router_with(ServerConfig::default(), None)
}
