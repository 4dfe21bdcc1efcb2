// ABOUTME: HTTP server assembly for the NeuroFuel relay
// ABOUTME: Builds shared resources, wires routes and middleware layers, and serves with graceful shutdown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Server
//!
//! `ServerResources` is built once at startup from an explicit
//! [`ServerConfig`] and shared immutably with every handler.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{extract::DefaultBodyLimit, Router};
use http::HeaderName;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{info, warn, Level};

use crate::config::ServerConfig;
use crate::constants::headers;
use crate::llm::{LlmProvider, OpenAiCompatibleConfig, OpenAiCompatibleProvider};
use crate::middleware::{create_request_span, setup_cors};
use crate::routes::{AdviceRoutes, HealthRoutes};
use crate::services::AdviceService;

/// Shared state handed to every route
pub struct ServerResources {
    /// Configuration loaded at startup
    pub config: Arc<ServerConfig>,
    /// Advice decision service
    pub advice: AdviceService,
}

impl ServerResources {
    /// Build resources from configuration, constructing the remote provider
    /// unless mock mode is active
    ///
    /// # Errors
    ///
    /// Returns an error if the provider HTTP client cannot be created
    pub fn new(config: ServerConfig) -> Result<Self> {
        let provider: Option<Arc<dyn LlmProvider>> = if config.llm.mock_mode_active() {
            None
        } else {
            let provider_config = OpenAiCompatibleConfig::from_llm_config(&config.llm);
            let provider = OpenAiCompatibleProvider::new(provider_config)
                .context("Failed to initialize completion provider")?;
            Some(Arc::new(provider))
        };

        Ok(Self::with_provider(config, provider))
    }

    /// Build resources around an already constructed provider
    #[must_use]
    pub fn with_provider(config: ServerConfig, provider: Option<Arc<dyn LlmProvider>>) -> Self {
        let advice = AdviceService::new(config.llm.clone(), provider);
        Self {
            config: Arc::new(config),
            advice,
        }
    }
}

/// Assemble the full router with all middleware layers
pub fn build_router(resources: &Arc<ServerResources>) -> Router {
    let request_id_header = HeaderName::from_static(headers::REQUEST_ID);

    Router::new()
        .merge(HealthRoutes::routes(Arc::clone(resources)))
        .merge(AdviceRoutes::routes(Arc::clone(resources)))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(
                    request_id_header.clone(),
                    MakeRequestUuid,
                ))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(create_request_span)
                        .on_response(DefaultOnResponse::new().level(Level::INFO)),
                )
                .layer(PropagateRequestIdLayer::new(request_id_header))
                .layer(setup_cors(&resources.config.cors))
                .layer(DefaultBodyLimit::max(resources.config.max_body_bytes)),
        )
}

/// Bind the configured address and serve until a shutdown signal arrives
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails
pub async fn run(resources: Arc<ServerResources>) -> Result<()> {
    let bind_address = resources.config.bind_address();
    let listener = TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind to {bind_address}"))?;

    serve(listener, resources).await
}

/// Serve on an existing listener until a shutdown signal arrives
///
/// # Errors
///
/// Returns an error if the server fails
pub async fn serve(listener: TcpListener, resources: Arc<ServerResources>) -> Result<()> {
    let local_addr = listener
        .local_addr()
        .context("Failed to read listener address")?;
    let app = build_router(&resources);

    info!(
        "NeuroFuel relay listening on http://{local_addr} ({} mode)",
        if resources.advice.is_mock() {
            "mock"
        } else {
            "live"
        }
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("NeuroFuel relay stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to install Ctrl-C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received, draining connections");
}
