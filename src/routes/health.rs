// ABOUTME: Health check route handlers for service monitoring and status endpoints
// ABOUTME: Reports liveness, readiness, and whether advice is served locally or by the provider
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Health check routes for service monitoring
//!
//! This module provides health and readiness endpoints
//! for monitoring and load balancer health checks.

use std::sync::Arc;

use crate::constants::{endpoints, service_names};
use crate::server::ServerResources;

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create all health check routes
    pub fn routes(resources: Arc<ServerResources>) -> axum::Router {
        use axum::{extract::State, routing::get, Json, Router};

        async fn health_handler(
            State(resources): State<Arc<ServerResources>>,
        ) -> Json<serde_json::Value> {
            let advice = &resources.advice;
            Json(serde_json::json!({
                "status": "healthy",
                "service": service_names::NEUROFUEL_RELAY,
                "version": env!("CARGO_PKG_VERSION"),
                "mode": if advice.is_mock() { "mock" } else { "live" },
                "model": advice.model(),
                "timestamp": chrono::Utc::now().to_rfc3339()
            }))
        }

        async fn ready_handler() -> Json<serde_json::Value> {
            Json(serde_json::json!({
                "status": "ready",
                "timestamp": chrono::Utc::now().to_rfc3339()
            }))
        }

        Router::new()
            .route(endpoints::HEALTH, get(health_handler))
            .route(endpoints::READY, get(ready_handler))
            .with_state(resources)
    }
}
