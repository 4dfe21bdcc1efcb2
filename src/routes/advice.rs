// ABOUTME: Advice route handlers exposing the advice service over HTTP
// ABOUTME: Accepts any request body, answers with the nested-string result envelope
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Advice routes
//!
//! Both the primary path and the legacy alias share one handler. The body is
//! parsed leniently: anything that is not valid JSON is treated as `{}` so a
//! client always receives advice.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderName, HeaderValue},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::{Map, Value};
use tracing::{debug, Span};

use crate::constants::{endpoints, headers};
use crate::errors::AppError;
use crate::intelligence::AdviceInput;
use crate::server::ServerResources;
use crate::services::AdviceEnvelope;

/// Advice routes implementation
pub struct AdviceRoutes;

impl AdviceRoutes {
    /// Create the advice routes bound to shared server resources
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(endpoints::ADVICE, post(Self::handle_advice))
            .route(endpoints::GENERATE_ADVICE, post(Self::handle_advice))
            .with_state(resources)
    }

    /// Generate advice for one request
    async fn handle_advice(
        State(resources): State<Arc<ServerResources>>,
        body: Bytes,
    ) -> Result<Response, AppError> {
        let input = AdviceInput::from_json(&parse_lenient(&body));
        let outcome = resources.advice.generate(&input).await?;

        Span::current().record("advice_source", outcome.source.as_str());

        let source = outcome.source;
        let mut response = Json(AdviceEnvelope::from(outcome)).into_response();
        response.headers_mut().insert(
            HeaderName::from_static(headers::ADVICE_SOURCE),
            HeaderValue::from_static(source.as_str()),
        );
        Ok(response)
    }
}

/// Parse a request body, treating empty or malformed input as an empty object
fn parse_lenient(body: &[u8]) -> Value {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Value::Object(Map::new());
    }

    serde_json::from_slice(body).unwrap_or_else(|e| {
        debug!("Ignoring unparseable advice request body: {e}");
        Value::Object(Map::new())
    })
}
