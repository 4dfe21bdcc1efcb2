// ABOUTME: Request tracing helpers for correlation and structured logging
// ABOUTME: Builds the per-request span recorded by the HTTP trace layer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::headers;
use axum::body::Body;
use http::Request;
use tracing::Span;

/// Create a tracing span for an HTTP request
///
/// The request id is read from `x-request-id`, which the request-id layer
/// sets before this span is created.
pub fn create_request_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get(headers::REQUEST_ID)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = %request.method(),
        path = %request.uri().path(),
        request_id = %request_id,
        advice_source = tracing::field::Empty,
    )
}
