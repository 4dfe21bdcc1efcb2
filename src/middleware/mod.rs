// ABOUTME: HTTP middleware for request tracing and cross-origin access
// ABOUTME: Provides CORS configuration and the request span used by the trace layer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub mod cors;
pub mod tracing;

// CORS configuration
pub use cors::setup_cors;

// Request tracing
pub use self::tracing::create_request_span;
