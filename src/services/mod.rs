// ABOUTME: Domain service layer for business logic extracted from route handlers
// ABOUTME: Hosts the advice service that routes requests to the provider or local engine
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Domain service layer
//!
//! Route handlers stay thin: they parse the request and hand it to a service
//! that owns the decision logic.

/// Advice generation: mock, remote, and fallback paths
pub mod advice;

pub use advice::{AdviceEnvelope, AdviceOutcome, AdviceService, AdviceSource};
