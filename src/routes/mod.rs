// ABOUTME: Route module organization for the NeuroFuel relay HTTP endpoints
// ABOUTME: Provides route definitions organized by domain with thin handlers over services
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Route module for the NeuroFuel relay
//!
//! Each domain module contains only route definitions and thin handler
//! functions that delegate to the service layer.

/// Advice generation routes
pub mod advice;
/// Health check and system status routes
pub mod health;

/// Advice route handlers
pub use advice::AdviceRoutes;
/// Health route handlers
pub use health::HealthRoutes;
