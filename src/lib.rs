// ABOUTME: Main library entry point for the NeuroFuel advice relay
// ABOUTME: Relays nutrition profiles to a chat-completion provider with a deterministic local fallback
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # NeuroFuel Relay
//!
//! A small HTTP service that turns a user's nutrition profile, dietary phase
//! and doctor notes into daily advice. Advice comes from an
//! `OpenAI`-compatible completion provider when one is configured, and from
//! the local heuristic engine otherwise or whenever the provider fails.
//!
//! ## Architecture
//!
//! - **Intelligence**: the deterministic advice engine
//! - **LLM**: provider trait, prompt builder, `OpenAI`-compatible client
//! - **Services**: the mock/remote/fallback decision
//! - **Routes** and **Server**: the axum HTTP surface
//! - **Config** and **Logging**: startup configuration and tracing setup
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use neurofuel_relay::intelligence::{AdviceHeuristicEngine, UserProfile};
//!
//! let profile = UserProfile::default().with_field("goalWeight", 170);
//! let advice = AdviceHeuristicEngine::compute(&profile, "PSMF", None);
//! println!("Protein target: {} g", advice.protein_g);
//! ```

/// Environment configuration loaded once at startup
pub mod config;

/// Service identifiers, endpoints, headers, and defaults
pub mod constants;

/// Unified error handling
pub mod errors;

/// Deterministic advice engine
pub mod intelligence;

/// Completion provider abstraction and prompts
pub mod llm;

/// Structured logging setup
pub mod logging;

/// HTTP middleware (CORS, request tracing)
pub mod middleware;

/// HTTP route handlers
pub mod routes;

/// Router assembly and serving
pub mod server;

/// Domain services
pub mod services;
