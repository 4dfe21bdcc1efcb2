// ABOUTME: Intelligence module for locally computed nutrition advice
// ABOUTME: Hosts the deterministic heuristic engine and its constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Intelligence Module
//!
//! Local advice generation used when the remote completion provider is
//! disabled or unavailable.

/// Constants for the advice heuristics
pub mod advice_constants;
/// Deterministic advice heuristic engine
pub mod advice_engine;

pub use advice_engine::{
    coerce_number, coerce_text, AdviceHeuristicEngine, AdviceInput, AdvicePayload, UserProfile,
};
