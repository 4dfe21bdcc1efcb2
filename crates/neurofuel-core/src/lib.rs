// ABOUTME: Core types and constants for the NeuroFuel advice relay
// ABOUTME: Foundation crate with error handling and shared constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # `NeuroFuel` Core
//!
//! Foundation crate shared by the relay server. It changes rarely, which keeps
//! incremental builds of the server crate fast.
//!
//! ## Modules
//!
//! - **errors**: `AppError`, `ErrorCode`, and the JSON error body
//! - **constants**: endpoints, header names, environment variable names, defaults

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Application constants organized by domain
pub mod constants;
