// ABOUTME: Unified error handling re-exported from the core crate
// ABOUTME: Keeps `crate::errors::*` paths stable for server modules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Unified error handling system with standard error codes and HTTP responses

pub use neurofuel_core::errors::*;
