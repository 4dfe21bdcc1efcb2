// ABOUTME: Constants for the local advice heuristics (defaults, bounds, rule text)
// ABOUTME: Keeps every number and template the heuristic engine relies on in one place
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants used by the advice heuristic engine.
//!
//! Weights are in pounds, hydration in litres, protein in grams.

/// Profile defaults applied when a field is absent or not numeric
pub mod profile_defaults {
    /// Current body weight (lb)
    pub const WEIGHT_LBS: f64 = 255.3;
    /// Goal body weight (lb)
    pub const GOAL_WEIGHT_LBS: f64 = 190.0;
    /// Phase label when none is supplied
    pub const PROTOCOL: &str = "Keto";
}

/// Daily protein target anchored to goal (lean) weight
pub mod protein {
    /// Grams of protein per pound of goal weight
    pub const GRAMS_PER_GOAL_LB: f64 = 0.8;
    /// Lower bound of the daily target (g)
    pub const MIN_GRAMS: i64 = 120;
    /// Upper bound of the daily target (g)
    pub const MAX_GRAMS: i64 = 230;
}

/// Daily hydration target
pub mod hydration {
    /// Baseline daily intake (L)
    pub const BASELINE_LITRES: f64 = 3.0;
    /// Uplift applied for larger weight-loss targets (L)
    pub const LARGE_DELTA_UPLIFT_LITRES: f64 = 0.5;
    /// Weight-loss delta above which the uplift applies (lb, exclusive)
    pub const LARGE_DELTA_THRESHOLD_LBS: f64 = 30.0;
    /// Lower bound of the daily target (L)
    pub const MIN_LITRES: f64 = 3.0;
    /// Upper bound of the daily target (L)
    pub const MAX_LITRES: f64 = 5.0;
}

/// Rule text emitted by the engine
pub mod rules {
    /// Phase rule for a fat fast
    pub const FAT_FAST: &str = "Fat Fast: 1000–1200 kcal, 85–90% fat, 3 days max.";
    /// Phase rule for a protein-sparing modified fast
    pub const PSMF: &str = "PSMF: 180–190 g protein, very low fat/carbs, electrolytes daily.";
    /// Meal timing rule
    pub const MEAL_TIMING: &str = "Stop last meal 5–6h before sleep.";
    /// Symptom logging rule
    pub const SYMPTOM_LOG: &str = "Log symptoms (migraine, nausea, IBS) and meds.";
    /// Movement rule
    pub const MOVEMENT: &str = "Movement: 40 min baseline (80% low intensity, 20% HIIT) if energy ok.";
    /// Prefix of the rule echoing doctor notes
    pub const DOCTOR_NOTE_PREFIX: &str = "Note from doctor plan considered: ";
    /// Maximum number of characters of doctor notes echoed back
    pub const DOCTOR_NOTE_MAX_CHARS: usize = 120;
}

/// Explanatory note attached to every locally generated payload
pub const MOCK_MODE_NOTE: &str = "Mock mode active. This advice is generated locally for development. When API billing is ready, disable mock to use NeuroFuel GPT.";
