// ABOUTME: Deterministic local advice generator used for mock mode and provider fallback
// ABOUTME: Turns a loosely-typed profile, phase label, and doctor notes into a structured advice payload
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Advice Heuristic Engine
//!
//! Pure, total computation of daily advice from a user profile. Inputs arrive
//! from untrusted JSON, so every field is coerced to a default instead of
//! being validated: the engine has no error path.
//!
//! ## Heuristics
//!
//! - Protein: `round(0.8 g × goal weight lb)`, bounded to `[120, 230]` g
//! - Hydration: 3 L, plus 0.5 L when the remaining loss exceeds 30 lb, bounded to `[3, 5]` L
//! - Phase rules: a fat-fast and/or PSMF rule is placed ahead of the baseline rules
//! - Doctor notes: echoed (first 120 characters) as the final rule

use super::advice_constants::{hydration, profile_defaults, protein, rules, MOCK_MODE_NOTE};
use crate::errors::AppResult;
use regex::Regex;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::VecDeque;
use std::sync::LazyLock;

/// Phase label patterns, stored as Option so a bad pattern degrades to "no match"
static FAT_FAST_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)fat\s*fast").ok());

static PSMF_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"(?i)psmf").ok());

fn phase_matches(pattern: &LazyLock<Option<Regex>>, phase: &str) -> bool {
    pattern.as_ref().is_some_and(|re| re.is_match(phase))
}

// ============================================================================
// Input Coercion
// ============================================================================

/// Coerce a JSON value to a finite number
///
/// Numbers and numeric strings are accepted; everything else (including
/// `NaN`/infinite strings) yields `None`.
#[must_use]
pub fn coerce_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

/// Coerce a JSON value to non-empty text
///
/// Strings pass through and `true` or non-zero numbers are stringified.
/// Null, `false`, zero, empty strings, arrays, and objects yield `None`.
#[must_use]
pub fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64().is_some_and(|v| v != 0.0) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_owned()),
        _ => None,
    }
}

/// Open-ended profile attributes supplied by the client
///
/// Only `weight` and `goalWeight` are read; other attributes are carried
/// untouched so they can be forwarded to the remote provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserProfile(Map<String, Value>);

impl UserProfile {
    /// Build a profile from any JSON value; non-objects become an empty profile
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(map) => Self(map.clone()),
            _ => Self::default(),
        }
    }

    /// Set an attribute
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Current weight in pounds, defaulted when absent or not numeric
    #[must_use]
    pub fn weight_lbs(&self) -> f64 {
        self.numeric("weight").unwrap_or(profile_defaults::WEIGHT_LBS)
    }

    /// Goal weight in pounds, defaulted when absent or not numeric
    #[must_use]
    pub fn goal_weight_lbs(&self) -> f64 {
        self.numeric("goalWeight")
            .unwrap_or(profile_defaults::GOAL_WEIGHT_LBS)
    }

    /// Raw attributes
    #[must_use]
    pub const fn attributes(&self) -> &Map<String, Value> {
        &self.0
    }

    fn numeric(&self, key: &str) -> Option<f64> {
        self.0.get(key).and_then(coerce_number)
    }
}

/// Everything the engine (and the remote prompt) needs from one request
#[derive(Debug, Clone, PartialEq)]
pub struct AdviceInput {
    /// Client profile
    pub profile: UserProfile,
    /// Dietary phase label
    pub protocol: String,
    /// Free-text notes from the client's doctor
    pub doctor_notes: Option<String>,
}

impl Default for AdviceInput {
    fn default() -> Self {
        Self {
            profile: UserProfile::default(),
            protocol: profile_defaults::PROTOCOL.to_owned(),
            doctor_notes: None,
        }
    }
}

impl AdviceInput {
    /// Extract input from a request body of any shape
    ///
    /// Reads `userProfile`, `protocol`, and `doctorNotes`; a body that is not
    /// an object yields the defaults.
    #[must_use]
    pub fn from_json(body: &Value) -> Self {
        Self {
            profile: body
                .get("userProfile")
                .map(UserProfile::from_value)
                .unwrap_or_default(),
            protocol: body
                .get("protocol")
                .and_then(coerce_text)
                .unwrap_or_else(|| profile_defaults::PROTOCOL.to_owned()),
            doctor_notes: body.get("doctorNotes").and_then(coerce_text),
        }
    }
}

// ============================================================================
// Output
// ============================================================================

/// Structured advice returned to the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvicePayload {
    /// Daily hydration target (L)
    #[serde(serialize_with = "serialize_whole_as_integer")]
    pub hydration_l: f64,
    /// Daily protein target (g)
    pub protein_g: i64,
    /// Phase label the advice was generated for
    pub phase: String,
    /// Ordered daily rules
    pub rules: Vec<String>,
    /// Explanatory note
    pub notes: String,
}

impl AdvicePayload {
    /// Serialize to the compact JSON string embedded in the response envelope
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails
    pub fn to_json_string(&self) -> AppResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Emit `3` rather than `3.0` so whole litre targets match the wire format clients expect
#[allow(clippy::trivially_copy_pass_by_ref)]
fn serialize_whole_as_integer<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

// ============================================================================
// Engine
// ============================================================================

/// Deterministic advice generator
#[derive(Debug, Clone, Copy, Default)]
pub struct AdviceHeuristicEngine;

impl AdviceHeuristicEngine {
    /// Compute advice for a profile, phase label, and optional doctor notes
    ///
    /// An empty phase label is treated as the default `"Keto"`.
    #[must_use]
    pub fn compute(
        profile: &UserProfile,
        protocol: &str,
        doctor_notes: Option<&str>,
    ) -> AdvicePayload {
        let weight = profile.weight_lbs();
        let goal_weight = profile.goal_weight_lbs();

        let protein_g = Self::protein_target_grams(goal_weight);
        let hydration_l = Self::hydration_target_litres(weight, goal_weight);
        let phase = if protocol.is_empty() {
            profile_defaults::PROTOCOL.to_owned()
        } else {
            protocol.to_owned()
        };

        let mut advice_rules: VecDeque<String> = VecDeque::from([
            format!("Hit ≥ {protein_g} g protein today (shakes + meal 3)."),
            format!("Hydration: {hydration_l} L by bedtime (500–750 mL every 2–3h)."),
            rules::MEAL_TIMING.to_owned(),
            rules::SYMPTOM_LOG.to_owned(),
            rules::MOVEMENT.to_owned(),
        ]);

        // PSMF is checked first, so a label matching both ends with the fat-fast rule on top
        if phase_matches(&PSMF_PATTERN, &phase) {
            advice_rules.push_front(rules::PSMF.to_owned());
        }
        if phase_matches(&FAT_FAST_PATTERN, &phase) {
            advice_rules.push_front(rules::FAT_FAST.to_owned());
        }

        if let Some(notes) = doctor_notes.filter(|n| !n.is_empty()) {
            let excerpt: String = notes.chars().take(rules::DOCTOR_NOTE_MAX_CHARS).collect();
            advice_rules.push_back(format!("{}{excerpt}...", rules::DOCTOR_NOTE_PREFIX));
        }

        AdvicePayload {
            hydration_l,
            protein_g,
            phase,
            rules: advice_rules.into(),
            notes: MOCK_MODE_NOTE.to_owned(),
        }
    }

    /// Compute advice for an extracted request
    #[must_use]
    pub fn compute_for(input: &AdviceInput) -> AdvicePayload {
        Self::compute(
            &input.profile,
            &input.protocol,
            input.doctor_notes.as_deref(),
        )
    }

    /// Daily protein target in grams for a goal weight in pounds
    #[must_use]
    pub fn protein_target_grams(goal_weight_lbs: f64) -> i64 {
        let raw = (protein::GRAMS_PER_GOAL_LB * goal_weight_lbs).round() as i64;
        raw.clamp(protein::MIN_GRAMS, protein::MAX_GRAMS)
    }

    /// Daily hydration target in litres
    #[must_use]
    pub fn hydration_target_litres(weight_lbs: f64, goal_weight_lbs: f64) -> f64 {
        let delta = (weight_lbs - goal_weight_lbs).max(0.0);
        let uplift = if delta > hydration::LARGE_DELTA_THRESHOLD_LBS {
            hydration::LARGE_DELTA_UPLIFT_LITRES
        } else {
            0.0
        };
        (hydration::BASELINE_LITRES + uplift).clamp(hydration::MIN_LITRES, hydration::MAX_LITRES)
    }
}
