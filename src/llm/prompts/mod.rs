// ABOUTME: Prompt construction for the remote advice completion call
// ABOUTME: Loads the system prompt at compile time and renders the per-request user message
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Advice Prompts
//!
//! The system prompt lives in a markdown file so it can be edited without
//! touching code. The user message embeds the client's profile, phase, and
//! doctor notes.

use super::ChatMessage;
use crate::intelligence::AdviceInput;

/// `NeuroFuel` advice assistant system prompt
///
/// Instructs the model to answer with a single JSON object of the shape
/// `{hydrationL, proteinG, phase, rules, notes}`.
pub const NEUROFUEL_SYSTEM_PROMPT: &str = include_str!("neurofuel_system.md");

/// Get the system prompt for the advice assistant
#[must_use]
pub const fn get_neurofuel_system_prompt() -> &'static str {
    NEUROFUEL_SYSTEM_PROMPT
}

/// Render the user message for one advice request
#[must_use]
pub fn render_advice_request(input: &AdviceInput) -> String {
    let profile = serde_json::to_string_pretty(input.profile.attributes())
        .unwrap_or_else(|_| "{}".to_owned());
    let notes = input
        .doctor_notes
        .as_deref()
        .filter(|n| !n.trim().is_empty())
        .unwrap_or("none");

    format!(
        "Client profile (weights in pounds):\n{profile}\n\n\
         Dietary phase: {}\n\n\
         Doctor notes: {notes}\n\n\
         Return today's advice as the JSON object described in your instructions.",
        input.protocol
    )
}

/// Build the full message list for one advice request
#[must_use]
pub fn build_advice_messages(input: &AdviceInput) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(get_neurofuel_system_prompt()),
        ChatMessage::user(render_advice_request(input)),
    ]
}
