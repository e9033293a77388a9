// ABOUTME: System prompt for the coach persona loaded at compile time
// ABOUTME: Describes the persona, the context line and the JSON record layout the model must emit
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Li-Lai-Lian

//! # System Prompts
//!
//! Prompts are loaded at compile time from markdown files for easy maintenance.

/// Coach persona and output-format instruction
///
/// Contains:
/// - Role and tone (Taiwanese Mandarin, strict during fat loss)
/// - How to use the per-request context line
/// - The fenced JSON record layout, with free text allowed outside the block
pub const COACH_SYSTEM_PROMPT: &str = include_str!("coach_system.md");

/// Get the default system instruction for coaching requests
#[must_use]
pub const fn coach_system_prompt() -> &'static str {
    COACH_SYSTEM_PROMPT
}
