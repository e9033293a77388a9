// ABOUTME: Main library entry point for the Li-Lai-Lian fitness coach
// ABOUTME: Turns a user profile plus a photo and/or note into coach feedback via a hosted model
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Li-Lai-Lian

#![deny(unsafe_code)]

//! # Li-Lai-Lian
//!
//! A small fitness-coaching front end. Each submission combines the user's
//! profile context, an optional free-text note and an optional photo, sends
//! them to a hosted multimodal model together with the coach persona, and
//! tries to pull a structured [`CoachRecord`](crate::models::CoachRecord) out
//! of the reply. When no record can be extracted the raw reply is still shown.
//!
//! ## Architecture
//!
//! - **coaching**: context tag, prompt assembly, response extraction and the
//!   per-submission session
//! - **llm**: the model boundary (`LlmProvider`) and the Gemini client
//! - **config**: environment-driven configuration
//! - **logging**: tracing subscriber setup
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use lilailian::coaching::{CoachSession, Submission};
//! use lilailian::config::CoachConfig;
//! use lilailian::errors::AppResult;
//! use lilailian::llm::GeminiProvider;
//! use lilailian::models::UserProfile;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let config = CoachConfig::from_env()?;
//!     let session = CoachSession::from_config(GeminiProvider::from_config(&config)?, &config);
//!     let outcome = session
//!         .submit(&UserProfile::default(), Submission::note("雞胸肉便當一個"))
//!         .await?;
//!     println!("{}", outcome.reply().text);
//!     Ok(())
//! }
//! ```

/// Context tag, prompt assembly, response extraction and submission handling
pub mod coaching;

/// Configuration loaded from the environment and command-line overrides
pub mod config;

/// Model boundary and the hosted Gemini client
pub mod llm;

/// Structured logging setup
pub mod logging;

// Re-export the foundation crate modules so callers only depend on `lilailian`
pub use lilailian_core::{constants, errors, models};
