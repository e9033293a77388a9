// ABOUTME: Coaching pipeline from user profile and submission to coach outcome
// ABOUTME: Context tag, prompt assembly, reply extraction and per-submission orchestration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Li-Lai-Lian

//! # Coaching
//!
//! One submission flows through four steps:
//!
//! 1. [`context::build_context_tag`] summarizes the profile in one line
//! 2. [`assembler::assemble`] orders the context, the note and the photo
//! 3. the provider is called exactly once (no retries)
//! 4. [`extract::extract_record`] pulls the fenced record out of the reply,
//!    falling back to the raw text when it cannot
//!
//! [`CoachSession`] drives the whole flow.

pub mod assembler;
pub mod context;
pub mod extract;
pub mod session;

pub use assembler::{assemble, Submission};
pub use context::build_context_tag;
pub use extract::{extract_record, ExtractedRecord, FailureReason, ParseFailure, PayloadSource};
pub use session::{CoachOutcome, CoachSession, ModelDiagnosis, Reply};
