// ABOUTME: Core data models shared by the coach library and CLI
// ABOUTME: Re-exports coach record and user profile types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Li-Lai-Lian

mod profile;
mod record;

pub use profile::{Target, UserProfile};
pub use record::{CoachRecord, DataMetrics, RecordType};
