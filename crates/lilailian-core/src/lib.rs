// ABOUTME: Core types and constants for the Li-Lai-Lian fitness coach
// ABOUTME: Foundation crate with error handling, coach record models, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Li-Lai-Lian

#![deny(unsafe_code)]

//! # Li-Lai-Lian Core
//!
//! Foundation crate providing shared types and constants for the coach.
//! This crate is designed to change infrequently, enabling incremental
//! compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError` and `ErrorCode`
//! - **constants**: Environment variable names, defaults and profile labels
//! - **models**: `CoachRecord`, `DataMetrics`, `RecordType`, `UserProfile`, `Target`

/// Unified error handling system with standard error codes
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Core data models (coach records and user profile)
pub mod models;
