// ABOUTME: Configuration management for the coach front end
// ABOUTME: Environment-only configuration with command-line overrides
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Li-Lai-Lian

//! Configuration module
//!
//! - **coach**: model credential, model identifier, endpoint and timeouts
//! - **types**: log level and deployment environment enums

/// Model connection configuration
pub mod coach;
/// Shared configuration enums
pub mod types;

pub use coach::{ApiKey, CoachConfig, ConfigOverrides};
pub use types::{Environment, LogLevel};
