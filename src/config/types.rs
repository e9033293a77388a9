// ABOUTME: Small configuration enums shared by the config and logging modules
// ABOUTME: Crate log verbosity and the deployment environment read from ENVIRONMENT
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Li-Lai-Lian

use std::fmt::{Display, Formatter, Result as FmtResult};

/// Verbosity for this crate's own events
///
/// The CLI is quiet by default so stderr stays clean next to the coach's
/// reply; `--verbose` switches to `Debug`, which also logs raw model text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Failures and warnings only
    #[default]
    Warn,
    /// Submission lifecycle
    Info,
    /// Raw replies and request details
    Debug,
}

impl LogLevel {
    /// `Debug` when verbose output was asked for, otherwise `Warn`
    #[must_use]
    pub const fn from_verbose(verbose: bool) -> Self {
        if verbose {
            Self::Debug
        } else {
            Self::Warn
        }
    }

    /// Filter directive spelling
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        }
    }

    /// Matching `tracing` level
    #[must_use]
    pub const fn to_tracing_level(&self) -> tracing::Level {
        match self {
            Self::Warn => tracing::Level::WARN,
            Self::Info => tracing::Level::INFO,
            Self::Debug => tracing::Level::DEBUG,
        }
    }
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    /// Local use (default)
    #[default]
    Development,
    /// Shipped build; logs default to JSON with source locations
    Production,
}

impl Environment {
    /// Parse `ENVIRONMENT`; anything unrecognised is development
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(match self {
            Self::Development => "development",
            Self::Production => "production",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_flag_selects_level() {
        assert_eq!(LogLevel::from_verbose(true), LogLevel::Debug);
        assert_eq!(LogLevel::from_verbose(false), LogLevel::Warn);
        assert_eq!(LogLevel::Debug.to_string(), "debug");
    }

    #[test]
    fn test_environment_parsing() {
        assert_eq!(Environment::from_str_or_default(" PROD "), Environment::Production);
        assert_eq!(Environment::from_str_or_default("staging"), Environment::Development);
    }
}
