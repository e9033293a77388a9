// ABOUTME: Application constants organized by domain
// ABOUTME: Environment variable names, model defaults and user profile defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Li-Lai-Lian

//! Constants module
//!
//! Constants are grouped into small domain modules rather than a single flat list.

/// Service identity used in structured logs
pub mod service_names {
    /// The coach front end
    pub const LILAILIAN: &str = "lilailian";
}

/// Environment variable names read by the configuration layer
pub mod env_vars {
    /// API key for the hosted model
    pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
    /// Model identifier override
    pub const MODEL: &str = "LILAILIAN_MODEL";
    /// API base URL override
    pub const API_BASE_URL: &str = "LILAILIAN_API_BASE_URL";
    /// Sampling temperature override
    pub const TEMPERATURE: &str = "LILAILIAN_TEMPERATURE";
    /// Request timeout in seconds
    pub const REQUEST_TIMEOUT_SECS: &str = "LILAILIAN_REQUEST_TIMEOUT_SECS";
    /// Deployment environment name
    pub const ENVIRONMENT: &str = "ENVIRONMENT";
    /// Log output format
    pub const LOG_FORMAT: &str = "LOG_FORMAT";
}

/// Defaults for the hosted model connection
pub mod model_defaults {
    /// Default model identifier
    pub const MODEL: &str = "gemini-2.5-flash";
    /// Default base URL of the Generative Language API
    pub const API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
    /// Default transport timeout
    pub const REQUEST_TIMEOUT_SECS: u64 = 60;
    /// Generation method a model must support to be usable
    pub const GENERATE_CONTENT_METHOD: &str = "generateContent";
}

/// Defaults for the user profile form
pub mod profile_defaults {
    /// Default display name
    pub const NAME: &str = "帥哥";
    /// Default total daily energy expenditure (kcal)
    pub const TDEE: u32 = 2200;
    /// Default body-fat percentage
    pub const BODY_FAT_PCT: f64 = 25.0;
}

/// Labels rendered into the context tag and the structured view
pub mod labels {
    /// Fat loss target
    pub const TARGET_FAT_LOSS: &str = "減脂";
    /// Muscle gain target
    pub const TARGET_MUSCLE_GAIN: &str = "增肌";
    /// Maintenance target
    pub const TARGET_MAINTAIN: &str = "維持";
    /// Shown when the record carries no coach comment
    pub const MISSING_COACH_COMMENT: &str = "沒抓到建議";
    /// Prefix of the free-text note content part
    pub const USER_NOTE_PREFIX: &str = "User Note: ";
}
