// ABOUTME: Tests for loading coach configuration from process environment variables
// ABOUTME: Runs serially because it mutates the shared process environment
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Li-Lai-Lian

// Test files don't require documentation - this is a rustc lint (not clippy)
#![allow(missing_docs)]

use std::env;
use std::time::Duration;

use lilailian::config::{CoachConfig, ConfigOverrides, Environment};
use lilailian::errors::ErrorCode;
use serial_test::serial;

const VARS: [&str; 6] = [
    "GEMINI_API_KEY",
    "LILAILIAN_MODEL",
    "LILAILIAN_API_BASE_URL",
    "LILAILIAN_TEMPERATURE",
    "LILAILIAN_REQUEST_TIMEOUT_SECS",
    "ENVIRONMENT",
];

fn clear_env() {
    for var in VARS {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_from_env_reads_all_variables() {
    clear_env();
    env::set_var("GEMINI_API_KEY", "env-key");
    env::set_var("LILAILIAN_MODEL", "models/gemini-2.5-pro");
    env::set_var("LILAILIAN_API_BASE_URL", "http://localhost:8089/v1beta/");
    env::set_var("LILAILIAN_TEMPERATURE", "0.7");
    env::set_var("LILAILIAN_REQUEST_TIMEOUT_SECS", "15");
    env::set_var("ENVIRONMENT", "production");

    let config = CoachConfig::from_env().unwrap();

    assert_eq!(config.api_key.expose(), "env-key");
    assert_eq!(config.model, "gemini-2.5-pro");
    assert_eq!(config.api_base_url, "http://localhost:8089/v1beta");
    assert_eq!(config.temperature, Some(0.7));
    assert_eq!(config.request_timeout, Duration::from_secs(15));
    assert_eq!(config.environment, Environment::Production);
    clear_env();
}

#[test]
fn test_missing_key_is_configuration_error() {
    let err = CoachConfig::from_lookup(|_| None, ConfigOverrides::default()).unwrap_err();

    assert_eq!(err.code, ErrorCode::ConfigMissing);
    assert_eq!(err.exit_code(), 3);
    assert!(err.message.contains("GEMINI_API_KEY"));
}

#[test]
#[serial]
fn test_cli_overrides_supply_missing_key() {
    clear_env();

    let config = CoachConfig::from_env_with(ConfigOverrides {
        api_key: Some("flag-key".to_owned()),
        model: Some("gemini-2.0-flash".to_owned()),
    })
    .unwrap();

    assert_eq!(config.api_key.expose(), "flag-key");
    assert_eq!(config.model, "gemini-2.0-flash");
}
