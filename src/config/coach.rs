// ABOUTME: Coach configuration resolved from environment variables and CLI overrides
// ABOUTME: Validates the API credential, model identifier, base URL, temperature and timeout
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Li-Lai-Lian

use std::env;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

use tracing::{debug, info};

use super::Environment;
use crate::constants::{env_vars, model_defaults};
use crate::errors::{AppError, AppResult};

/// Model credential, never printed
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Validate and wrap a raw key
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the key is blank or contains whitespace.
    pub fn parse(raw: &str) -> AppResult<Self> {
        let key = raw.trim();
        if key.is_empty() {
            return Err(AppError::config_missing(env_vars::GEMINI_API_KEY));
        }
        if key.chars().any(char::is_whitespace) {
            return Err(AppError::config(format!(
                "{} must not contain whitespace",
                env_vars::GEMINI_API_KEY
            )));
        }
        Ok(Self(key.to_owned()))
    }

    /// The raw key, for building requests
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl Debug for ApiKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str("[REDACTED]")
    }
}

/// Values given on the command line; they win over the environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// `--api-key`
    pub api_key: Option<String>,
    /// `--model`
    pub model: Option<String>,
}

/// Everything needed to talk to the hosted model
#[derive(Debug, Clone)]
pub struct CoachConfig {
    /// Credential for the model API
    pub api_key: ApiKey,
    /// Model identifier, without the `models/` prefix
    pub model: String,
    /// API base URL without a trailing slash
    pub api_base_url: String,
    /// Optional sampling temperature
    pub temperature: Option<f32>,
    /// Transport timeout for a single model call
    pub request_timeout: Duration,
    /// Deployment environment
    pub environment: Environment,
}

impl CoachConfig {
    /// Load configuration from process environment (and `.env` if present)
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the API key is missing or any value is invalid.
    pub fn from_env() -> AppResult<Self> {
        Self::from_env_with(ConfigOverrides::default())
    }

    /// Load configuration from the environment, applying CLI overrides
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the API key is missing or any value is invalid.
    pub fn from_env_with(overrides: ConfigOverrides) -> AppResult<Self> {
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file loaded: {}", e);
        }
        let config = Self::from_lookup(|key| env::var(key).ok(), overrides)?;
        info!(
            model = %config.model,
            environment = %config.environment,
            "Coach configuration loaded"
        );
        Ok(config)
    }

    /// Build configuration from an arbitrary key lookup
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the API key is missing or any value is invalid.
    pub fn from_lookup<F>(lookup: F, overrides: ConfigOverrides) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_key = overrides
            .api_key
            .or_else(|| lookup(env_vars::GEMINI_API_KEY))
            .ok_or_else(|| AppError::config_missing(env_vars::GEMINI_API_KEY))?;
        let api_key = ApiKey::parse(&raw_key)?;

        let model = normalize_model(
            &overrides
                .model
                .or_else(|| lookup(env_vars::MODEL))
                .unwrap_or_else(|| model_defaults::MODEL.to_owned()),
        )?;

        let api_base_url = parse_base_url(
            &lookup(env_vars::API_BASE_URL)
                .unwrap_or_else(|| model_defaults::API_BASE_URL.to_owned()),
        )?;

        let temperature = lookup(env_vars::TEMPERATURE)
            .map(|raw| parse_temperature(&raw))
            .transpose()?;

        let request_timeout = lookup(env_vars::REQUEST_TIMEOUT_SECS)
            .map_or(Ok(model_defaults::REQUEST_TIMEOUT_SECS), |raw| {
                parse_timeout_secs(&raw)
            })
            .map(Duration::from_secs)?;

        let environment = lookup(env_vars::ENVIRONMENT)
            .map(|raw| Environment::from_str_or_default(&raw))
            .unwrap_or_default();

        Ok(Self {
            api_key,
            model,
            api_base_url,
            temperature,
            request_timeout,
            environment,
        })
    }
}

/// Accept both `gemini-2.5-flash` and the listed form `models/gemini-2.5-flash`
fn normalize_model(raw: &str) -> AppResult<String> {
    let trimmed = raw.trim();
    let model = trimmed.strip_prefix("models/").unwrap_or(trimmed);
    if model.is_empty() || model.contains(char::is_whitespace) || model.contains('/') {
        return Err(AppError::config(format!(
            "{} must be a bare model identifier such as '{}', got '{raw}'",
            env_vars::MODEL,
            model_defaults::MODEL
        )));
    }
    Ok(model.to_owned())
}

fn parse_base_url(raw: &str) -> AppResult<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("https://") || trimmed.starts_with("http://")) {
        return Err(AppError::config(format!(
            "{} must be an http(s) URL, got '{raw}'",
            env_vars::API_BASE_URL
        )));
    }
    Ok(trimmed.to_owned())
}

fn parse_temperature(raw: &str) -> AppResult<f32> {
    let value: f32 = raw.trim().parse().map_err(|_| {
        AppError::config(format!(
            "{} must be a number, got '{raw}'",
            env_vars::TEMPERATURE
        ))
    })?;
    if !(0.0..=2.0).contains(&value) {
        return Err(AppError::config(format!(
            "{} must be between 0.0 and 2.0, got {value}",
            env_vars::TEMPERATURE
        )));
    }
    Ok(value)
}

fn parse_timeout_secs(raw: &str) -> AppResult<u64> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(AppError::config(format!(
            "{} must be a positive whole number of seconds, got '{raw}'",
            env_vars::REQUEST_TIMEOUT_SECS
        ))),
    }
}
