// ABOUTME: Shared test utilities for the lilailian integration tests
// ABOUTME: Provides quiet logging, image fixtures, test configuration and a scripted provider
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Li-Lai-Lian
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]
//! Shared test utilities for `lilailian`

use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;
use lilailian::config::{CoachConfig, ConfigOverrides};
use lilailian::errors::{AppError, ErrorCode};
use lilailian::llm::{
    GenerateRequest, ImageAttachment, LlmCapabilities, LlmProvider, ModelInfo, ModelReply,
};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            Ok("WARN" | "ERROR") | _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

// ============================================================================
// Image Fixtures
// ============================================================================

/// PNG signature followed by an IHDR chunk header
pub const PNG_BYTES: [u8; 16] = [
    0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, b'I', b'H', b'D', b'R',
];

/// JPEG SOI marker followed by a JFIF APP0 header
pub const JPEG_BYTES: [u8; 11] = [
    0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00,
];

pub fn png_attachment() -> ImageAttachment {
    ImageAttachment::from_bytes(PNG_BYTES.to_vec()).unwrap()
}

pub fn jpeg_attachment() -> ImageAttachment {
    ImageAttachment::from_bytes(JPEG_BYTES.to_vec()).unwrap()
}

// ============================================================================
// Configuration
// ============================================================================

pub const TEST_API_KEY: &str = "test-key";
pub const TEST_MODEL: &str = "gemini-test";

/// Configuration pointing at a local mock server
pub fn test_config(base_url: &str) -> CoachConfig {
    let base_url = base_url.to_owned();
    CoachConfig::from_lookup(
        move |key: &str| match key {
            "GEMINI_API_KEY" => Some(TEST_API_KEY.to_owned()),
            "LILAILIAN_MODEL" => Some(TEST_MODEL.to_owned()),
            "LILAILIAN_API_BASE_URL" => Some(base_url.clone()),
            "LILAILIAN_REQUEST_TIMEOUT_SECS" => Some("5".to_owned()),
            _ => None,
        },
        ConfigOverrides::default(),
    )
    .unwrap()
}

// ============================================================================
// Scripted Provider
// ============================================================================

/// What the scripted provider answers
#[derive(Debug, Clone)]
pub enum Script {
    /// Reply with this text
    Text(String),
    /// Fail with this code and message
    Fail(ErrorCode, String),
}

/// Provider that replays a script and records every request
#[derive(Clone)]
pub struct ScriptedProvider {
    script: Script,
    capabilities: LlmCapabilities,
    models: Vec<ModelInfo>,
    requests: Arc<Mutex<Vec<GenerateRequest>>>,
}

impl ScriptedProvider {
    pub fn replying(text: impl Into<String>) -> Self {
        Self {
            script: Script::Text(text.into()),
            capabilities: LlmCapabilities::multimodal(),
            models: Vec::new(),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            script: Script::Fail(code, message.into()),
            ..Self::replying("")
        }
    }

    pub fn with_capabilities(mut self, capabilities: LlmCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn with_models(mut self, models: Vec<ModelInfo>) -> Self {
        self.models = models;
        self
    }

    /// Shared handle to the recorded requests
    pub fn requests(&self) -> Arc<Mutex<Vec<GenerateRequest>>> {
        Arc::clone(&self.requests)
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn display_name(&self) -> &'static str {
        "Scripted Provider"
    }

    fn capabilities(&self) -> LlmCapabilities {
        self.capabilities
    }

    fn default_model(&self) -> &str {
        TEST_MODEL
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<ModelReply, AppError> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.script {
            Script::Text(text) => Ok(ModelReply {
                text: text.clone(),
                model: request
                    .model
                    .clone()
                    .unwrap_or_else(|| TEST_MODEL.to_owned()),
                usage: None,
                finish_reason: Some("STOP".to_owned()),
            }),
            Script::Fail(code, message) => Err(AppError::new(*code, message.clone())),
        }
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>, AppError> {
        Ok(self.models.clone())
    }

    async fn health_check(&self) -> Result<bool, AppError> {
        Ok(true)
    }
}

/// Model entry as returned by a listing
pub fn model_info(id: &str, methods: &[&str]) -> ModelInfo {
    ModelInfo {
        name: format!("models/{id}"),
        display_name: None,
        supported_methods: methods.iter().map(|m| (*m).to_owned()).collect(),
    }
}
