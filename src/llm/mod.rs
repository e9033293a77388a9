// ABOUTME: Model boundary for the coach: content parts in, free-form text out
// ABOUTME: Defines the LlmProvider contract, request/response types and capability flags
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Li-Lai-Lian

//! # LLM Provider Interface
//!
//! The coach depends on one external capability: send an ordered list of
//! text and image parts plus a system instruction, get text back. This module
//! defines that contract so the session can be exercised against any
//! implementation, and provides [`GeminiProvider`] for the hosted model.
//!
//! ## Key Concepts
//!
//! - **`ContentPart`**: one text or image part of a single user turn
//! - **`GenerateRequest`**: ordered parts, system instruction and sampling options
//! - **`ModelReply`**: the model's raw text, treated as untrusted input
//! - **`LlmProvider`**: async trait implemented by model clients
//!
//! ## Example: Using a Provider
//!
//! ```rust,no_run
//! use lilailian::llm::{ContentPart, GenerateRequest, LlmProvider};
//!
//! async fn example(provider: &dyn LlmProvider) {
//!     let request = GenerateRequest::new(vec![ContentPart::text("Hello coach")])
//!         .with_system_instruction("You are a strict fitness coach.");
//!     let reply = provider.generate(&request).await;
//! }
//! ```

mod content;
mod gemini;
pub mod prompts;

pub use content::{ContentPart, ImageAttachment, ImageFormat};
pub use gemini::GeminiProvider;
pub use prompts::coach_system_prompt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::constants::model_defaults;
use crate::errors::AppError;

// ============================================================================
// Capability Flags
// ============================================================================

bitflags::bitflags! {
    /// Provider capability flags
    ///
    /// Checked before a request is sent so unsupported inputs fail early.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct LlmCapabilities: u8 {
        /// Provider accepts image parts
        const VISION = 0b0000_0001;
        /// Provider can list the models visible to the credential
        const MODEL_LISTING = 0b0000_0010;
    }
}

impl LlmCapabilities {
    /// Capabilities of a text-only provider
    #[must_use]
    pub const fn text_only() -> Self {
        Self::empty()
    }

    /// Capabilities of a full multimodal provider
    #[must_use]
    pub const fn multimodal() -> Self {
        Self::VISION.union(Self::MODEL_LISTING)
    }

    /// Check if image input is supported
    #[must_use]
    pub const fn supports_vision(&self) -> bool {
        self.contains(Self::VISION)
    }

    /// Check if model listing is supported
    #[must_use]
    pub const fn supports_model_listing(&self) -> bool {
        self.contains(Self::MODEL_LISTING)
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// A single model invocation
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    /// Ordered content parts of the user turn
    pub parts: Vec<ContentPart>,
    /// Persona and output-format instruction
    pub system_instruction: Option<String>,
    /// Model identifier (provider default when `None`)
    pub model: Option<String>,
    /// Temperature for response randomness (0.0 - 2.0)
    pub temperature: Option<f32>,
}

impl GenerateRequest {
    /// Create a request from ordered parts
    #[must_use]
    pub const fn new(parts: Vec<ContentPart>) -> Self {
        Self {
            parts,
            system_instruction: None,
            model: None,
            temperature: None,
        }
    }

    /// Set the system instruction
    #[must_use]
    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    /// Set the model to use
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the temperature
    #[must_use]
    pub const fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    /// Whether any part is an image
    #[must_use]
    pub fn has_image(&self) -> bool {
        self.parts.iter().any(ContentPart::is_image)
    }
}

/// Text returned by the model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelReply {
    /// Full reply text, unvalidated
    pub text: String,
    /// Model used for generation
    pub model: String,
    /// Token usage statistics
    pub usage: Option<TokenUsage>,
    /// Finish reason reported by the provider
    pub finish_reason: Option<String>,
}

/// Token usage statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Number of tokens in the prompt
    pub prompt_tokens: u32,
    /// Number of tokens in the completion
    pub completion_tokens: u32,
    /// Total tokens used
    pub total_tokens: u32,
}

/// A model visible to the configured credential
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Resource name, e.g. `models/gemini-2.5-flash`
    pub name: String,
    /// Human-readable name
    pub display_name: Option<String>,
    /// Generation methods the model accepts
    pub supported_methods: Vec<String>,
}

impl ModelInfo {
    /// Identifier without the `models/` prefix
    #[must_use]
    pub fn id(&self) -> &str {
        self.name.strip_prefix("models/").unwrap_or(&self.name)
    }

    /// Whether the model can serve `generateContent`
    #[must_use]
    pub fn supports_generate_content(&self) -> bool {
        self.supported_methods
            .iter()
            .any(|m| m == model_defaults::GENERATE_CONTENT_METHOD)
    }
}

// ============================================================================
// Provider Trait
// ============================================================================

/// LLM provider trait for single-shot multimodal generation
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Unique provider identifier (e.g., "gemini")
    fn name(&self) -> &'static str;

    /// Human-readable display name for the provider
    fn display_name(&self) -> &'static str;

    /// Provider capabilities
    fn capabilities(&self) -> LlmCapabilities;

    /// Model used when a request does not name one
    fn default_model(&self) -> &str;

    /// Perform one generation call; never retried by the caller
    async fn generate(&self, request: &GenerateRequest) -> Result<ModelReply, AppError>;

    /// List the models visible to the credential
    async fn list_models(&self) -> Result<Vec<ModelInfo>, AppError>;

    /// Check if the provider is reachable and the credential is accepted
    async fn health_check(&self) -> Result<bool, AppError>;
}
