// ABOUTME: Runs one coaching submission end to end against an LLM provider
// ABOUTME: Assembles parts, calls the model once, and extracts a record or falls back to raw text
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Li-Lai-Lian

//! # Coach Session
//!
//! A session holds the provider, the configured model and the system
//! instruction. It keeps no per-request state: every [`CoachSession::submit`]
//! call is independent and uses only its own profile and submission.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, field, info, instrument, warn, Span};
use uuid::Uuid;

use super::assembler::{assemble, Submission};
use super::extract::{extract_record, ExtractedRecord, ParseFailure};
use crate::config::CoachConfig;
use crate::errors::{AppError, AppResult};
use crate::llm::{coach_system_prompt, GenerateRequest, LlmProvider, ModelInfo, TokenUsage};
use crate::models::{CoachRecord, UserProfile};

/// The model's reply with request metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reply {
    /// Full reply text, exactly as returned
    pub text: String,
    /// Model that produced it
    pub model: String,
    /// Identifier of the submission
    pub submission_id: Uuid,
    /// When the reply arrived
    pub completed_at: DateTime<Utc>,
    /// Token usage, when reported
    pub usage: Option<TokenUsage>,
}

/// Result of a submission that reached the model
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CoachOutcome {
    /// A record was extracted
    Structured {
        /// Parsed record and surrounding remarks
        extracted: ExtractedRecord,
        /// Raw reply
        reply: Reply,
    },
    /// No record could be extracted; show the reply as is
    RawText {
        /// Why extraction failed
        failure: ParseFailure,
        /// Raw reply
        reply: Reply,
    },
}

impl CoachOutcome {
    /// The raw reply, present in both outcomes
    #[must_use]
    pub const fn reply(&self) -> &Reply {
        match self {
            Self::Structured { reply, .. } | Self::RawText { reply, .. } => reply,
        }
    }

    /// The parsed record, if any
    #[must_use]
    pub const fn record(&self) -> Option<&CoachRecord> {
        match self {
            Self::Structured { extracted, .. } => Some(&extracted.record),
            Self::RawText { .. } => None,
        }
    }

    /// Whether a record was extracted
    #[must_use]
    pub const fn is_structured(&self) -> bool {
        matches!(self, Self::Structured { .. })
    }
}

/// Which models the credential can use for coaching
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelDiagnosis {
    /// Model the session is configured with
    pub configured_model: String,
    /// Models that accept `generateContent`
    pub available: Vec<ModelInfo>,
}

impl ModelDiagnosis {
    /// Whether the configured model is in the list
    #[must_use]
    pub fn configured_available(&self) -> bool {
        self.available
            .iter()
            .any(|model| model.id() == self.configured_model)
    }

    /// Whether the key can reach no generation model at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.available.is_empty()
    }
}

/// Coaching session bound to one provider
pub struct CoachSession<P> {
    provider: P,
    model: String,
    temperature: Option<f32>,
    system_instruction: String,
}

impl<P: LlmProvider> CoachSession<P> {
    /// Create a session for `model` with the built-in coach instruction
    #[must_use]
    pub fn new(provider: P, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: None,
            system_instruction: coach_system_prompt().to_owned(),
        }
    }

    /// Create a session using the configured model and temperature
    #[must_use]
    pub fn from_config(provider: P, config: &CoachConfig) -> Self {
        Self::new(provider, config.model.clone()).with_temperature(config.temperature)
    }

    /// Replace the system instruction
    #[must_use]
    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = instruction.into();
        self
    }

    /// Set the sampling temperature
    #[must_use]
    pub const fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    /// Configured model identifier
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Underlying provider
    #[must_use]
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// Send one submission to the coach
    ///
    /// The model is called exactly once. An unparseable reply is not an
    /// error; it comes back as [`CoachOutcome::RawText`].
    ///
    /// # Errors
    ///
    /// Returns an error before any call when the submission is empty or holds
    /// a photo the provider cannot accept, and returns the provider's error
    /// unchanged when the call itself fails.
    #[instrument(skip_all, fields(submission_id = field::Empty, model = %self.model))]
    pub async fn submit(
        &self,
        profile: &UserProfile,
        submission: Submission,
    ) -> AppResult<CoachOutcome> {
        let submission_id = Uuid::new_v4();
        Span::current().record("submission_id", field::display(submission_id));

        if submission.has_image() && !self.provider.capabilities().supports_vision() {
            return Err(AppError::invalid_input(format!(
                "{} cannot read photos; send a text note instead",
                self.provider.display_name()
            )));
        }

        let parts = assemble(profile, submission)?;
        let request = GenerateRequest::new(parts)
            .with_system_instruction(self.system_instruction.clone())
            .with_model(self.model.clone())
            .with_temperature(self.temperature);

        info!(parts = request.parts.len(), has_image = request.has_image(), "Submitting to coach");

        let model_reply = self
            .provider
            .generate(&request)
            .await
            .inspect_err(|e| warn!(code = ?e.code, error = %e, "Coach request failed"))?;
        debug!(text = %model_reply.text, "Raw coach reply");

        let reply = Reply {
            text: model_reply.text,
            model: model_reply.model,
            submission_id,
            completed_at: Utc::now(),
            usage: model_reply.usage,
        };

        let outcome = match extract_record(&reply.text) {
            Ok(extracted) => {
                info!(payload_source = ?extracted.payload_source, "Extracted coach record");
                CoachOutcome::Structured { extracted, reply }
            }
            Err(failure) => {
                info!(reason = %failure.reason, "No record in reply; showing raw text");
                CoachOutcome::RawText { failure, reply }
            }
        };
        Ok(outcome)
    }

    /// List the generation models the credential can use
    ///
    /// # Errors
    ///
    /// Returns an error if the provider cannot list models or the call fails.
    #[instrument(skip(self), fields(model = %self.model))]
    pub async fn diagnose_models(&self) -> AppResult<ModelDiagnosis> {
        if !self.provider.capabilities().supports_model_listing() {
            return Err(AppError::invalid_input(format!(
                "{} does not support listing models",
                self.provider.display_name()
            )));
        }

        let available: Vec<ModelInfo> = self
            .provider
            .list_models()
            .await?
            .into_iter()
            .filter(ModelInfo::supports_generate_content)
            .collect();

        let diagnosis = ModelDiagnosis {
            configured_model: self.model.clone(),
            available,
        };
        info!(
            count = diagnosis.available.len(),
            configured_available = diagnosis.configured_available(),
            "Model diagnosis complete"
        );
        Ok(diagnosis)
    }
}
