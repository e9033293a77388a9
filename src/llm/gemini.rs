// ABOUTME: Google Gemini provider for single-turn multimodal coaching requests
// ABOUTME: Sends text and inline image parts to generateContent and lists available models
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Li-Lai-Lian

//! # Gemini Provider
//!
//! Implementation of the `LlmProvider` trait for Google's Gemini models.
//!
//! ## Configuration
//!
//! Set the `GEMINI_API_KEY` environment variable with your API key from
//! Google AI Studio. The model defaults to `gemini-2.5-flash` and can be
//! changed with `LILAILIAN_MODEL`; run `lilailian models` to see which
//! identifiers your key can use.
//!
//! ## Example
//!
//! ```rust,no_run
//! use lilailian::config::CoachConfig;
//! use lilailian::llm::{ContentPart, GeminiProvider, GenerateRequest, LlmProvider};
//! use lilailian::errors::AppError;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), AppError> {
//!     let config = CoachConfig::from_env()?;
//!     let provider = GeminiProvider::from_config(&config)?;
//!     let request = GenerateRequest::new(vec![ContentPart::text("兩顆水煮蛋")]);
//!     let reply = provider.generate(&request).await?;
//!     println!("{}", reply.text);
//!     Ok(())
//! }
//! ```

use std::fmt::{Debug, Formatter, Result as FmtResult};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use super::{
    ContentPart, GenerateRequest, LlmCapabilities, LlmProvider, ModelInfo, ModelReply, TokenUsage,
};
use crate::config::{ApiKey, CoachConfig};
use crate::constants::model_defaults;
use crate::errors::AppError;

/// Service name used in error messages
const SERVICE_NAME: &str = "Gemini";

/// Header carrying the API key; keeps the key out of URLs and transport errors
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Largest page size accepted by the model listing endpoint
const LIST_PAGE_SIZE: &str = "1000";

// ============================================================================
// API Request/Response Types
// ============================================================================

/// Gemini API request structure
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

/// Content structure for Gemini API
#[derive(Debug, Serialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<RequestPart>,
}

/// Outgoing part (text or inline image)
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum RequestPart {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: Blob,
    },
}

/// Base64 payload with its MIME type
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Blob {
    mime_type: &'static str,
    data: String,
}

/// Generation configuration
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    candidate_count: Option<u32>,
}

/// Gemini API response structure
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    candidates: Option<Vec<Candidate>>,
    usage_metadata: Option<UsageMetadata>,
    prompt_feedback: Option<PromptFeedback>,
    error: Option<GeminiError>,
}

/// Response candidate
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

/// Incoming part; non-text parts deserialize with `text: None`
#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
    #[serde(default)]
    thought: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

/// Usage metadata from Gemini API response
#[derive(Debug, Deserialize)]
struct UsageMetadata {
    #[serde(rename = "promptTokenCount")]
    prompt: Option<u32>,
    #[serde(rename = "candidatesTokenCount")]
    candidates: Option<u32>,
    #[serde(rename = "totalTokenCount")]
    total: Option<u32>,
}

/// API error response from Gemini
#[derive(Debug, Deserialize)]
struct GeminiError {
    message: String,
    status: Option<String>,
}

/// One page of `GET /models`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<GeminiModel>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiModel {
    name: String,
    display_name: Option<String>,
    #[serde(default)]
    supported_generation_methods: Vec<String>,
}

impl From<GeminiModel> for ModelInfo {
    fn from(model: GeminiModel) -> Self {
        Self {
            name: model.name,
            display_name: model.display_name,
            supported_methods: model.supported_generation_methods,
        }
    }
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// Google Gemini LLM provider
pub struct GeminiProvider {
    api_key: ApiKey,
    client: Client,
    base_url: String,
    default_model: String,
}

impl GeminiProvider {
    /// Create a provider with default endpoint and model
    #[must_use]
    pub fn new(api_key: ApiKey) -> Self {
        Self {
            api_key,
            client: Client::new(),
            base_url: model_defaults::API_BASE_URL.to_owned(),
            default_model: model_defaults::MODEL.to_owned(),
        }
    }

    /// Create a provider from resolved configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn from_config(config: &CoachConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AppError::internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_key: config.api_key.clone(),
            client,
            base_url: config.api_base_url.clone(),
            default_model: config.model.clone(),
        })
    }

    fn resolve_model<'a>(&'a self, request: &'a GenerateRequest) -> &'a str {
        request.model.as_deref().unwrap_or(&self.default_model)
    }

    /// Build the API URL for a model and method
    fn build_url(&self, model: &str, method: &str) -> String {
        format!("{}/models/{model}:{method}", self.base_url)
    }

    fn convert_part(part: &ContentPart) -> RequestPart {
        match part {
            ContentPart::Text(text) => RequestPart::Text { text: text.clone() },
            ContentPart::Image(image) => RequestPart::InlineData {
                inline_data: Blob {
                    mime_type: image.format().mime_type(),
                    data: image.to_base64(),
                },
            },
        }
    }

    /// Build a Gemini API request: one user turn holding every part in order
    fn build_gemini_request(request: &GenerateRequest) -> GeminiRequest {
        let contents = vec![GeminiContent {
            role: Some("user"),
            parts: request.parts.iter().map(Self::convert_part).collect(),
        }];

        let system_instruction = request
            .system_instruction
            .as_ref()
            .map(|instruction| GeminiContent {
                role: None,
                parts: vec![RequestPart::Text {
                    text: instruction.clone(),
                }],
            });

        let generation_config = request.temperature.map(|temperature| GenerationConfig {
            temperature: Some(temperature),
            candidate_count: Some(1),
        });

        GeminiRequest {
            contents,
            system_instruction,
            generation_config,
        }
    }

    /// Concatenate the text parts of the first candidate, skipping thought summaries
    fn extract_content(response: &GeminiResponse) -> Result<String, AppError> {
        let Some(candidate) = response.candidates.as_ref().and_then(|c| c.first()) else {
            let reason = response
                .prompt_feedback
                .as_ref()
                .and_then(|f| f.block_reason.as_deref());
            return Err(reason.map_or_else(
                || AppError::external_service(SERVICE_NAME, "response contained no candidates"),
                |reason| {
                    AppError::external_service(
                        SERVICE_NAME,
                        format!("request was blocked ({reason}); try a different photo or note"),
                    )
                },
            ));
        };

        let texts: Vec<&str> = candidate
            .content
            .as_ref()
            .map(|c| {
                c.parts
                    .iter()
                    .filter(|p| !p.thought)
                    .filter_map(|p| p.text.as_deref())
                    .collect()
            })
            .unwrap_or_default();

        if texts.is_empty() {
            let reason = candidate.finish_reason.as_deref().unwrap_or("UNKNOWN");
            return Err(AppError::external_service(
                SERVICE_NAME,
                format!("model returned no text (finish reason: {reason})"),
            ));
        }

        Ok(texts.concat())
    }

    /// Convert usage metadata to our token usage format
    fn convert_usage(metadata: &UsageMetadata) -> TokenUsage {
        TokenUsage {
            prompt_tokens: metadata.prompt.unwrap_or(0),
            completion_tokens: metadata.candidates.unwrap_or(0),
            total_tokens: metadata.total.unwrap_or(0),
        }
    }

    fn map_transport_error(error: &reqwest::Error) -> AppError {
        let message = if error.is_timeout() {
            "request timed out".to_owned()
        } else if error.is_connect() {
            "could not connect to the AI service".to_owned()
        } else {
            format!("request failed: {error}")
        };
        AppError::external_unavailable(message)
    }

    /// Map API error status to appropriate error type
    ///
    /// `model` is the identifier the failing call targeted, if any.
    fn map_api_error(status: StatusCode, response_text: &str, model: Option<&str>) -> AppError {
        let parsed = serde_json::from_str::<GeminiResponse>(response_text)
            .ok()
            .and_then(|r| r.error);
        let api_status = parsed.as_ref().and_then(|e| e.status.clone());
        let message = parsed.map_or_else(|| response_text.trim().to_owned(), |e| e.message);

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                AppError::external_auth(format!("the API key was rejected: {message}"))
            }
            // An invalid key is reported as a 400 with an INVALID_ARGUMENT status
            StatusCode::BAD_REQUEST
                if api_status.as_deref() == Some("INVALID_ARGUMENT")
                    && message.contains("API key") =>
            {
                AppError::external_auth(format!("the API key was rejected: {message}"))
            }
            StatusCode::NOT_FOUND => model.map_or_else(
                || AppError::external_service(SERVICE_NAME, format!("not found: {message}")),
                |model| AppError::model_not_found(model, message.clone()),
            ),
            StatusCode::TOO_MANY_REQUESTS => {
                AppError::external_rate_limited(Self::extract_quota_message(&message))
            }
            s if s.is_server_error() => AppError::external_unavailable(format!(
                "{SERVICE_NAME} returned {}: {message}",
                s.as_u16()
            )),
            s => AppError::external_service(SERVICE_NAME, format!("({}) {message}", s.as_u16())),
        }
    }

    /// Extract a user-friendly quota/rate limit message from Gemini error
    fn extract_quota_message(message: &str) -> String {
        const RETRY_PREFIX: &str = "Please retry in ";
        // Example: "Please retry in 6.406453963s."
        if let Some(retry_pos) = message.find(RETRY_PREFIX) {
            let after_prefix = &message[retry_pos + RETRY_PREFIX.len()..];
            if let Some(s_pos) = after_prefix.find('s') {
                if let Ok(seconds) = after_prefix[..s_pos].parse::<f64>() {
                    let seconds_int = seconds.ceil() as u64;
                    return format!(
                        "AI service quota exceeded. Please try again in {seconds_int} seconds."
                    );
                }
            }
        }
        "AI service quota exceeded. Please wait a moment and try again.".to_owned()
    }

    /// Send a request and return the body of a successful response
    async fn send(
        &self,
        builder: reqwest::RequestBuilder,
        model: Option<&str>,
    ) -> Result<String, AppError> {
        let response = builder
            .header(API_KEY_HEADER, self.api_key.expose())
            .send()
            .await
            .map_err(|e| Self::map_transport_error(&e))?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| Self::map_transport_error(&e))?;

        if !status.is_success() {
            error!(status = %status, "Gemini API error");
            return Err(Self::map_api_error(status, &response_text, model));
        }
        Ok(response_text)
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    fn display_name(&self) -> &'static str {
        "Google Gemini"
    }

    fn capabilities(&self) -> LlmCapabilities {
        LlmCapabilities::multimodal()
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }

    #[instrument(skip_all, fields(model = %self.resolve_model(request), parts = request.parts.len()))]
    async fn generate(&self, request: &GenerateRequest) -> Result<ModelReply, AppError> {
        let model = self.resolve_model(request);
        let url = self.build_url(model, model_defaults::GENERATE_CONTENT_METHOD);
        let gemini_request = Self::build_gemini_request(request);

        debug!("Sending request to Gemini API");

        let response_text = self
            .send(self.client.post(&url).json(&gemini_request), Some(model))
            .await?;

        let gemini_response: GeminiResponse =
            serde_json::from_str(&response_text).map_err(|e| {
                error!(error = %e, "Failed to parse response");
                AppError::external_service(
                    SERVICE_NAME,
                    format!("unexpected response shape: {e}"),
                )
            })?;

        if let Some(error) = &gemini_response.error {
            return Err(AppError::external_service(SERVICE_NAME, error.message.clone()));
        }

        let text = Self::extract_content(&gemini_response)?;
        let usage = gemini_response
            .usage_metadata
            .as_ref()
            .map(Self::convert_usage);
        let finish_reason = gemini_response
            .candidates
            .as_ref()
            .and_then(|c| c.first())
            .and_then(|c| c.finish_reason.clone());

        debug!(chars = text.chars().count(), "Successfully received Gemini response");

        Ok(ModelReply {
            text,
            model: model.to_owned(),
            usage,
            finish_reason,
        })
    }

    #[instrument(skip(self))]
    async fn list_models(&self) -> Result<Vec<ModelInfo>, AppError> {
        let url = format!("{}/models", self.base_url);
        let mut models = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut builder = self
                .client
                .get(&url)
                .query(&[("pageSize", LIST_PAGE_SIZE)]);
            if let Some(token) = &page_token {
                builder = builder.query(&[("pageToken", token.as_str())]);
            }

            let body = self.send(builder, None).await?;
            let page: ListModelsResponse = serde_json::from_str(&body).map_err(|e| {
                AppError::external_service(SERVICE_NAME, format!("unexpected model list: {e}"))
            })?;
            models.extend(page.models.into_iter().map(ModelInfo::from));

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        debug!(count = models.len(), "Listed Gemini models");
        Ok(models)
    }

    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<bool, AppError> {
        let url = format!("{}/models", self.base_url);
        let response = self
            .client
            .get(&url)
            .header(API_KEY_HEADER, self.api_key.expose())
            .query(&[("pageSize", "1")])
            .send()
            .await
            .map_err(|e| Self::map_transport_error(&e))?;

        Ok(response.status().is_success())
    }
}

impl Debug for GeminiProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("GeminiProvider")
            .field("base_url", &self.base_url)
            .field("default_model", &self.default_model)
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}
