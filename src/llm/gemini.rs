// ABOUTME: Google Gemini LLM provider implementation with a model fallback chain
// ABOUTME: Calls generateContent and moves to the next model when one returns 404
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 KBJU Diary Contributors

//! # Gemini Provider
//!
//! Implementation of the `LlmProvider` trait for Google's Gemini models.
//!
//! ## Configuration
//!
//! Set `GEMINI_API_KEY`, and optionally `GEMINI_MODEL` (default
//! `gemini-2.5-flash-lite`). When the preferred model is not available to the
//! key (HTTP 404) the provider retries with `gemini-2.0-flash-lite` and then
//! `gemini-1.5-flash`.

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use super::{ChatMessage, ChatRequest, ChatResponse, LlmProvider, MessageRole};
use crate::constants::providers::{
    DEFAULT_GEMINI_MODEL, GEMINI_API_BASE_URL, GEMINI_FALLBACK_MODELS, GEMINI_TIMEOUT,
};
use crate::constants::service_names;
use crate::errors::{AppError, ErrorCode};

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
#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<ContentPart>,
}

/// Text part of a content block
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ContentPart {
    #[serde(default)]
    text: Option<String>,
}

/// Generation configuration
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    candidate_count: Option<u32>,
}

/// Gemini API response structure
#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<GeminiError>,
}

/// Response candidate
#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<GeminiContent>,
}

/// API error response from Gemini
#[derive(Debug, Deserialize)]
struct GeminiError {
    message: String,
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// Google Gemini LLM provider
pub struct GeminiProvider {
    api_key: String,
    client: Client,
    base_url: String,
    default_model: String,
    fallback_models: Vec<String>,
}

impl GeminiProvider {
    /// Create a new Gemini provider with an API key
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_timeout(api_key, GEMINI_TIMEOUT)
    }

    /// Create a provider whose HTTP calls are bounded by `timeout`
    #[must_use]
    pub fn with_timeout(api_key: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            api_key: api_key.into(),
            client,
            base_url: GEMINI_API_BASE_URL.to_owned(),
            default_model: DEFAULT_GEMINI_MODEL.to_owned(),
            fallback_models: GEMINI_FALLBACK_MODELS
                .iter()
                .map(|m| (*m).to_owned())
                .collect(),
        }
    }

    /// Set a custom default model
    #[must_use]
    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    /// Point the provider at a different API root
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Models tried for a request, preferred first, without duplicates
    #[must_use]
    pub fn model_chain(&self, preferred: Option<&str>) -> Vec<String> {
        let mut chain: Vec<String> = Vec::with_capacity(self.fallback_models.len() + 1);
        let first = preferred.unwrap_or(&self.default_model);
        for model in std::iter::once(first).chain(self.fallback_models.iter().map(String::as_str))
        {
            if !model.is_empty() && !chain.iter().any(|m| m == model) {
                chain.push(model.to_owned());
            }
        }
        chain
    }

    /// Build the API URL for a model and method
    fn build_url(&self, model: &str, method: &str) -> String {
        format!(
            "{}/models/{model}:{method}?key={}",
            self.base_url.trim_end_matches('/'),
            self.api_key
        )
    }

    /// Convert chat messages to Gemini format
    fn convert_messages(messages: &[ChatMessage]) -> (Vec<GeminiContent>, Option<GeminiContent>) {
        let mut contents = Vec::new();
        let mut system_instruction = None;

        for message in messages {
            let content = GeminiContent {
                role: None,
                parts: vec![ContentPart {
                    text: Some(message.content.clone()),
                }],
            };
            match message.role {
                MessageRole::System => system_instruction = Some(content),
                MessageRole::User => contents.push(GeminiContent {
                    role: Some("user".to_owned()),
                    ..content
                }),
                MessageRole::Assistant => contents.push(GeminiContent {
                    role: Some("model".to_owned()),
                    ..content
                }),
            }
        }

        (contents, system_instruction)
    }

    /// Build a Gemini API request from a `ChatRequest`
    fn build_gemini_request(request: &ChatRequest) -> GeminiRequest {
        let (contents, system_instruction) = Self::convert_messages(&request.messages);

        let generation_config = if request.temperature.is_some() || request.max_tokens.is_some() {
            Some(GenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_tokens,
                candidate_count: Some(1),
            })
        } else {
            None
        };

        GeminiRequest {
            contents,
            system_instruction,
            generation_config,
        }
    }

    /// Extract text content from Gemini response
    fn extract_content(response: &GeminiResponse) -> Result<String, AppError> {
        response
            .candidates
            .as_ref()
            .and_then(|c| c.first())
            .and_then(|c| c.content.as_ref())
            .and_then(|c| c.parts.iter().find_map(|p| p.text.clone()))
            .ok_or_else(|| {
                AppError::new(
                    ErrorCode::InvalidFormat,
                    "No text content in Gemini response",
                )
            })
    }

    /// Map API error status to appropriate error type
    fn map_api_error(status: StatusCode, response_text: &str) -> AppError {
        let message = serde_json::from_str::<GeminiResponse>(response_text)
            .ok()
            .and_then(|r| r.error)
            .map_or_else(|| response_text.to_owned(), |e| e.message);

        let code = match status {
            StatusCode::NOT_FOUND => ErrorCode::ResourceNotFound,
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ErrorCode::ExternalAuthFailed,
            StatusCode::TOO_MANY_REQUESTS => ErrorCode::ExternalRateLimited,
            _ => ErrorCode::ExternalServiceError,
        };
        AppError::new(
            code,
            format!("{} API error ({status}): {message}", service_names::GEMINI),
        )
    }

    /// One `generateContent` call against a single model
    async fn complete_with_model(
        &self,
        model: &str,
        body: &GeminiRequest,
    ) -> Result<ChatResponse, AppError> {
        let url = self.build_url(model, "generateContent");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(AppError::from)?;

        let status = response.status();
        let response_text = response.text().await.map_err(AppError::from)?;

        if !status.is_success() {
            return Err(Self::map_api_error(status, &response_text));
        }

        let gemini_response: GeminiResponse = serde_json::from_str(&response_text)?;

        if let Some(error) = gemini_response.error {
            return Err(AppError::external_service(
                service_names::GEMINI,
                error.message,
            ));
        }

        Ok(ChatResponse {
            content: Self::extract_content(&gemini_response)?,
            model: model.to_owned(),
        })
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        service_names::GEMINI
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }

    #[instrument(skip(self, request), fields(model = %request.model.as_deref().unwrap_or(DEFAULT_GEMINI_MODEL)))]
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        let body = Self::build_gemini_request(request);
        let mut last_error = AppError::config("no Gemini model configured");

        for model in self.model_chain(request.model.as_deref()) {
            debug!(model = %model, "Sending request to Gemini API");
            match self.complete_with_model(&model, &body).await {
                Ok(response) => return Ok(response),
                Err(e) if e.code == ErrorCode::ResourceNotFound => {
                    warn!(model = %model, "Gemini model unavailable, trying next model");
                    last_error = e;
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error)
    }
}

impl Debug for GeminiProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("GeminiProvider")
            .field("default_model", &self.default_model)
            .field("fallback_models", &self.fallback_models)
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}
