// ABOUTME: Generative translation backend asking an LLM for English food keywords
// ABOUTME: Also renders English provider titles back in Russian; tolerates fenced or malformed JSON
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 KBJU Diary Contributors

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use super::{normalize_terms, TranslationBackend};
use crate::errors::AppResult;
use crate::llm::{extract_json_object, ChatMessage, ChatRequest, LlmProvider};
use crate::models::CookingMethod;

const INSTRUCTION: &str = "Translate the following Russian food name into English search keywords \
for nutrition APIs. Return strict JSON with the key 'en' containing an array of up to 5 concise options.";

const LOCALIZE_INSTRUCTION: &str = "Translate the following English food product name into natural \
Russian as shown on a grocery label. Return strict JSON with the key 'ru' containing one string.";

#[derive(Debug, Deserialize)]
struct KeywordAnswer {
    #[serde(default)]
    en: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct LocalizedAnswer {
    ru: String,
}

/// Translation backend backed by any [`LlmProvider`]
pub struct LlmKeywordBackend {
    provider: Arc<dyn LlmProvider>,
}

impl LlmKeywordBackend {
    /// Wrap an LLM provider
    #[must_use]
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    fn build_prompt(text: &str, method: Option<CookingMethod>) -> String {
        json!({
            "instruction": INSTRUCTION,
            "text": text,
            "method": method.map(|m| m.as_str()).unwrap_or_default(),
            "format": {
                "type": "object",
                "properties": {"en": {"type": "array", "items": {"type": "string"}}},
                "required": ["en"]
            }
        })
        .to_string()
    }

    fn build_localize_prompt(title: &str) -> String {
        json!({
            "instruction": LOCALIZE_INSTRUCTION,
            "text": title,
            "format": {
                "type": "object",
                "properties": {"ru": {"type": "string"}},
                "required": ["ru"]
            }
        })
        .to_string()
    }
}

#[async_trait]
impl TranslationBackend for LlmKeywordBackend {
    fn name(&self) -> &'static str {
        self.provider.name()
    }

    async fn keywords(&self, text: &str, method: Option<CookingMethod>) -> AppResult<Vec<String>> {
        let request = ChatRequest::new(vec![ChatMessage::user(Self::build_prompt(text, method))])
            .with_temperature(0.0);
        let response = self.provider.complete(&request).await?;
        let keywords = parse_keywords_response(&response.content);
        debug!(model = %response.model, count = keywords.len(), "Generative keywords received");
        Ok(keywords)
    }

    async fn localize(&self, title: &str) -> AppResult<Option<String>> {
        let request = ChatRequest::new(vec![ChatMessage::user(Self::build_localize_prompt(title))])
            .with_temperature(0.0);
        let response = self.provider.complete(&request).await?;
        Ok(parse_localized_response(&response.content))
    }
}

/// Extract the `en` keyword list from a model answer; malformed answers yield nothing
#[must_use]
pub fn parse_keywords_response(content: &str) -> Vec<String> {
    let Some(json_slice) = extract_json_object(content) else {
        warn!("Generative answer contained no JSON object");
        return Vec::new();
    };

    match serde_json::from_str::<KeywordAnswer>(json_slice) {
        Ok(answer) => normalize_terms(answer.en),
        Err(e) => {
            warn!(error = %e, "Generative answer was not valid keyword JSON");
            Vec::new()
        }
    }
}

/// Extract the `ru` title from a model answer; blank or malformed answers yield `None`
#[must_use]
pub fn parse_localized_response(content: &str) -> Option<String> {
    let json_slice = extract_json_object(content)?;
    match serde_json::from_str::<LocalizedAnswer>(json_slice) {
        Ok(answer) => {
            let title = answer.ru.trim();
            (!title.is_empty()).then(|| title.to_owned())
        }
        Err(e) => {
            warn!(error = %e, "Generative answer was not valid title JSON");
            None
        }
    }
}
