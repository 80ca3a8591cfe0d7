// ABOUTME: LLM-backed nutrition estimator returning kcal and macros per 100 g
// ABOUTME: Rejects answers without positive calories and tolerates fenced JSON
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 KBJU Diary Contributors

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use super::NutritionEstimator;
use crate::errors::AppResult;
use crate::llm::{extract_json_object, ChatMessage, ChatRequest, LlmProvider};
use crate::models::{CandidateSource, CookingMethod, NutritionCandidate};

const INSTRUCTION: &str = "Estimate typical nutrition per 100 g for the following dish. \
Answer in strict JSON with keys title (Russian dish name), kcal100, p100, f100, c100 as numbers.";

#[derive(Debug, Deserialize)]
struct EstimateAnswer {
    #[serde(default)]
    title: Option<String>,
    kcal100: f64,
    #[serde(default)]
    p100: f64,
    #[serde(default)]
    f100: f64,
    #[serde(default)]
    c100: f64,
}

/// Nutrition estimator backed by any [`LlmProvider`]
pub struct LlmNutritionEstimator {
    provider: Arc<dyn LlmProvider>,
}

impl LlmNutritionEstimator {
    /// Wrap an LLM provider
    #[must_use]
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    fn build_prompt(title: &str, method: Option<CookingMethod>) -> String {
        json!({
            "instruction": INSTRUCTION,
            "text": title,
            "method": method.map(|m| m.as_str()).unwrap_or_default(),
            "format": {
                "type": "object",
                "properties": {
                    "title": {"type": "string"},
                    "kcal100": {"type": "number"},
                    "p100": {"type": "number"},
                    "f100": {"type": "number"},
                    "c100": {"type": "number"}
                },
                "required": ["kcal100", "p100", "f100", "c100"]
            }
        })
        .to_string()
    }
}

#[async_trait]
impl NutritionEstimator for LlmNutritionEstimator {
    fn name(&self) -> &'static str {
        self.provider.name()
    }

    async fn estimate(
        &self,
        title: &str,
        method: Option<CookingMethod>,
    ) -> AppResult<Option<NutritionCandidate>> {
        let request = ChatRequest::new(vec![ChatMessage::user(Self::build_prompt(title, method))])
            .with_temperature(0.0);
        let response = self.provider.complete(&request).await?;
        let estimate = parse_estimate_response(&response.content, title);
        debug!(model = %response.model, found = estimate.is_some(), "Nutrition estimate received");
        Ok(estimate)
    }
}

/// Turn a model answer into an estimate candidate
///
/// The answer's own title wins when present, otherwise `fallback_title` is
/// used. Answers without a JSON object, without positive finite calories or
/// with non-numeric fields yield `None`.
#[must_use]
pub fn parse_estimate_response(content: &str, fallback_title: &str) -> Option<NutritionCandidate> {
    let Some(json_slice) = extract_json_object(content) else {
        warn!("Estimate answer contained no JSON object");
        return None;
    };

    let answer = match serde_json::from_str::<EstimateAnswer>(json_slice) {
        Ok(answer) => answer,
        Err(e) => {
            warn!(error = %e, "Estimate answer was not valid nutrition JSON");
            return None;
        }
    };

    if !answer.kcal100.is_finite() || answer.kcal100 <= 0.0 {
        warn!(kcal = answer.kcal100, "Estimate answer had no positive calories");
        return None;
    }

    let title = answer
        .title
        .map(|t| t.trim().to_owned())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| fallback_title.trim().to_owned());

    Some(NutritionCandidate::new(
        title,
        answer.kcal100,
        answer.p100,
        answer.f100,
        answer.c100,
        CandidateSource::Estimate,
    ))
}
