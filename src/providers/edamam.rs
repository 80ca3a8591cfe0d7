// ABOUTME: Edamam food database parser adapter
// ABOUTME: Maps parsed and hinted foods to per-100g candidates, never raises
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 KBJU Diary Contributors

//! Edamam Food Database Adapter
//!
//! Queries the `food-database/v2/parser` endpoint with the method-hinted
//! term and the `cooking` nutrition type. Nutrients in Edamam responses are
//! already expressed per 100 g.
//!
//! # API Reference
//! <https://developer.edamam.com/food-database-api-docs>

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::instrument;

use super::scoring::{dedupe_by_title, rank_candidates};
use super::{hinted_query, LookupOutcome, NutritionProvider};
use crate::constants::providers::{EDAMAM_BASE_URL, EDAMAM_TIMEOUT};
use crate::constants::service_names;
use crate::logging::AppLogger;
use crate::models::{CandidateSource, CookingMethod, NutritionCandidate};

/// Edamam adapter configuration
#[derive(Debug, Clone)]
pub struct EdamamConfig {
    /// Application id, lookups are skipped when absent
    pub app_id: Option<String>,
    /// Application key, lookups are skipped when absent
    pub app_key: Option<String>,
    /// Parser endpoint
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for EdamamConfig {
    fn default() -> Self {
        Self {
            app_id: None,
            app_key: None,
            base_url: EDAMAM_BASE_URL.to_owned(),
            timeout: EDAMAM_TIMEOUT,
        }
    }
}

impl EdamamConfig {
    fn credentials(&self) -> Option<(&str, &str)> {
        let id = self.app_id.as_deref().filter(|s| !s.trim().is_empty())?;
        let key = self.app_key.as_deref().filter(|s| !s.trim().is_empty())?;
        Some((id, key))
    }
}

#[derive(Debug, Default, Deserialize)]
struct ParserResponse {
    #[serde(default)]
    parsed: Vec<ParsedItem>,
    #[serde(default)]
    hints: Vec<ParsedItem>,
}

#[derive(Debug, Deserialize)]
struct ParsedItem {
    food: Option<EdamamFood>,
}

#[derive(Debug, Deserialize)]
struct EdamamFood {
    label: Option<String>,
    #[serde(default)]
    nutrients: EdamamNutrients,
}

#[derive(Debug, Default, Deserialize)]
struct EdamamNutrients {
    #[serde(rename = "ENERC_KCAL")]
    kcal: Option<f64>,
    #[serde(rename = "PROCNT")]
    protein: Option<f64>,
    #[serde(rename = "FAT")]
    fat: Option<f64>,
    #[serde(rename = "CHOCDF")]
    carbs: Option<f64>,
}

/// Map a parser response body to candidates in response order
///
/// Foods without an energy value are dropped and repeated labels collapse.
///
/// # Errors
///
/// Returns an error if the body is not a parser response
pub fn parse_edamam_response(
    body: &str,
    query: &str,
) -> Result<Vec<NutritionCandidate>, serde_json::Error> {
    let response: ParserResponse = serde_json::from_str(body)?;
    let source = CandidateSource::Provider(service_names::EDAMAM.to_owned());

    let candidates = response
        .parsed
        .into_iter()
        .chain(response.hints)
        .filter_map(|item| {
            let food = item.food?;
            let kcal = food.nutrients.kcal?;
            let title = food
                .label
                .filter(|l| !l.trim().is_empty())
                .unwrap_or_else(|| query.to_owned());
            Some(NutritionCandidate::new(
                title,
                kcal,
                food.nutrients.protein.unwrap_or(0.0),
                food.nutrients.fat.unwrap_or(0.0),
                food.nutrients.carbs.unwrap_or(0.0),
                source.clone(),
            ))
        })
        .collect();

    Ok(dedupe_by_title(candidates))
}

/// Edamam food database adapter
pub struct EdamamProvider {
    config: EdamamConfig,
    client: reqwest::Client,
}

impl EdamamProvider {
    /// Create an adapter with its own HTTP client
    #[must_use]
    pub fn new(config: EdamamConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { config, client }
    }

    async fn fetch(&self, query: &str, app_id: &str, app_key: &str) -> LookupOutcome {
        let response = match self
            .client
            .get(&self.config.base_url)
            .query(&[
                ("app_id", app_id),
                ("app_key", app_key),
                ("ingr", query),
                ("nutrition-type", "cooking"),
            ])
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return LookupOutcome::Failed(format!("request failed: {e}")),
        };

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return LookupOutcome::Unauthorized;
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let snippet: String = body.chars().take(200).collect();
            return LookupOutcome::Failed(format!("HTTP {status}: {snippet}"));
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return LookupOutcome::Failed(format!("body read failed: {e}")),
        };
        match parse_edamam_response(&body, query) {
            Ok(candidates) => LookupOutcome::Found(candidates),
            Err(e) => LookupOutcome::Failed(format!("JSON parse error: {e}")),
        }
    }
}

#[async_trait]
impl NutritionProvider for EdamamProvider {
    fn name(&self) -> &'static str {
        service_names::EDAMAM
    }

    fn is_configured(&self) -> bool {
        self.config.credentials().is_some()
    }

    #[instrument(skip(self), fields(provider = service_names::EDAMAM))]
    async fn lookup(&self, term: &str, method: Option<CookingMethod>) -> LookupOutcome {
        let Some((app_id, app_key)) = self.config.credentials() else {
            AppLogger::log_provider_unconfigured(self.name());
            return LookupOutcome::Unavailable;
        };

        let query = hinted_query(term, method);
        let started = Instant::now();
        let outcome = match self.fetch(&query, app_id, app_key).await {
            LookupOutcome::Found(candidates) => {
                LookupOutcome::from_candidates(rank_candidates(candidates, term, method))
            }
            other => other,
        };
        let elapsed = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        if let LookupOutcome::Failed(details) = &outcome {
            AppLogger::log_provider_failure(self.name(), &query, details);
        }
        AppLogger::log_provider_call(self.name(), &query, outcome.label(), elapsed);
        outcome
    }
}
