// ABOUTME: USDA FoodData Central search adapter for per-100g nutrition data
// ABOUTME: Reads energy, protein, fat and carbohydrate nutrients from search results
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 KBJU Diary Contributors

//! USDA `FoodData` Central Adapter
//!
//! Uses the `foods/search` endpoint only; search results already carry the
//! nutrient list, so no per-food detail request is needed.
//!
//! # API Reference
//! USDA `FoodData` Central API: <https://fdc.nal.usda.gov/api-guide.html>

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::instrument;

use super::scoring::{dedupe_by_title, rank_candidates};
use super::{hinted_query, LookupOutcome, NutritionProvider};
use crate::constants::providers::{USDA_BASE_URL, USDA_TIMEOUT};
use crate::constants::service_names;
use crate::logging::AppLogger;
use crate::models::{CandidateSource, CookingMethod, NutritionCandidate};

/// Results requested per search, ranking trims them afterwards
const SEARCH_PAGE_SIZE: u32 = 10;

const ENERGY: &str = "Energy";
const PROTEIN: &str = "Protein";
const FAT: &str = "Total lipid (fat)";
const CARBS: &str = "Carbohydrate, by difference";

/// USDA adapter configuration
#[derive(Debug, Clone)]
pub struct UsdaConfig {
    /// API key (free from <https://fdc.nal.usda.gov/api-key-signup.html>)
    pub api_key: Option<String>,
    /// Base URL for USDA API (default: <https://api.nal.usda.gov/fdc/v1>)
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for UsdaConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: USDA_BASE_URL.to_owned(),
            timeout: USDA_TIMEOUT,
        }
    }
}

/// USDA API search response
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    foods: Vec<SearchFood>,
}

#[derive(Debug, Deserialize)]
struct SearchFood {
    description: Option<String>,
    #[serde(rename = "foodNutrients", default)]
    food_nutrients: Vec<SearchNutrient>,
}

#[derive(Debug, Deserialize)]
struct SearchNutrient {
    #[serde(rename = "nutrientName")]
    nutrient_name: Option<String>,
    #[serde(rename = "unitName")]
    unit_name: Option<String>,
    value: Option<f64>,
}

impl SearchFood {
    fn nutrient(&self, name: &str) -> Option<f64> {
        self.food_nutrients
            .iter()
            .find(|n| n.nutrient_name.as_deref() == Some(name))
            .and_then(|n| n.value)
    }

    /// Energy in kcal; the same search row may also list kJ
    fn energy_kcal(&self) -> Option<f64> {
        self.food_nutrients
            .iter()
            .find(|n| {
                n.nutrient_name.as_deref() == Some(ENERGY)
                    && n
                        .unit_name
                        .as_deref()
                        .is_some_and(|u| u.eq_ignore_ascii_case("kcal"))
            })
            .and_then(|n| n.value)
    }
}

/// Map a search response body to candidates in response order
///
/// # Errors
///
/// Returns an error if the body is not a search response
pub fn parse_usda_response(body: &str) -> Result<Vec<NutritionCandidate>, serde_json::Error> {
    let response: SearchResponse = serde_json::from_str(body)?;
    let source = CandidateSource::Provider(service_names::USDA.to_owned());

    let candidates = response
        .foods
        .into_iter()
        .filter_map(|food| {
            let title = food.description.clone().filter(|d| !d.trim().is_empty())?;
            let kcal = food.energy_kcal()?;
            Some(NutritionCandidate::new(
                title,
                kcal,
                food.nutrient(PROTEIN).unwrap_or(0.0),
                food.nutrient(FAT).unwrap_or(0.0),
                food.nutrient(CARBS).unwrap_or(0.0),
                source.clone(),
            ))
        })
        .collect();

    Ok(dedupe_by_title(candidates))
}

/// USDA `FoodData` Central adapter
pub struct UsdaProvider {
    config: UsdaConfig,
    http_client: reqwest::Client,
}

impl UsdaProvider {
    /// Create a new USDA adapter
    #[must_use]
    pub fn new(config: UsdaConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            config,
            http_client,
        }
    }

    fn api_key(&self) -> Option<&str> {
        self.config
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
    }

    async fn search_foods(&self, query: &str, api_key: &str) -> LookupOutcome {
        let url = format!("{}/foods/search", self.config.base_url.trim_end_matches('/'));
        let page_size = SEARCH_PAGE_SIZE.to_string();
        let response = match self
            .http_client
            .get(&url)
            .query(&[
                ("query", query),
                ("pageSize", page_size.as_str()),
                ("api_key", api_key),
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

        match response.text().await {
            Ok(body) => match parse_usda_response(&body) {
                Ok(candidates) => LookupOutcome::Found(candidates),
                Err(e) => LookupOutcome::Failed(format!("JSON parse error: {e}")),
            },
            Err(e) => LookupOutcome::Failed(format!("body read failed: {e}")),
        }
    }
}

#[async_trait]
impl NutritionProvider for UsdaProvider {
    fn name(&self) -> &'static str {
        service_names::USDA
    }

    fn is_configured(&self) -> bool {
        self.api_key().is_some()
    }

    #[instrument(skip(self), fields(provider = service_names::USDA))]
    async fn lookup(&self, term: &str, method: Option<CookingMethod>) -> LookupOutcome {
        let Some(api_key) = self.api_key() else {
            AppLogger::log_provider_unconfigured(self.name());
            return LookupOutcome::Unavailable;
        };
        if term.trim().is_empty() {
            return LookupOutcome::Empty;
        }

        let query = hinted_query(term, method);
        let started = Instant::now();
        let outcome = match self.search_foods(&query, api_key).await {
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
