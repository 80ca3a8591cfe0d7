// ABOUTME: Nutrition provider adapters for external food databases
// ABOUTME: Uniform lookup contract returning a tagged outcome instead of raising
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 KBJU Diary Contributors

//! # Provider Adapters
//!
//! Each adapter wraps one external nutrition database behind
//! [`NutritionProvider::lookup`]. Adapters never propagate errors: missing
//! credentials, HTTP failures, timeouts and malformed payloads all come back
//! as a [`LookupOutcome`] variant so the resolution chain can decide what to
//! do next without exception-style control flow.

/// Edamam food database adapter
pub mod edamam;
/// Relevance scoring and cooking-method partitioning
pub mod scoring;
/// `USDA` `FoodData` Central adapter
pub mod usda;

use std::sync::Arc;

use async_trait::async_trait;

use crate::constants::service_names;
use crate::errors::{AppError, AppResult};
use crate::models::{CookingMethod, NutritionCandidate};

pub use edamam::{EdamamConfig, EdamamProvider};
pub use usda::{UsdaConfig, UsdaProvider};

/// Result of one adapter call
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    /// Ranked candidates, never empty
    Found(Vec<NutritionCandidate>),
    /// The provider answered but had nothing usable
    Empty,
    /// Credentials are missing, no request was made
    Unavailable,
    /// The provider rejected the credentials
    Unauthorized,
    /// Transport, HTTP or payload failure
    Failed(String),
}

impl LookupOutcome {
    /// Wrap ranked candidates, mapping an empty list to `Empty`
    #[must_use]
    pub fn from_candidates(candidates: Vec<NutritionCandidate>) -> Self {
        if candidates.is_empty() {
            Self::Empty
        } else {
            Self::Found(candidates)
        }
    }

    /// Short label for logs
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Found(_) => "found",
            Self::Empty => "empty",
            Self::Unavailable => "unavailable",
            Self::Unauthorized => "unauthorized",
            Self::Failed(_) => "failed",
        }
    }

    /// Candidates carried by this outcome, empty for every non-`Found` variant
    #[must_use]
    pub fn into_candidates(self) -> Vec<NutritionCandidate> {
        match self {
            Self::Found(candidates) => candidates,
            _ => Vec::new(),
        }
    }
}

/// External nutrition database behind a uniform contract
#[async_trait]
pub trait NutritionProvider: Send + Sync {
    /// Provider identifier, also used as the candidate source tag
    fn name(&self) -> &'static str;

    /// Whether credentials are present
    fn is_configured(&self) -> bool;

    /// Per-100g candidates for `term`, biased towards `method`, at most five
    async fn lookup(&self, term: &str, method: Option<CookingMethod>) -> LookupOutcome;
}

/// Base term with the method's query hints appended, skipping hints already present
#[must_use]
pub fn hinted_query(term: &str, method: Option<CookingMethod>) -> String {
    let base = term.trim();
    let Some(method) = method else {
        return base.to_owned();
    };
    let lowered = base.to_lowercase();
    let mut query = base.to_owned();
    for hint in method.query_hints() {
        if !lowered.contains(hint) {
            query.push(' ');
            query.push_str(hint);
        }
    }
    query
}

/// Build adapters in the requested priority order
///
/// # Errors
///
/// Returns an error if `order` names an unknown provider
pub fn build_providers(
    order: &[String],
    usda: &UsdaConfig,
    edamam: &EdamamConfig,
) -> AppResult<Vec<Arc<dyn NutritionProvider>>> {
    order
        .iter()
        .map(|name| -> AppResult<Arc<dyn NutritionProvider>> {
            match name.trim().to_lowercase().as_str() {
                service_names::USDA | "fdc" => Ok(Arc::new(UsdaProvider::new(usda.clone()))),
                service_names::EDAMAM => Ok(Arc::new(EdamamProvider::new(edamam.clone()))),
                other => Err(AppError::config(format!(
                    "Unknown nutrition provider: {other}. Currently supported: edamam, usda"
                ))),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hinted_query_appends_method_words() {
        assert_eq!(
            hinted_query("chicken breast", Some(CookingMethod::Boiled)),
            "chicken breast boiled cooked"
        );
        assert_eq!(
            hinted_query("rice cooked", Some(CookingMethod::Boiled)),
            "rice cooked boiled"
        );
        assert_eq!(hinted_query(" rice ", None), "rice");
    }

    #[test]
    fn test_build_providers_rejects_unknown_names() {
        let order = vec!["usda".to_owned(), "nutritionix".to_owned()];
        let result = build_providers(&order, &UsdaConfig::default(), &EdamamConfig::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_build_providers_keeps_order() {
        let order = vec!["usda".to_owned(), "edamam".to_owned()];
        let providers =
            build_providers(&order, &UsdaConfig::default(), &EdamamConfig::default()).unwrap();
        let names: Vec<_> = providers.iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["usda", "edamam"]);
    }
}
