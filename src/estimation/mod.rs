// ABOUTME: Per-100 g nutrition estimates offered when lookups disappoint the user
// ABOUTME: Defines the estimator seam the conversation engine calls on request
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 KBJU Diary Contributors

//! # Nutrition Estimation
//!
//! When neither the seeds nor the providers give a satisfying answer the
//! user may ask for an estimate. An estimate is an ordinary
//! [`NutritionCandidate`] tagged [`CandidateSource::Estimate`]; it is shown
//! next to the other options and saved only when the user picks it.
//!
//! [`CandidateSource::Estimate`]: crate::models::CandidateSource::Estimate

/// Estimator backed by an LLM provider
pub mod generative;

pub use generative::{parse_estimate_response, LlmNutritionEstimator};

use async_trait::async_trait;

use crate::errors::AppResult;
use crate::models::{CookingMethod, NutritionCandidate};

/// Source of per-100 g estimates for a dish title
#[async_trait]
pub trait NutritionEstimator: Send + Sync {
    /// Estimator identifier for logs
    fn name(&self) -> &'static str;

    /// Per-100 g nutrients for `title`, or `None` when the estimator has no answer
    ///
    /// # Errors
    ///
    /// Returns an error on transport failures
    async fn estimate(
        &self,
        title: &str,
        method: Option<CookingMethod>,
    ) -> AppResult<Option<NutritionCandidate>>;
}
