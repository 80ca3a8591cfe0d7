// ABOUTME: Per-100g nutrition candidate and its provenance tag
// ABOUTME: Produced by seeds, cache, provider adapters, presets, manual macros and estimates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 KBJU Diary Contributors

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where a nutrition candidate came from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CandidateSource {
    /// Curated seed dictionary
    Seed,
    /// Nutrition cache hit
    Cache,
    /// External provider, by adapter name
    Provider(String),
    /// Static last-resort preset table
    Preset,
    /// Macros typed by the user
    Manual,
    /// Generative model estimate, offered on request
    Estimate,
}

impl fmt::Display for CandidateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Seed => f.write_str("seed"),
            Self::Cache => f.write_str("cache"),
            Self::Provider(name) => f.write_str(name),
            Self::Preset => f.write_str("preset"),
            Self::Manual => f.write_str("manual"),
            Self::Estimate => f.write_str("estimate"),
        }
    }
}

/// One per-100g nutrition option
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NutritionCandidate {
    /// Display title
    pub title: String,
    /// Kilocalories per 100 g
    pub kcal_per_100g: f64,
    /// Protein grams per 100 g
    pub protein_per_100g: f64,
    /// Fat grams per 100 g
    pub fat_per_100g: f64,
    /// Carbohydrate grams per 100 g
    pub carbs_per_100g: f64,
    /// Provenance
    pub source: CandidateSource,
}

impl NutritionCandidate {
    /// Build a candidate, clamping negative or non-finite nutrients to zero
    pub fn new(
        title: impl Into<String>,
        kcal: f64,
        protein: f64,
        fat: f64,
        carbs: f64,
        source: CandidateSource,
    ) -> Self {
        Self {
            title: title.into(),
            kcal_per_100g: non_negative(kcal),
            protein_per_100g: non_negative(protein),
            fat_per_100g: non_negative(fat),
            carbs_per_100g: non_negative(carbs),
            source,
        }
    }

    /// Same nutrients under a different provenance tag
    #[must_use]
    pub fn retagged(mut self, source: CandidateSource) -> Self {
        self.source = source;
        self
    }

    /// All nutrient fields are finite and non-negative
    #[must_use]
    pub fn is_valid(&self) -> bool {
        [
            self.kcal_per_100g,
            self.protein_per_100g,
            self.fat_per_100g,
            self.carbs_per_100g,
        ]
        .iter()
        .all(|v| v.is_finite() && *v >= 0.0)
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}
