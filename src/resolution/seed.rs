// ABOUTME: Curated seed dictionary of authoritative per-100g foods
// ABOUTME: Built-in entries plus optional JSON file extensions keyed by normalized title
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 KBJU Diary Contributors

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use serde::Deserialize;

use super::normalize_key;
use crate::errors::AppResult;
use crate::models::{CandidateSource, NutritionCandidate};

/// `(food_key, title, kcal, protein, fat, carbs)` per 100 g
const BUILTIN_SEEDS: &[(&str, &str, f64, f64, f64, f64)] = &[
    ("гречка_сухая", "Гречка (сухая)", 313.0, 12.6, 3.3, 62.1),
    ("гречка", "Гречка отварная", 110.0, 4.2, 1.1, 21.3),
    ("куриная_грудка", "Куриная грудка (без кожи)", 120.0, 23.0, 2.6, 0.0),
    ("творог", "Творог", 121.0, 17.0, 5.0, 3.0),
    ("творог_5", "Творог 5%", 121.0, 17.0, 5.0, 3.0),
    ("йогурт_натуральный", "Йогурт натуральный", 60.0, 4.5, 3.2, 4.7),
    ("рис_отварной", "Рис отварной", 130.0, 2.7, 0.3, 28.2),
    ("rice", "Rice, white, cooked", 130.0, 2.7, 0.3, 28.2),
    ("овсянка_сухая", "Овсяные хлопья (сухие)", 366.0, 11.9, 7.2, 69.3),
    ("яйцо_куриное", "Яйцо куриное", 157.0, 12.7, 11.5, 0.7),
    ("банан", "Банан", 89.0, 1.1, 0.3, 22.8),
    ("молоко_2_5", "Молоко 2,5%", 52.0, 2.8, 2.5, 4.7),
];

/// One seed record as stored in an extension file
#[derive(Debug, Deserialize)]
struct SeedRecord {
    food_key: String,
    #[serde(alias = "title_ru")]
    title: String,
    #[serde(alias = "per_100g_kcal")]
    kcal: f64,
    #[serde(alias = "per_100g_p")]
    protein: f64,
    #[serde(alias = "per_100g_f")]
    fat: f64,
    #[serde(alias = "per_100g_c")]
    carbs: f64,
}

/// Authoritative foods that bypass the cache and every provider
#[derive(Debug, Clone, Default)]
pub struct SeedDictionary {
    entries: Arc<HashMap<String, NutritionCandidate>>,
}

impl SeedDictionary {
    /// Dictionary with the built-in entries
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_records(BUILTIN_SEEDS.iter().map(|&(key, title, kcal, p, f, c)| {
            (
                key.to_owned(),
                NutritionCandidate::new(title, kcal, p, f, c, CandidateSource::Seed),
            )
        }))
    }

    /// Dictionary with no entries
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = (String, NutritionCandidate)>,
    {
        let entries = records
            .into_iter()
            .map(|(key, candidate)| (normalize_key(&key), candidate))
            .filter(|(key, _)| !key.is_empty())
            .collect();
        Self {
            entries: Arc::new(entries),
        }
    }

    /// Add or replace one entry
    #[must_use]
    pub fn with_entry(self, food_key: &str, candidate: NutritionCandidate) -> Self {
        let mut entries = (*self.entries).clone();
        entries.insert(
            normalize_key(food_key),
            candidate.retagged(CandidateSource::Seed),
        );
        Self {
            entries: Arc::new(entries),
        }
    }

    /// Merge entries from a JSON array file, file entries win on key conflicts
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a seed array
    pub fn extend_from_file(self, path: &Path) -> AppResult<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading seed dictionary {}", path.display()))?;
        let records: Vec<SeedRecord> = serde_json::from_str(&raw)?;

        let mut entries = (*self.entries).clone();
        for record in records {
            let key = normalize_key(&record.food_key);
            if key.is_empty() {
                continue;
            }
            entries.insert(
                key,
                NutritionCandidate::new(
                    record.title,
                    record.kcal,
                    record.protein,
                    record.fat,
                    record.carbs,
                    CandidateSource::Seed,
                ),
            );
        }
        Ok(Self {
            entries: Arc::new(entries),
        })
    }

    /// Exact lookup by an already normalized key
    #[must_use]
    pub fn get(&self, food_key: &str) -> Option<&NutritionCandidate> {
        self.entries.get(food_key)
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the dictionary holds nothing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
