// ABOUTME: Diary storage models: users, entries and daily summaries
// ABOUTME: Write target and read shapes of the storage collaborator
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 KBJU Diary Contributors

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::CandidateSource;

/// Diary owner
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    /// Internal id
    pub id: Uuid,
    /// Identifier assigned by the chat transport
    pub chat_id: i64,
    /// When the user was first seen
    pub created_at: DateTime<Utc>,
    /// Trial start, absent until activated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trial_activated_at: Option<DateTime<Utc>>,
    /// Administrative privileges
    #[serde(default)]
    pub is_admin: bool,
}

impl User {
    /// New regular user seen for the first time now
    #[must_use]
    pub fn new(chat_id: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            chat_id,
            created_at: Utc::now(),
            trial_activated_at: None,
            is_admin: false,
        }
    }
}

/// Provenance of a stored diary entry
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EntrySource {
    /// Calories or macros typed by the user
    Manual,
    /// Curated seed dictionary
    Dictionary,
    /// External provider, directly or through the cache
    Api,
    /// Static preset table
    Preset,
    /// Generative model estimate
    Estimate,
}

impl EntrySource {
    /// Stable storage label
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Dictionary => "db",
            Self::Api => "api",
            Self::Preset => "preset",
            Self::Estimate => "ai",
        }
    }
}

impl From<&CandidateSource> for EntrySource {
    fn from(source: &CandidateSource) -> Self {
        match source {
            CandidateSource::Seed => Self::Dictionary,
            CandidateSource::Cache | CandidateSource::Provider(_) => Self::Api,
            CandidateSource::Preset => Self::Preset,
            CandidateSource::Manual => Self::Manual,
            CandidateSource::Estimate => Self::Estimate,
        }
    }
}

impl fmt::Display for EntrySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntrySource {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manual" => Ok(Self::Manual),
            "db" => Ok(Self::Dictionary),
            "api" => Ok(Self::Api),
            "preset" => Ok(Self::Preset),
            "ai" => Ok(Self::Estimate),
            other => Err(AppError::invalid_input(format!(
                "unknown entry source '{other}'"
            ))),
        }
    }
}

/// Entry fields computed by the assembler, ready to be stored
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewDiaryEntry {
    /// Diary day
    pub date: NaiveDate,
    /// Dish title
    pub title: String,
    /// Positive quantity as entered, or 1 portion
    pub quantity_value: f64,
    /// Unit label of `quantity_value`
    pub quantity_unit: String,
    /// Portion mass in grams when known
    pub mass_grams: Option<f64>,
    /// Kilocalories for the portion
    pub kcal: Option<f64>,
    /// Protein grams for the portion
    pub protein: Option<f64>,
    /// Fat grams for the portion
    pub fat: Option<f64>,
    /// Carbohydrate grams for the portion
    pub carbs: Option<f64>,
    /// Calories were supplied directly
    pub is_calories_only: bool,
    /// Provenance
    pub source: EntrySource,
}

/// Stored diary entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiaryEntry {
    /// Entry id
    pub id: Uuid,
    /// Owner
    pub user_id: Uuid,
    /// Insertion time
    pub created_at: DateTime<Utc>,
    /// Entry contents
    #[serde(flatten)]
    pub details: NewDiaryEntry,
}

/// Per-day totals with absent sums coalesced to zero
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct DailySummary {
    /// Total kilocalories
    pub kcal: f64,
    /// Total protein grams
    pub protein: f64,
    /// Total fat grams
    pub fat: f64,
    /// Total carbohydrate grams
    pub carbs: f64,
}

impl DailySummary {
    /// Add one entry's values, treating absent nutrients as zero
    pub fn accumulate(&mut self, entry: &NewDiaryEntry) {
        self.kcal += entry.kcal.unwrap_or(0.0);
        self.protein += entry.protein.unwrap_or(0.0);
        self.fat += entry.fat.unwrap_or(0.0);
        self.carbs += entry.carbs.unwrap_or(0.0);
    }
}
