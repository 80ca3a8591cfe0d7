// ABOUTME: Core data models for the meal diary
// ABOUTME: Re-exports ParsedLine, NutritionCandidate, DiaryEntry, User and friends
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 KBJU Diary Contributors

//! # Data Models
//!
//! Structures shared by every stage of the nutrition-resolution pipeline.
//!
//! ## Core Models
//!
//! - `ParsedLine`: structured result of parsing one free-text meal line
//! - `NutritionCandidate`: one per-100g nutrition option with its provenance
//! - `NewDiaryEntry` / `DiaryEntry`: storage write target and stored record
//! - `DailySummary`: coalesced per-day totals
//! - `User`: diary owner keyed by transport chat id

// Domain modules
mod diary;
mod food;
mod nutrition;

// Meal line domain
pub use food::{CookingMethod, MacroBreakdown, ParsedLine, QuantityUnit};

// Nutrition domain
pub use nutrition::{CandidateSource, NutritionCandidate};

// Diary domain
pub use diary::{DailySummary, DiaryEntry, EntrySource, NewDiaryEntry, User};
