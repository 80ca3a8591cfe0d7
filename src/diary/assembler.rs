// ABOUTME: Entry assembler computing final kcal and macros for a diary record
// ABOUTME: Refuses to build an entry when neither mass nor calories are known
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 KBJU Diary Contributors

use chrono::NaiveDate;

use crate::constants::nutrition::REFERENCE_MASS_GRAMS;
use crate::errors::{AppError, AppResult};
use crate::models::{
    CandidateSource, EntrySource, NewDiaryEntry, NutritionCandidate, ParsedLine, QuantityUnit,
};

/// Unit label stored for calorie-only entries without a measured quantity
const PORTION_UNIT: &str = "portion";

/// Round to one decimal for display; stored values keep full precision
#[must_use]
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Build the diary record for `parsed`
///
/// A chosen candidate is scaled by the known portion mass. Otherwise
/// `explicit_kcal` (or the kcal typed on the line) produces a calories-only
/// entry. Per-100g macros typed on the line act as a manual candidate.
///
/// # Errors
///
/// Returns `InsufficientData` when a candidate is given without a positive
/// mass, or when no candidate, calories or macros are available at all.
pub fn finalize(
    parsed: &ParsedLine,
    candidate: Option<&NutritionCandidate>,
    explicit_kcal: Option<f64>,
    date: NaiveDate,
) -> AppResult<NewDiaryEntry> {
    if parsed.title.trim().is_empty() {
        return Err(AppError::insufficient_data("entry title is empty"));
    }

    if let Some(candidate) = candidate {
        return from_candidate(parsed, candidate, date);
    }

    if let Some(kcal) = explicit_kcal.or(parsed.explicit_kcal) {
        return calories_only(parsed, kcal, date);
    }

    if let (Some(macros), true) = (parsed.explicit_macros, parsed.has_known_mass()) {
        let manual = NutritionCandidate::new(
            parsed.title.clone(),
            macros.atwater_kcal(),
            macros.protein,
            macros.fat,
            macros.carbs,
            CandidateSource::Manual,
        );
        return from_candidate(parsed, &manual, date);
    }

    Err(AppError::insufficient_data(format!(
        "'{}' has neither a chosen candidate nor calories",
        parsed.title
    )))
}

fn from_candidate(
    parsed: &ParsedLine,
    candidate: &NutritionCandidate,
    date: NaiveDate,
) -> AppResult<NewDiaryEntry> {
    let mass = parsed
        .mass_grams
        .filter(|g| g.is_finite() && *g > 0.0)
        .ok_or_else(|| {
            AppError::insufficient_data(format!("no portion mass known for '{}'", parsed.title))
        })?;
    let ratio = mass / REFERENCE_MASS_GRAMS;

    let (quantity_value, quantity_unit) = match (parsed.quantity_value, parsed.quantity_unit) {
        (Some(value), Some(unit)) if value > 0.0 => (value, unit.as_str().to_owned()),
        _ => (mass, QuantityUnit::Grams.as_str().to_owned()),
    };

    Ok(NewDiaryEntry {
        date,
        title: parsed.title.clone(),
        quantity_value,
        quantity_unit,
        mass_grams: Some(mass),
        kcal: Some(candidate.kcal_per_100g * ratio),
        protein: Some(candidate.protein_per_100g * ratio),
        fat: Some(candidate.fat_per_100g * ratio),
        carbs: Some(candidate.carbs_per_100g * ratio),
        is_calories_only: false,
        source: EntrySource::from(&candidate.source),
    })
}

fn calories_only(parsed: &ParsedLine, kcal: f64, date: NaiveDate) -> AppResult<NewDiaryEntry> {
    if !kcal.is_finite() || kcal < 0.0 {
        return Err(AppError::invalid_input(format!("calories must be non-negative, got {kcal}")));
    }

    let mass = parsed.mass_grams.filter(|g| *g > 0.0);
    let (quantity_value, quantity_unit) = match (parsed.quantity_value, parsed.quantity_unit) {
        (Some(value), Some(unit)) if value > 0.0 => (value, unit.as_str().to_owned()),
        _ => mass.map_or_else(
            || (1.0, PORTION_UNIT.to_owned()),
            |g| (g, QuantityUnit::Grams.as_str().to_owned()),
        ),
    };

    Ok(NewDiaryEntry {
        date,
        title: parsed.title.clone(),
        quantity_value,
        quantity_unit,
        mass_grams: mass,
        kcal: Some(kcal),
        protein: None,
        fat: None,
        carbs: None,
        is_calories_only: true,
        source: EntrySource::Manual,
    })
}
