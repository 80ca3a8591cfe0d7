// ABOUTME: Relevance scoring for provider results and cooking-method partitioning
// ABOUTME: Deterministic ranking with stable tie-breaks on provider order
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 KBJU Diary Contributors

//! Ranking policy for provider candidates.
//!
//! Weights are policy, not correctness: they only have to produce a total,
//! deterministic order. Sorting is stable, so equal scores keep the
//! provider's native order.

use crate::constants::providers::MAX_CANDIDATES;
use crate::models::{CookingMethod, NutritionCandidate};

/// Score per base-term word found in a result title
pub const LEXICAL_MATCH_WEIGHT: i32 = 2;
/// Score for a result title carrying a synonym of the requested method
pub const METHOD_MATCH_WEIGHT: i32 = 3;
/// Penalty per undesired descriptor in a result title
pub const UNDESIRED_DESCRIPTOR_PENALTY: i32 = 2;
/// Descriptors that usually indicate the wrong product
pub const UNDESIRED_DESCRIPTORS: &[&str] = &[
    "raw", "smoked", "breaded", "marinated", "skin", "wing", "wings",
];

fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn contains_phrase(title_lower: &str, title_words: &[String], phrase: &str) -> bool {
    if phrase.contains(|c: char| !c.is_alphanumeric()) {
        title_lower.contains(phrase)
    } else {
        title_words.iter().any(|w| w == phrase)
    }
}

/// Whether `title` carries one of the method's synonym words
#[must_use]
pub fn matches_method(title: &str, method: CookingMethod) -> bool {
    let lower = title.to_lowercase();
    let title_words = words(&lower);
    method
        .title_synonyms()
        .iter()
        .any(|synonym| contains_phrase(&lower, &title_words, synonym))
}

/// Relevance of one result title for `base_term` and `method`
#[must_use]
pub fn relevance_score(title: &str, base_term: &str, method: Option<CookingMethod>) -> i32 {
    let lower = title.to_lowercase();
    let title_words = words(&lower);
    let term_words = words(base_term);

    let lexical = term_words
        .iter()
        .filter(|w| title_words.contains(w))
        .count();
    let mut score = i32::try_from(lexical).unwrap_or(i32::MAX / 4) * LEXICAL_MATCH_WEIGHT;

    if let Some(method) = method {
        if matches_method(title, method) {
            score += METHOD_MATCH_WEIGHT;
        }
    }

    for descriptor in UNDESIRED_DESCRIPTORS {
        let requested = term_words.iter().any(|w| w == descriptor)
            || (*descriptor == "raw" && method == Some(CookingMethod::Raw));
        if !requested && title_words.iter().any(|w| w == descriptor) {
            score -= UNDESIRED_DESCRIPTOR_PENALTY;
        }
    }

    score
}

/// Stable partition placing method-matching titles first when at least one matches
#[must_use]
pub fn partition_by_method(
    candidates: Vec<NutritionCandidate>,
    method: Option<CookingMethod>,
) -> Vec<NutritionCandidate> {
    let Some(method) = method else {
        return candidates;
    };
    let (mut matching, rest): (Vec<_>, Vec<_>) = candidates
        .into_iter()
        .partition(|c| matches_method(&c.title, method));
    if matching.is_empty() {
        return rest;
    }
    matching.extend(rest);
    matching
}

/// Score, stable-sort, partition by method and cap at five candidates
#[must_use]
pub fn rank_candidates(
    candidates: Vec<NutritionCandidate>,
    base_term: &str,
    method: Option<CookingMethod>,
) -> Vec<NutritionCandidate> {
    let mut scored: Vec<(i32, NutritionCandidate)> = candidates
        .into_iter()
        .map(|c| (relevance_score(&c.title, base_term, method), c))
        .collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0));

    let mut ranked = partition_by_method(scored.into_iter().map(|(_, c)| c).collect(), method);
    ranked.truncate(MAX_CANDIDATES);
    ranked
}

/// Drop candidates whose title repeats an earlier one, ignoring case
#[must_use]
pub fn dedupe_by_title(candidates: Vec<NutritionCandidate>) -> Vec<NutritionCandidate> {
    let mut seen: Vec<String> = Vec::with_capacity(candidates.len());
    candidates
        .into_iter()
        .filter(|c| {
            let key = c.title.trim().to_lowercase();
            if seen.contains(&key) {
                false
            } else {
                seen.push(key);
                true
            }
        })
        .collect()
}
