// ABOUTME: Free-text meal line parser producing a structured ParsedLine
// ABOUTME: Detects cooking method, quantity with unit, explicit kcal and explicit macros in fixed order
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 KBJU Diary Contributors

//! # Line Parser
//!
//! Turns one message such as `куриная грудка варёная 140 г` or
//! `protein bar 180 kcal` into a [`ParsedLine`]. Parsing never fails: the worst
//! case is a line whose title is the trimmed, lower-cased input.
//!
//! Steps run in a fixed order and each removes the first substring it matched,
//! so later steps see a cleaner remainder:
//!
//! 1. cooking method (table order, first hit wins)
//! 2. quantity with a unit from a fixed vocabulary
//! 3. explicit calories
//! 4. explicit per-100g macros (`б 18 ж 5 у 3`, `p 18 f 5 c 3`)
//!
//! Whatever remains becomes the title. Because of the fixed order, the first
//! quantity-like and the first kcal-like match are taken regardless of where
//! they sit in the string.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::{CookingMethod, MacroBreakdown, ParsedLine, QuantityUnit};

const NUMBER: &str = r"(\d+(?:[.,]\d+)?)";

static METHOD_PATTERNS: LazyLock<Vec<(CookingMethod, Regex)>> = LazyLock::new(|| {
    let table: [(CookingMethod, &str); 5] = [
        (
            CookingMethod::Raw,
            r"\b(?:сыр(?:ой|ая|ое|ые|ого|ую)|raw|uncooked)\b",
        ),
        (
            CookingMethod::Boiled,
            r"\b(?:вар[её]нн?(?:ый|ая|ое|ые|ого|ую)|отварн(?:ой|ый|ая|ое|ые|ого|ую)|boiled|cooked)\b",
        ),
        (
            CookingMethod::Fried,
            r"\b(?:жар[еи]нн?(?:ый|ая|ое|ые|ого|ую)|fried)\b",
        ),
        (
            CookingMethod::Baked,
            r"\b(?:запеч[её]нн?(?:ый|ая|ое|ые|ого|ую)|baked|roasted)\b",
        ),
        (
            CookingMethod::Grilled,
            r"\b(?:на\s+гриле|гриль|grilled)\b",
        ),
    ];
    table
        .into_iter()
        .filter_map(|(method, pattern)| Regex::new(pattern).ok().map(|re| (method, re)))
        .collect()
});

static QUANTITY_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    // Matches: 140 г, 1,5 кг, 250мл, 2 шт., 100 grams, 3 pcs
    Regex::new(&format!(
        r"{NUMBER}\s*(килограмм\w*|кг|миллилитр\w*|мл|литр\w*|л|грамм\w*|гр|г|штук\w*|шт|kilograms?|kg|millilit(?:er|re)s?|ml|lit(?:er|re)s?|grams?|gr|g|pieces?|pcs|pc|l)\b\.?"
    ))
    .ok()
});

static KCAL_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    // Matches: 180 ккал, 95 кал, 250kcal, 300 calories
    Regex::new(&format!(
        r"{NUMBER}\s*(?:килокалори\w*|калори\w*|ккал|кал|kcal|calories|calorie|cal)\b\.?"
    ))
    .ok()
});

static MACROS_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    // Matches: б 18 ж 5 у 3, p18 f5 c3, б18/ж5/у3
    Regex::new(&format!(
        r"\b(?:б|p)\s*{NUMBER}[\s,;/]*(?:ж|f)\s*{NUMBER}[\s,;/]*(?:у|c)\s*{NUMBER}\b"
    ))
    .ok()
});

static ANY_NUMBER_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"-?\d+(?:[.,]\d+)?").ok());

/// Parse one free-text meal line
#[must_use]
pub fn parse_line(text: &str) -> ParsedLine {
    let mut working = text.trim().to_lowercase();

    let cooking_method = METHOD_PATTERNS.iter().find_map(|(method, re)| {
        let range = re.find(&working)?.range();
        working.replace_range(range, " ");
        Some(*method)
    });

    let mut quantity_value = None;
    let mut quantity_unit = None;
    if let Some(re) = QUANTITY_PATTERN.as_ref() {
        if let Some(caps) = re.captures(&working) {
            let value = caps.get(1).and_then(|m| parse_number(m.as_str()));
            let unit = caps.get(2).and_then(|m| QuantityUnit::from_token(m.as_str()));
            let range = caps.get(0).map(|m| m.range());
            if let (Some(value), Some(unit), Some(range)) = (value, unit, range) {
                quantity_value = Some(value);
                quantity_unit = Some(unit);
                working.replace_range(range, " ");
            }
        }
    }

    let mut explicit_kcal = None;
    if let Some(re) = KCAL_PATTERN.as_ref() {
        if let Some(caps) = re.captures(&working) {
            let value = caps.get(1).and_then(|m| parse_number(m.as_str()));
            if let (Some(value), Some(whole)) = (value, caps.get(0)) {
                explicit_kcal = Some(value);
                working.replace_range(whole.range(), " ");
            }
        }
    }

    let mut explicit_macros = None;
    if let Some(re) = MACROS_PATTERN.as_ref() {
        if let Some(caps) = re.captures(&working) {
            let values: Vec<f64> = (1..=3)
                .filter_map(|i| caps.get(i).and_then(|m| parse_number(m.as_str())))
                .collect();
            if let ([protein, fat, carbs], Some(whole)) = (values.as_slice(), caps.get(0)) {
                explicit_macros = Some(MacroBreakdown {
                    protein: *protein,
                    fat: *fat,
                    carbs: *carbs,
                });
                working.replace_range(whole.range(), " ");
            }
        }
    }

    let mass_grams = match (quantity_value, quantity_unit) {
        (Some(value), Some(unit)) => unit.to_grams(value),
        _ => None,
    };

    ParsedLine {
        title: clean_title(&working),
        cooking_method,
        quantity_value,
        quantity_unit,
        mass_grams,
        explicit_kcal,
        explicit_macros,
        is_calories_only: explicit_kcal.is_some(),
    }
}

/// First strictly positive number in a free-text answer such as `140` or `140 г`
#[must_use]
pub fn first_positive_number(text: &str) -> Option<f64> {
    let re = ANY_NUMBER_PATTERN.as_ref()?;
    let first = re.find(text)?;
    parse_number(first.as_str()).filter(|value| *value > 0.0)
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

fn clean_title(working: &str) -> String {
    working
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_matches(|c: char| c.is_whitespace() || matches!(c, ',' | '.' | ';' | ':' | '-'))
        .to_owned()
}
