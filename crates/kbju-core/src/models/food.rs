// ABOUTME: Parsed meal line models: cooking methods, quantity units and explicit macros
// ABOUTME: ParsedLine is the immutable result of parsing one user message
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 KBJU Diary Contributors

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::nutrition::{
    KCAL_PER_GRAM_CARBS, KCAL_PER_GRAM_FAT, KCAL_PER_GRAM_PROTEIN,
};
use crate::errors::AppError;

/// Cooking method hint attached to a dish
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CookingMethod {
    /// Uncooked
    Raw,
    /// Boiled, stewed or otherwise cooked in water
    Boiled,
    /// Pan or deep fried
    Fried,
    /// Oven baked or roasted
    Baked,
    /// Grilled or broiled
    Grilled,
}

impl CookingMethod {
    /// All methods in detection priority order
    pub const ALL: [Self; 5] = [
        Self::Raw,
        Self::Boiled,
        Self::Fried,
        Self::Baked,
        Self::Grilled,
    ];

    /// Canonical lowercase name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Raw => "raw",
            Self::Boiled => "boiled",
            Self::Fried => "fried",
            Self::Baked => "baked",
            Self::Grilled => "grilled",
        }
    }

    /// Words appended to a provider query to bias it towards this method
    #[must_use]
    pub const fn query_hints(&self) -> &'static [&'static str] {
        match self {
            Self::Raw => &["raw"],
            Self::Boiled => &["boiled", "cooked"],
            Self::Fried => &["fried", "pan fried"],
            Self::Baked => &["baked", "roasted"],
            Self::Grilled => &["grilled"],
        }
    }

    /// Words that indicate this method inside a provider's food title
    #[must_use]
    pub const fn title_synonyms(&self) -> &'static [&'static str] {
        match self {
            Self::Raw => &["raw", "fresh", "uncooked"],
            Self::Boiled => &["boiled", "cooked", "stewed", "poached", "simmered"],
            Self::Fried => &["fried", "pan-fried", "sauteed", "sautéed"],
            Self::Baked => &["baked", "roasted"],
            Self::Grilled => &["grilled", "broiled", "barbecued"],
        }
    }
}

impl fmt::Display for CookingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CookingMethod {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "raw" => Ok(Self::Raw),
            "boiled" | "cooked" => Ok(Self::Boiled),
            "fried" => Ok(Self::Fried),
            "baked" | "roasted" => Ok(Self::Baked),
            "grilled" => Ok(Self::Grilled),
            other => Err(AppError::invalid_input(format!(
                "unknown cooking method '{other}'"
            ))),
        }
    }
}

/// Normalized quantity unit
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum QuantityUnit {
    /// Grams
    Grams,
    /// Kilograms
    Kilograms,
    /// Milliliters (assumed water density)
    Milliliters,
    /// Liters (assumed water density)
    Liters,
    /// Countable pieces with unknown mass
    Pieces,
}

impl QuantityUnit {
    /// Short unit label stored with diary entries
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Grams => "g",
            Self::Kilograms => "kg",
            Self::Milliliters => "ml",
            Self::Liters => "l",
            Self::Pieces => "pcs",
        }
    }

    /// Grams per one unit, `None` when the mass is unknown
    #[must_use]
    pub const fn grams_factor(&self) -> Option<f64> {
        match self {
            Self::Grams | Self::Milliliters => Some(1.0),
            Self::Kilograms | Self::Liters => Some(1000.0),
            Self::Pieces => None,
        }
    }

    /// Convert a quantity in this unit to grams
    #[must_use]
    pub fn to_grams(&self, value: f64) -> Option<f64> {
        self.grams_factor().map(|factor| value * factor)
    }

    /// Map a raw unit token (Russian or English) to a unit
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        let token = token.trim().trim_end_matches('.').to_lowercase();
        let unit = match token.as_str() {
            "г" | "гр" | "g" | "gr" => Self::Grams,
            "кг" | "kg" => Self::Kilograms,
            "мл" | "ml" => Self::Milliliters,
            "л" | "l" => Self::Liters,
            "шт" | "pc" | "pcs" => Self::Pieces,
            t if t.starts_with("грамм") || t.starts_with("gram") => Self::Grams,
            t if t.starts_with("килограмм") || t.starts_with("kilogram") => Self::Kilograms,
            t if t.starts_with("миллилитр") || t.starts_with("milliliter") => Self::Milliliters,
            t if t.starts_with("литр") || t.starts_with("liter") || t.starts_with("litre") => {
                Self::Liters
            }
            t if t.starts_with("штук") || t.starts_with("piece") => Self::Pieces,
            _ => return None,
        };
        Some(unit)
    }
}

impl fmt::Display for QuantityUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Protein, fat and carbohydrate grams per 100 g
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MacroBreakdown {
    /// Protein grams
    pub protein: f64,
    /// Fat grams
    pub fat: f64,
    /// Carbohydrate grams
    pub carbs: f64,
}

impl MacroBreakdown {
    /// Energy implied by the macros using Atwater factors
    #[must_use]
    pub fn atwater_kcal(&self) -> f64 {
        self.protein.mul_add(
            KCAL_PER_GRAM_PROTEIN,
            self.fat
                .mul_add(KCAL_PER_GRAM_FAT, self.carbs * KCAL_PER_GRAM_CARBS),
        )
    }
}

/// Structured result of parsing one free-text meal line
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ParsedLine {
    /// Cleaned dish name with method, quantity and calorie tokens removed
    pub title: String,
    /// Detected cooking method
    pub cooking_method: Option<CookingMethod>,
    /// Numeric quantity as typed
    pub quantity_value: Option<f64>,
    /// Unit of `quantity_value`
    pub quantity_unit: Option<QuantityUnit>,
    /// Quantity converted to grams when the unit permits
    pub mass_grams: Option<f64>,
    /// Calories given directly by the user
    pub explicit_kcal: Option<f64>,
    /// Per-100g macros given directly by the user
    pub explicit_macros: Option<MacroBreakdown>,
    /// True iff the user supplied calories directly
    pub is_calories_only: bool,
}

impl ParsedLine {
    /// Whether a positive portion mass is known
    #[must_use]
    pub fn has_known_mass(&self) -> bool {
        self.mass_grams.is_some_and(|g| g > 0.0)
    }

    /// An input that can be persisted without any lookup or follow-up question
    #[must_use]
    pub fn is_fully_resolvable(&self) -> bool {
        if self.title.is_empty() {
            return false;
        }
        self.explicit_kcal.is_some_and(|kcal| kcal >= 0.0)
            || (self.has_known_mass() && self.explicit_macros.is_some())
    }

    /// Copy of this line with the portion mass filled in from a follow-up answer
    #[must_use]
    pub fn with_mass_grams(&self, grams: f64) -> Self {
        let mut line = self.clone();
        line.mass_grams = Some(grams);
        if line.quantity_unit != Some(QuantityUnit::Pieces) {
            line.quantity_value = Some(grams);
            line.quantity_unit = Some(QuantityUnit::Grams);
        }
        line
    }
}
