// ABOUTME: Static last-resort per-100g presets matched by phrase and cooking method
// ABOUTME: Consulted only after every provider came back empty
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 KBJU Diary Contributors

use crate::models::{CandidateSource, CookingMethod, NutritionCandidate};

/// One preset row
#[derive(Debug, Clone, PartialEq)]
pub struct Preset {
    /// Lower-case fragments, any of which must occur in the title
    pub phrases: &'static [&'static str],
    /// Required cooking method, `None` matches any
    pub method: Option<CookingMethod>,
    /// Display title
    pub title: &'static str,
    /// Kilocalories per 100 g
    pub kcal: f64,
    /// Protein per 100 g
    pub protein: f64,
    /// Fat per 100 g
    pub fat: f64,
    /// Carbohydrates per 100 g
    pub carbs: f64,
}

const fn preset(
    phrases: &'static [&'static str],
    method: Option<CookingMethod>,
    title: &'static str,
    values: [f64; 4],
) -> Preset {
    Preset {
        phrases,
        method,
        title,
        kcal: values[0],
        protein: values[1],
        fat: values[2],
        carbs: values[3],
    }
}

const RICE: &[&str] = &["рис", "rice"];
const BUCKWHEAT: &[&str] = &["греч", "buckwheat"];
const CHICKEN: &[&str] = &["куриц", "курин", "chicken"];
const POTATO: &[&str] = &["картоф", "картош", "potato"];
const PASTA: &[&str] = &["макарон", "паста", "pasta"];
const EGG: &[&str] = &["яйц", "яйко", "egg"];
const BEEF: &[&str] = &["говяд", "beef"];
const FISH: &[&str] = &["рыб", "fish"];
const OATMEAL: &[&str] = &["овсян", "oatmeal", "porridge"];
const VEGETABLES: &[&str] = &["овощ", "vegetable"];

/// Built-in presets, method-specific rows listed before generic ones
pub static PRESETS: &[Preset] = &[
    preset(RICE, Some(CookingMethod::Boiled), "Рис отварной", [130.0, 2.7, 0.3, 28.2]),
    preset(RICE, Some(CookingMethod::Fried), "Рис жареный", [163.0, 3.4, 4.6, 26.0]),
    preset(BUCKWHEAT, Some(CookingMethod::Boiled), "Гречка отварная", [110.0, 4.2, 1.1, 21.3]),
    preset(CHICKEN, Some(CookingMethod::Boiled), "Курица отварная", [170.0, 25.2, 7.4, 0.0]),
    preset(CHICKEN, Some(CookingMethod::Fried), "Курица жареная", [210.0, 26.0, 11.8, 0.0]),
    preset(CHICKEN, Some(CookingMethod::Baked), "Курица запеченная", [187.0, 25.0, 9.0, 0.0]),
    preset(CHICKEN, Some(CookingMethod::Grilled), "Курица гриль", [175.0, 27.0, 7.0, 0.0]),
    preset(POTATO, Some(CookingMethod::Boiled), "Картофель отварной", [82.0, 2.0, 0.4, 16.7]),
    preset(POTATO, Some(CookingMethod::Fried), "Картофель жареный", [192.0, 2.8, 9.5, 23.4]),
    preset(POTATO, Some(CookingMethod::Baked), "Картофель запеченный", [93.0, 2.5, 0.1, 21.0]),
    preset(PASTA, Some(CookingMethod::Boiled), "Макароны отварные", [158.0, 5.8, 0.9, 30.9]),
    preset(EGG, Some(CookingMethod::Boiled), "Яйцо вареное", [155.0, 12.6, 10.6, 1.1]),
    preset(EGG, Some(CookingMethod::Fried), "Яичница", [196.0, 13.6, 15.3, 0.8]),
    preset(BEEF, Some(CookingMethod::Boiled), "Говядина отварная", [254.0, 25.8, 16.8, 0.0]),
    preset(FISH, Some(CookingMethod::Baked), "Рыба запеченная", [140.0, 22.0, 5.5, 0.0]),
    preset(FISH, Some(CookingMethod::Fried), "Рыба жареная", [196.0, 19.5, 11.7, 3.0]),
    preset(OATMEAL, Some(CookingMethod::Boiled), "Овсяная каша на воде", [88.0, 3.0, 1.7, 15.0]),
    preset(VEGETABLES, Some(CookingMethod::Grilled), "Овощи гриль", [60.0, 1.8, 3.2, 6.5]),
    preset(VEGETABLES, None, "Овощи", [35.0, 1.5, 0.3, 6.0]),
];

/// Static fallback table
#[derive(Debug, Clone, Copy)]
pub struct PresetTable {
    rows: &'static [Preset],
}

impl Default for PresetTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PresetTable {
    /// Table with the built-in rows
    #[must_use]
    pub const fn builtin() -> Self {
        Self { rows: PRESETS }
    }

    /// Table with no rows
    #[must_use]
    pub const fn empty() -> Self {
        Self { rows: &[] }
    }

    /// First row whose phrase occurs in `title` and whose method fits, as a preset candidate
    #[must_use]
    pub fn lookup(&self, title: &str, method: Option<CookingMethod>) -> Option<NutritionCandidate> {
        let title = title.to_lowercase();
        self.rows
            .iter()
            .find(|row| {
                row.method.is_none_or(|m| Some(m) == method)
                    && row.phrases.iter().any(|p| title.contains(p))
            })
            .map(|row| {
                NutritionCandidate::new(
                    row.title,
                    row.kcal,
                    row.protein,
                    row.fat,
                    row.carbs,
                    CandidateSource::Preset,
                )
            })
    }
}
