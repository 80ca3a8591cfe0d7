// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Pure data constants for cache, providers, nutrition math and env names
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 KBJU Diary Contributors

//! Constants module
//!
//! Constants are grouped into logical domains rather than being in a single large file.

/// Cache-related constants (TTL, sizes, etc.)
pub mod cache;
/// Provider limits, endpoints and request timeouts
pub mod providers;

/// Nutrition arithmetic
pub mod nutrition {
    /// Kilocalories per gram of protein (Atwater)
    pub const KCAL_PER_GRAM_PROTEIN: f64 = 4.0;
    /// Kilocalories per gram of fat (Atwater)
    pub const KCAL_PER_GRAM_FAT: f64 = 9.0;
    /// Kilocalories per gram of carbohydrate (Atwater)
    pub const KCAL_PER_GRAM_CARBS: f64 = 4.0;
    /// Nutrient values are stored per this many grams
    pub const REFERENCE_MASS_GRAMS: f64 = 100.0;
}

/// Service names used in logs and error messages
pub mod service_names {
    /// Edamam food database
    pub const EDAMAM: &str = "edamam";
    /// `USDA` `FoodData` Central
    pub const USDA: &str = "usda";
    /// Google Gemini translation backend
    pub const GEMINI: &str = "gemini";
    /// Command line client
    pub const KBJU_CLI: &str = "kbju-cli";
}

/// Environment variable names
pub mod env_config {
    /// Storage backend (`memory` or a `sqlite:` URL)
    pub const DATABASE_URL: &str = "DATABASE_URL";
    /// `USDA` API key
    pub const FDC_API_KEY: &str = "FDC_API_KEY";
    /// `USDA` base URL override
    pub const FDC_BASE_URL: &str = "FDC_BASE_URL";
    /// Edamam application id
    pub const EDAMAM_APP_ID: &str = "EDAMAM_APP_ID";
    /// Edamam application key
    pub const EDAMAM_APP_KEY: &str = "EDAMAM_APP_KEY";
    /// Edamam base URL override
    pub const EDAMAM_BASE_URL: &str = "EDAMAM_BASE_URL";
    /// Comma separated provider priority
    pub const PROVIDER_ORDER: &str = "PROVIDER_ORDER";
    /// Enable the phrase dictionary
    pub const USE_RU_EN_DICTIONARY: &str = "USE_RU_EN_DICTIONARY";
    /// Enable the generative translation backend
    pub const USE_GEMINI_TRANSLATE: &str = "USE_GEMINI_TRANSLATE";
    /// Legacy spelling of `USE_GEMINI_TRANSLATE`
    pub const USE_GEMINI_TRANSLATION: &str = "USE_GEMINI_TRANSLATION";
    /// Send only English terms to providers
    pub const ONLY_EN_FOR_PROVIDERS: &str = "ONLY_EN_FOR_PROVIDERS";
    /// Gemini API key
    pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
    /// Preferred Gemini model
    pub const GEMINI_MODEL: &str = "GEMINI_MODEL";
    /// Show English provider titles in Russian
    pub const TRANSLATE_TITLES_BACK: &str = "TRANSLATE_TITLES_BACK";
    /// Offer generated per-100 g estimates on request
    pub const ENABLE_AI_ESTIMATE: &str = "ENABLE_AI_ESTIMATE";
    /// Bypass the nutrition cache entirely
    pub const DISABLE_FOOD_CACHE: &str = "DISABLE_FOOD_CACHE";
    /// Nutrition cache TTL in seconds
    pub const FOOD_CACHE_TTL_SECS: &str = "FOOD_CACHE_TTL_SECS";
    /// Nutrition cache capacity
    pub const FOOD_CACHE_MAX_ENTRIES: &str = "FOOD_CACHE_MAX_ENTRIES";
    /// Optional JSON file extending the seed dictionary
    pub const SEED_DICTIONARY_PATH: &str = "SEED_DICTIONARY_PATH";
    /// Upper bound of provider query variants per resolution
    pub const MAX_QUERY_VARIANTS: &str = "MAX_QUERY_VARIANTS";
    /// Log level
    pub const RUST_LOG: &str = "RUST_LOG";
    /// Log format (`json`, `pretty`, `compact`)
    pub const LOG_FORMAT: &str = "LOG_FORMAT";
}
