// ABOUTME: Provider limits, default endpoints and request timeouts
// ABOUTME: Shared by the translator, the provider adapters and the resolution chain
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 KBJU Diary Contributors

use std::time::Duration;

/// Maximum candidates presented to the user after ranking
pub const MAX_CANDIDATES: usize = 5;

/// Maximum search terms produced by the translator
pub const MAX_SEARCH_TERMS: usize = 5;

/// Minimum length of a search term after trimming
pub const MIN_SEARCH_TERM_CHARS: usize = 2;

/// Default upper bound on (term, method) query variants per resolution
pub const DEFAULT_MAX_QUERY_VARIANTS: usize = 12;

/// `USDA` `FoodData` Central base URL
pub const USDA_BASE_URL: &str = "https://api.nal.usda.gov/fdc/v1";

/// `USDA` request timeout
pub const USDA_TIMEOUT: Duration = Duration::from_secs(8);

/// Edamam food database parser endpoint
pub const EDAMAM_BASE_URL: &str = "https://api.edamam.com/api/food-database/v2/parser";

/// Edamam request timeout
pub const EDAMAM_TIMEOUT: Duration = Duration::from_secs(12);

/// Gemini API base URL
pub const GEMINI_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini request timeout
pub const GEMINI_TIMEOUT: Duration = Duration::from_secs(15);

/// Preferred Gemini model when none is configured
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash-lite";

/// Models tried in order after the configured one returns 404
pub const GEMINI_FALLBACK_MODELS: &[&str] = &["gemini-2.0-flash-lite", "gemini-1.5-flash"];

/// Default provider priority
pub const DEFAULT_PROVIDER_ORDER: &[&str] = &["edamam", "usda"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generative_calls_stay_within_a_chat_turn() {
        assert_eq!(GEMINI_TIMEOUT, Duration::from_secs(15));
        assert!(GEMINI_TIMEOUT >= EDAMAM_TIMEOUT);
        assert!(GEMINI_TIMEOUT >= USDA_TIMEOUT);
    }
}
