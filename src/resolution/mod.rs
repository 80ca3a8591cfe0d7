// ABOUTME: Resolution chain turning a dish title into ranked per-100g candidates
// ABOUTME: Seed dictionary, cache, translated provider queries and presets in fixed priority
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 KBJU Diary Contributors

//! # Resolution Chain
//!
//! Resolution walks the sources in a fixed order and stops at the first one
//! that yields anything:
//!
//! 1. seed dictionary (exact normalized key, one authoritative candidate)
//! 2. nutrition cache (unexpired entries only)
//! 3. translated search terms against each provider in priority order
//! 4. the static preset table
//!
//! Provider hits are written back to the cache. Every tie-break is a total
//! order, so identical inputs and identical provider responses always
//! select the same candidates in the same order.

mod chain;
/// Static last-resort presets
pub mod presets;
/// Curated seed dictionary
pub mod seed;

pub use chain::{QueryVariant, Resolution, ResolutionChain, ResolutionStep};
pub use presets::PresetTable;
pub use seed::SeedDictionary;

/// Normalize a title into a cache and dictionary key
///
/// Lower-cases, replaces every non-alphanumeric character with a space and
/// joins the remaining words with single underscores.
#[must_use]
pub fn normalize_key(title: &str) -> String {
    let lowered = title.trim().to_lowercase();
    let cleaned: String = lowered
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join("_")
}

#[cfg(test)]
mod tests {
    use super::normalize_key;

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("  Куриная грудка, (без кожи) "), "куриная_грудка_без_кожи");
        assert_eq!(normalize_key("творог 5%"), "творог_5");
        assert_eq!(normalize_key("Молоко 2,5%"), "молоко_2_5");
        assert_eq!(normalize_key("fish & chips / salt-free"), "fish_chips_salt_free");
        assert_eq!(normalize_key("творог_5"), "творог_5");
        assert_eq!(normalize_key("..."), "");
    }
}
