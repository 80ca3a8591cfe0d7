// ABOUTME: Cache-related constants for TTL, capacity, and cleanup intervals
// ABOUTME: Defaults for the in-memory nutrition cache
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 KBJU Diary Contributors

/// Default maximum cache entries for in-memory cache
pub const DEFAULT_CACHE_MAX_ENTRIES: usize = 10_000;

/// Default cleanup interval in seconds for expired entries
pub const DEFAULT_CLEANUP_INTERVAL_SECS: u64 = 300; // 5 minutes

/// Food lookup cache TTL (48 hours) - provider nutrient data is stable
pub const TTL_FOOD_LOOKUP_SECS: u64 = 172_800;

/// Cache key prefix for namespacing
pub const CACHE_KEY_PREFIX: &str = "kbju:food:";
