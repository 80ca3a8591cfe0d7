// ABOUTME: Nutrition cache mapping normalized food keys to ranked candidate lists
// ABOUTME: Cache failures and corrupt payloads degrade to misses instead of errors
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 KBJU Diary Contributors

use std::time::Duration;

use tracing::{debug, warn};

use super::memory::InMemoryCache;
use super::{CacheConfig, CacheKey, CacheProvider};
use crate::errors::AppResult;
use crate::models::NutritionCandidate;

/// Typed view over a [`CacheProvider`] for food lookups
#[derive(Clone)]
pub struct NutritionCache<C: CacheProvider = InMemoryCache> {
    store: C,
    enabled: bool,
    ttl: Duration,
}

impl NutritionCache<InMemoryCache> {
    /// In-memory nutrition cache built from `config`
    ///
    /// # Errors
    ///
    /// Returns an error if the backing cache cannot be created
    pub async fn in_memory(config: CacheConfig) -> AppResult<Self> {
        let enabled = config.enabled;
        let ttl = config.food_lookup_ttl();
        let store = InMemoryCache::new(config).await?;
        Ok(Self {
            store,
            enabled,
            ttl,
        })
    }
}

impl<C: CacheProvider> NutritionCache<C> {
    /// Wrap an existing backend
    pub const fn new(store: C, enabled: bool, ttl: Duration) -> Self {
        Self {
            store,
            enabled,
            ttl,
        }
    }

    /// Whether reads and writes reach the backend
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// TTL applied on writes
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Unexpired candidates for `food_key`; corrupt or unreadable entries count as a miss
    pub async fn get(&self, food_key: &str) -> Option<Vec<NutritionCandidate>> {
        if !self.enabled {
            return None;
        }
        let key = CacheKey::food(food_key);
        match self.store.get::<Vec<NutritionCandidate>>(&key).await {
            Ok(Some(candidates)) if !candidates.is_empty() => Some(candidates),
            Ok(_) => None,
            Err(e) => {
                warn!(key = %key, error = %e, "Discarding unreadable nutrition cache entry");
                if let Err(e) = self.store.invalidate(&key).await {
                    debug!(key = %key, error = %e, "Failed to drop unreadable cache entry");
                }
                None
            }
        }
    }

    /// Overwrite the entry for `food_key`; failures are logged and ignored
    pub async fn put(&self, food_key: &str, candidates: &[NutritionCandidate]) {
        if !self.enabled || candidates.is_empty() {
            return;
        }
        let key = CacheKey::food(food_key);
        if let Err(e) = self.store.set(&key, &candidates, self.ttl).await {
            warn!(key = %key, error = %e, "Failed to write nutrition cache entry");
        }
    }

    /// Number of live entries, zero when the backend cannot tell
    pub async fn len(&self) -> usize {
        self.store.entry_count().await.unwrap_or(0)
    }

    /// True when no entries are stored
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Underlying backend
    pub const fn backend(&self) -> &C {
        &self.store
    }
}
