// ABOUTME: Cache abstraction layer for nutrition lookup results
// ABOUTME: Pluggable backend trait with an LRU in-memory implementation and TTL expiry
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 KBJU Diary Contributors

/// In-memory cache implementation
pub mod memory;
/// Typed nutrition lookup cache
pub mod nutrition;

pub use nutrition::NutritionCache;

use crate::constants::cache::{
    CACHE_KEY_PREFIX, DEFAULT_CACHE_MAX_ENTRIES, DEFAULT_CLEANUP_INTERVAL_SECS,
    TTL_FOOD_LOOKUP_SECS,
};
use crate::errors::AppResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Cache provider trait for pluggable backend implementations
///
/// # Examples
///
/// ```rust,no_run
/// use kbju_diary::cache::{CacheConfig, CacheKey, CacheProvider};
/// use kbju_diary::cache::memory::InMemoryCache;
/// use std::time::Duration;
/// # async fn example() -> Result<(), kbju_diary::errors::AppError> {
///
/// let config = CacheConfig {
///     enable_background_cleanup: false,
///     ..Default::default()
/// };
/// let cache: InMemoryCache = InMemoryCache::new(config).await?;
///
/// let key = CacheKey::food("куриная_грудка");
/// cache.set(&key, &vec!["chicken breast"], Duration::from_secs(3600)).await?;
///
/// let cached: Option<Vec<String>> = cache.get(&key).await?;
/// assert!(cached.is_some());
/// # Ok(())
/// # }
/// ```
#[async_trait::async_trait]
pub trait CacheProvider: Send + Sync + Clone {
    /// Create new cache instance with configuration
    ///
    /// # Errors
    ///
    /// Returns an error if cache initialization fails
    async fn new(config: CacheConfig) -> AppResult<Self>
    where
        Self: Sized;

    /// Store value in cache with TTL, replacing any previous value
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or storage fails
    async fn set<T: Serialize + Send + Sync>(
        &self,
        key: &CacheKey,
        value: &T,
        ttl: Duration,
    ) -> AppResult<()>;

    /// Retrieve value from cache, `None` when absent or expired
    ///
    /// # Errors
    ///
    /// Returns an error if the stored payload cannot be deserialized
    async fn get<T: for<'de> Deserialize<'de>>(&self, key: &CacheKey) -> AppResult<Option<T>>;

    /// Remove single cache entry
    ///
    /// # Errors
    ///
    /// Returns an error if invalidation fails
    async fn invalidate(&self, key: &CacheKey) -> AppResult<()>;

    /// Check if an unexpired key exists in cache
    ///
    /// # Errors
    ///
    /// Returns an error if existence check fails
    async fn exists(&self, key: &CacheKey) -> AppResult<bool>;

    /// Get remaining TTL for key
    ///
    /// # Errors
    ///
    /// Returns an error if TTL check fails
    async fn ttl(&self, key: &CacheKey) -> AppResult<Option<Duration>>;

    /// Number of stored entries, expired ones included until reclaimed
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot report its size
    async fn entry_count(&self) -> AppResult<usize>;

    /// Clear all cache entries (for testing/admin)
    ///
    /// # Errors
    ///
    /// Returns an error if clear operation fails
    async fn clear_all(&self) -> AppResult<()>;
}

/// Cache configuration
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Bypass the cache entirely (reads miss, writes are dropped)
    pub enabled: bool,
    /// Maximum number of entries (for in-memory cache)
    pub max_entries: usize,
    /// Cleanup interval for expired entries
    pub cleanup_interval: Duration,
    /// Enable background cleanup task (should be false in tests to avoid runtime conflicts)
    pub enable_background_cleanup: bool,
    /// Food lookup TTL in seconds
    pub food_lookup_ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: DEFAULT_CACHE_MAX_ENTRIES,
            cleanup_interval: Duration::from_secs(DEFAULT_CLEANUP_INTERVAL_SECS),
            enable_background_cleanup: true,
            food_lookup_ttl_secs: TTL_FOOD_LOOKUP_SECS,
        }
    }
}

impl CacheConfig {
    /// TTL applied to food lookup results
    #[must_use]
    pub const fn food_lookup_ttl(&self) -> Duration {
        Duration::from_secs(self.food_lookup_ttl_secs)
    }
}

/// Structured cache key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Specific resource being cached
    pub resource: CacheResource,
}

impl CacheKey {
    /// Create new cache key
    #[must_use]
    pub const fn new(resource: CacheResource) -> Self {
        Self { resource }
    }

    /// Key for the candidate list of a normalized food key
    #[must_use]
    pub fn food(food_key: impl Into<String>) -> Self {
        Self::new(CacheResource::FoodLookup {
            food_key: food_key.into(),
        })
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{CACHE_KEY_PREFIX}{}", self.resource)
    }
}

/// Cache resource types
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheResource {
    /// Ranked nutrition candidates for a normalized food key (48h TTL)
    FoodLookup {
        /// Normalized food key
        food_key: String,
    },
}

impl CacheResource {
    /// Get recommended TTL for this resource type
    #[must_use]
    pub const fn recommended_ttl(&self) -> Duration {
        match self {
            Self::FoodLookup { .. } => Duration::from_secs(TTL_FOOD_LOOKUP_SECS),
        }
    }
}

impl fmt::Display for CacheResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FoodLookup { food_key } => write!(f, "lookup:{food_key}"),
        }
    }
}
