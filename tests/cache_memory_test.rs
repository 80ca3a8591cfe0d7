// ABOUTME: Unit tests for the in-memory cache and the typed nutrition cache on top of it
// ABOUTME: Tests TTL expiration, capacity limits, overwrites and the disabled mode
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 KBJU Diary Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, clippy::float_cmp)]
#![allow(missing_docs)]

mod common;

use std::time::Duration;

use anyhow::Result;
use common::{candidate, test_cache_config};
use kbju_diary::cache::memory::InMemoryCache;
use kbju_diary::cache::{CacheConfig, CacheKey, CacheProvider, NutritionCache};

/// Helper: Create in-memory cache with custom capacity
async fn create_test_cache(max_entries: usize) -> Result<InMemoryCache> {
    let config = CacheConfig {
        max_entries,
        ..test_cache_config()
    };
    Ok(InMemoryCache::new(config).await?)
}

#[tokio::test]
async fn test_cache_set_and_get() -> Result<()> {
    let cache = create_test_cache(100).await?;
    let key = CacheKey::food("rice");
    let data = vec![candidate("usda", "Rice, white, cooked", 130.0)];

    cache.set(&key, &data, Duration::from_secs(10)).await?;

    let retrieved: Option<Vec<kbju_diary::models::NutritionCandidate>> = cache.get(&key).await?;
    assert_eq!(retrieved, Some(data));
    assert!(cache.exists(&key).await?);

    Ok(())
}

#[tokio::test]
async fn test_cache_expiration() -> Result<()> {
    let cache = create_test_cache(100).await?;
    let key = CacheKey::food("buckwheat");

    // Set value with 1-second TTL
    cache.set(&key, &"expires", Duration::from_secs(1)).await?;
    assert!(cache.exists(&key).await?);

    tokio::time::sleep(Duration::from_millis(1100)).await;

    let retrieved: Option<String> = cache.get(&key).await?;
    assert_eq!(retrieved, None);
    assert!(!cache.exists(&key).await?);

    Ok(())
}

#[tokio::test]
async fn test_lru_capacity_evicts_oldest() -> Result<()> {
    let cache = create_test_cache(2).await?;
    let ttl = Duration::from_secs(60);

    cache.set(&CacheKey::food("a"), &1_u32, ttl).await?;
    cache.set(&CacheKey::food("b"), &2_u32, ttl).await?;
    cache.set(&CacheKey::food("c"), &3_u32, ttl).await?;

    assert_eq!(cache.entry_count().await?, 2);
    assert!(!cache.exists(&CacheKey::food("a")).await?);
    assert_eq!(cache.get::<u32>(&CacheKey::food("c")).await?, Some(3));

    Ok(())
}

#[tokio::test]
async fn test_invalidate_and_clear() -> Result<()> {
    let cache = create_test_cache(10).await?;
    let ttl = Duration::from_secs(60);
    cache.set(&CacheKey::food("a"), &1_u32, ttl).await?;
    cache.set(&CacheKey::food("b"), &2_u32, ttl).await?;

    cache.invalidate(&CacheKey::food("a")).await?;
    assert!(!cache.exists(&CacheKey::food("a")).await?);
    assert_eq!(cache.entry_count().await?, 1);

    cache.clear_all().await?;
    assert_eq!(cache.entry_count().await?, 0);

    Ok(())
}

#[tokio::test]
async fn test_purge_removes_expired_entries() -> Result<()> {
    let cache = create_test_cache(10).await?;
    cache
        .set(&CacheKey::food("short"), &1_u32, Duration::from_millis(50))
        .await?;
    cache
        .set(&CacheKey::food("long"), &2_u32, Duration::from_secs(60))
        .await?;

    tokio::time::sleep(Duration::from_millis(120)).await;

    assert_eq!(cache.purge_expired().await, 1);
    assert_eq!(cache.entry_count().await?, 1);
    Ok(())
}

#[tokio::test]
async fn test_nutrition_cache_overwrites_are_full_replacements() -> Result<()> {
    let cache = NutritionCache::in_memory(test_cache_config()).await?;

    cache
        .put("rice", &[candidate("usda", "Rice, white", 130.0), candidate("usda", "Rice, brown", 112.0)])
        .await;
    cache.put("rice", &[candidate("edamam", "Rice", 129.0)]).await;

    let stored = cache.get("rice").await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].kcal_per_100g, 129.0);
    Ok(())
}

#[tokio::test]
async fn test_nutrition_cache_ignores_empty_results() -> Result<()> {
    let cache = NutritionCache::in_memory(test_cache_config()).await?;

    cache.put("nothing", &[]).await;

    assert!(cache.get("nothing").await.is_none());
    assert!(cache.is_empty().await);
    Ok(())
}

#[tokio::test]
async fn test_nutrition_cache_expires_with_configured_ttl() -> Result<()> {
    let config = CacheConfig {
        food_lookup_ttl_secs: 1,
        ..test_cache_config()
    };
    let cache = NutritionCache::in_memory(config).await?;
    assert_eq!(cache.ttl(), Duration::from_secs(1));

    cache.put("egg", &[candidate("usda", "Egg, whole", 143.0)]).await;
    assert!(cache.get("egg").await.is_some());

    tokio::time::sleep(Duration::from_millis(1100)).await;
    assert!(cache.get("egg").await.is_none());
    Ok(())
}

#[tokio::test]
async fn test_disabled_nutrition_cache_is_inert() -> Result<()> {
    let config = CacheConfig {
        enabled: false,
        ..test_cache_config()
    };
    let cache = NutritionCache::in_memory(config).await?;

    cache.put("rice", &[candidate("usda", "Rice", 130.0)]).await;

    assert!(!cache.is_enabled());
    assert!(cache.get("rice").await.is_none());
    assert_eq!(cache.len().await, 0);
    Ok(())
}
