// ABOUTME: Integration tests for the resolution chain over seeds, cache, providers and presets
// ABOUTME: Verifies source priority, caching idempotence, provider skipping and deterministic ordering
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 KBJU Diary Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, clippy::float_cmp)]
#![allow(missing_docs)]

mod common;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use common::{candidate, chain_with, chain_without_seeds, test_cache_config, CountingProvider};
use kbju_diary::cache::{CacheKey, CacheProvider, NutritionCache};
use kbju_diary::models::{CandidateSource, CookingMethod, NutritionCandidate};
use kbju_diary::providers::{LookupOutcome, NutritionProvider};
use kbju_diary::resolution::{normalize_key, ResolutionChain, ResolutionStep, SeedDictionary};
use kbju_diary::translation::{TermTranslator, TranslationConfig};

fn chicken_results(provider: &str) -> LookupOutcome {
    LookupOutcome::Found(vec![
        candidate(provider, "Chicken breast", 120.0),
        candidate(provider, "Chicken breast, roasted", 165.0),
    ])
}

/// Title and nutrients, ignoring the provenance tag
fn values(candidates: &[NutritionCandidate]) -> Vec<(String, f64, f64, f64, f64)> {
    candidates
        .iter()
        .map(|c| {
            (
                c.title.clone(),
                c.kcal_per_100g,
                c.protein_per_100g,
                c.fat_per_100g,
                c.carbs_per_100g,
            )
        })
        .collect()
}

#[tokio::test]
async fn test_second_resolution_is_served_from_cache() -> Result<()> {
    let provider = CountingProvider::always("fake", chicken_results("fake"));
    let chain = chain_without_seeds(vec![provider.clone()]).await?;

    let first = chain.resolve_traced("chicken breast", None).await;
    let second = chain.resolve_traced("chicken breast", None).await;

    assert_eq!(first.step, ResolutionStep::Provider("fake"));
    assert_eq!(second.step, ResolutionStep::Cache);
    assert_eq!(values(&first.candidates), values(&second.candidates));
    assert!(second
        .candidates
        .iter()
        .all(|c| c.source == CandidateSource::Cache));
    assert_eq!(provider.calls(), 1);

    Ok(())
}

#[tokio::test]
async fn test_seed_hit_skips_every_other_source() -> Result<()> {
    let provider = CountingProvider::always("fake", chicken_results("fake"));
    let chain = chain_with(vec![provider.clone()]).await?;

    let resolution = chain.resolve_traced("Творог", None).await;

    assert_eq!(resolution.step, ResolutionStep::Seed);
    assert_eq!(resolution.candidates.len(), 1);
    assert_eq!(resolution.candidates[0].kcal_per_100g, 121.0);
    assert_eq!(resolution.candidates[0].source, CandidateSource::Seed);
    assert_eq!(provider.calls(), 0);
    assert!(chain.cache().is_empty().await);

    Ok(())
}

#[tokio::test]
async fn test_seed_beats_stale_cache_entry() -> Result<()> {
    let provider = CountingProvider::always("fake", LookupOutcome::Empty);
    let chain = chain_with(vec![provider.clone()]).await?;
    chain
        .cache()
        .put("творог", &[candidate("fake", "cottage cheese 9%", 159.0)])
        .await;

    let resolution = chain.resolve_traced("творог", None).await;

    assert_eq!(resolution.step, ResolutionStep::Seed);
    assert_eq!(resolution.candidates[0].kcal_per_100g, 121.0);
    Ok(())
}

#[tokio::test]
async fn test_providers_are_tried_in_priority_order() -> Result<()> {
    let first = CountingProvider::always("first", LookupOutcome::Empty);
    let second = CountingProvider::always("second", chicken_results("second"));
    let third = CountingProvider::always("third", chicken_results("third"));
    let providers: Vec<Arc<dyn NutritionProvider>> =
        vec![first.clone(), second.clone(), third.clone()];
    let chain = chain_without_seeds(providers).await?;

    let resolution = chain.resolve_traced("chicken breast", None).await;

    assert_eq!(resolution.step, ResolutionStep::Provider("second"));
    assert_eq!(first.calls(), 1);
    assert_eq!(second.calls(), 1);
    assert_eq!(third.calls(), 0);
    Ok(())
}

#[tokio::test]
async fn test_method_hinted_variant_is_queried_first() -> Result<()> {
    let provider = CountingProvider::scripted(
        "fake",
        vec![LookupOutcome::Empty],
        chicken_results("fake"),
    );
    let chain = chain_without_seeds(vec![provider.clone()]).await?;

    let resolution = chain
        .resolve_traced("chicken breast", Some(CookingMethod::Boiled))
        .await;

    assert!(!resolution.candidates.is_empty());
    let queries = provider.queries();
    assert_eq!(queries.len(), 2);
    assert_eq!(queries[0].method, Some(CookingMethod::Boiled));
    assert_eq!(queries[1].method, None);
    assert_eq!(queries[0].term, "chicken breast");
    Ok(())
}

#[tokio::test]
async fn test_unauthorized_provider_is_not_retried_with_variants() -> Result<()> {
    let rejected = CountingProvider::always("rejected", LookupOutcome::Unauthorized);
    let empty = CountingProvider::always("empty", LookupOutcome::Empty);
    let providers: Vec<Arc<dyn NutritionProvider>> = vec![rejected.clone(), empty.clone()];
    let chain = chain_without_seeds(providers).await?;

    // Dictionary terms buckwheat, buckwheat groats, гречка, гречка boiled; two variants each
    let resolution = chain
        .resolve_traced("гречка", Some(CookingMethod::Boiled))
        .await;

    assert_eq!(rejected.calls(), 1);
    assert_eq!(empty.calls(), 8);
    assert_eq!(resolution.step, ResolutionStep::Preset);
    assert_eq!(resolution.candidates[0].title, "Гречка отварная");
    assert_eq!(resolution.candidates[0].source, CandidateSource::Preset);
    Ok(())
}

#[tokio::test]
async fn test_unconfigured_providers_stop_the_fan_out() -> Result<()> {
    let missing = CountingProvider::always("missing", LookupOutcome::Unavailable);
    let chain = chain_without_seeds(vec![missing.clone()]).await?;

    let resolution = chain.resolve_traced("гречка", None).await;

    assert_eq!(missing.calls(), 1);
    assert_eq!(resolution.step, ResolutionStep::Unresolved);
    Ok(())
}

#[tokio::test]
async fn test_failures_fall_through_to_next_provider() -> Result<()> {
    let broken = CountingProvider::always("broken", LookupOutcome::Failed("HTTP 500".into()));
    let healthy = CountingProvider::always("healthy", chicken_results("healthy"));
    let providers: Vec<Arc<dyn NutritionProvider>> = vec![broken.clone(), healthy.clone()];
    let chain = chain_without_seeds(providers).await?;

    let resolution = chain.resolve_traced("chicken breast", None).await;

    assert_eq!(resolution.step, ResolutionStep::Provider("healthy"));
    assert_eq!(broken.calls(), 1);
    Ok(())
}

#[tokio::test]
async fn test_query_variants_are_capped() -> Result<()> {
    let empty = CountingProvider::always("empty", LookupOutcome::Empty);
    let chain = chain_without_seeds(vec![empty.clone()])
        .await?
        .with_max_query_variants(3);

    let resolution = chain
        .resolve_traced("гречка", Some(CookingMethod::Fried))
        .await;

    assert_eq!(empty.calls(), 3);
    assert!(resolution.candidates.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_provider_results_are_partitioned_by_method() -> Result<()> {
    let provider = CountingProvider::always(
        "fake",
        LookupOutcome::Found(vec![
            candidate("fake", "raw chicken", 120.0),
            candidate("fake", "boiled chicken", 165.0),
            candidate("fake", "smoked chicken", 180.0),
        ]),
    );
    let chain = chain_without_seeds(vec![provider]).await?;

    let candidates = chain.resolve("chicken", Some(CookingMethod::Boiled)).await;

    assert_eq!(candidates[0].title, "boiled chicken");
    assert_eq!(candidates.len(), 3);
    Ok(())
}

#[tokio::test]
async fn test_identical_inputs_resolve_identically() -> Result<()> {
    let make = || {
        CountingProvider::always(
            "fake",
            LookupOutcome::Found(vec![
                candidate("fake", "rice, white, fried", 163.0),
                candidate("fake", "rice, white", 130.0),
                candidate("fake", "rice, brown, fried", 170.0),
            ]),
        )
    };
    let left = chain_without_seeds(vec![make()]).await?;
    let right = chain_without_seeds(vec![make()]).await?;

    let a = left.resolve("rice", Some(CookingMethod::Fried)).await;
    let b = right.resolve("rice", Some(CookingMethod::Fried)).await;

    assert_eq!(a, b);
    assert_eq!(a[0].title, "rice, white, fried");
    assert_eq!(a[1].title, "rice, brown, fried");
    Ok(())
}

#[tokio::test]
async fn test_disabled_cache_always_queries_providers() -> Result<()> {
    let provider = CountingProvider::always("fake", chicken_results("fake"));
    let mut config = test_cache_config();
    config.enabled = false;
    let chain = ResolutionChain::new(
        NutritionCache::in_memory(config).await?,
        TermTranslator::new(TranslationConfig::default()),
    )
    .with_seeds(SeedDictionary::empty())
    .with_providers(vec![provider.clone()]);

    chain.resolve("chicken breast", None).await;
    chain.resolve("chicken breast", None).await;

    assert_eq!(provider.calls(), 2);
    Ok(())
}

#[tokio::test]
async fn test_corrupt_cache_entry_is_a_miss() -> Result<()> {
    let provider = CountingProvider::always("fake", chicken_results("fake"));
    let chain = chain_without_seeds(vec![provider.clone()]).await?;
    let key = CacheKey::food(normalize_key("chicken breast"));
    chain
        .cache()
        .backend()
        .set(&key, &"not a candidate list", Duration::from_secs(60))
        .await?;

    let resolution = chain.resolve_traced("chicken breast", None).await;

    assert_eq!(resolution.step, ResolutionStep::Provider("fake"));
    assert_eq!(provider.calls(), 1);
    // The provider answer replaced the corrupt payload
    assert_eq!(chain.cache().get("chicken_breast").await.map(|c| c.len()), Some(2));
    Ok(())
}

#[tokio::test]
async fn test_nothing_found_is_unresolved() -> Result<()> {
    let provider = CountingProvider::always("fake", LookupOutcome::Empty);
    let chain = chain_without_seeds(vec![provider]).await?;

    let resolution = chain.resolve_traced("dragonfruit smoothie", None).await;

    assert_eq!(resolution.step, ResolutionStep::Unresolved);
    assert!(resolution.candidates.is_empty());
    assert_eq!(resolution.key, "dragonfruit_smoothie");
    Ok(())
}

#[tokio::test]
async fn test_blank_title_makes_no_calls() -> Result<()> {
    let provider = CountingProvider::always("fake", chicken_results("fake"));
    let chain = chain_without_seeds(vec![provider.clone()]).await?;

    let resolution = chain.resolve_traced("  ?! ", None).await;

    assert_eq!(resolution.step, ResolutionStep::Unresolved);
    assert_eq!(provider.calls(), 0);
    Ok(())
}
