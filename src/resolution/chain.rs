// ABOUTME: Resolution chain orchestration across seeds, cache, providers and presets
// ABOUTME: Sequential provider calls with short-circuit on the first non-empty result
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 KBJU Diary Contributors

use std::sync::Arc;

use tracing::{debug, info, instrument};

use super::{normalize_key, PresetTable, SeedDictionary};
use crate::cache::memory::InMemoryCache;
use crate::cache::{CacheProvider, NutritionCache};
use crate::constants::providers::DEFAULT_MAX_QUERY_VARIANTS;
use crate::logging::AppLogger;
use crate::models::{CandidateSource, CookingMethod, NutritionCandidate};
use crate::providers::scoring::partition_by_method;
use crate::providers::{LookupOutcome, NutritionProvider};
use crate::translation::TermTranslator;

/// Which source produced a resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionStep {
    /// Seed dictionary hit
    Seed,
    /// Nutrition cache hit
    Cache,
    /// Provider hit, by adapter name
    Provider(&'static str),
    /// Static preset fallback
    Preset,
    /// Nothing matched
    Unresolved,
}

impl ResolutionStep {
    /// Short label for logs
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Seed => "seed",
            Self::Cache => "cache",
            Self::Provider(name) => *name,
            Self::Preset => "preset",
            Self::Unresolved => "none",
        }
    }
}

/// One provider query: a search term with or without the method hint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryVariant {
    /// Search term
    pub term: String,
    /// Method hint passed to the adapter
    pub method: Option<CookingMethod>,
}

/// Outcome of one resolution
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Normalized food key
    pub key: String,
    /// Source that answered
    pub step: ResolutionStep,
    /// Ranked candidates, empty when unresolved
    pub candidates: Vec<NutritionCandidate>,
}

impl Resolution {
    fn new(key: String, step: ResolutionStep, candidates: Vec<NutritionCandidate>) -> Self {
        Self {
            key,
            step,
            candidates,
        }
    }
}

/// Orchestrates every nutrition source for one title at a time
pub struct ResolutionChain<C: CacheProvider = InMemoryCache> {
    seeds: SeedDictionary,
    cache: NutritionCache<C>,
    translator: TermTranslator,
    providers: Vec<Arc<dyn NutritionProvider>>,
    presets: PresetTable,
    max_query_variants: usize,
}

impl<C: CacheProvider> ResolutionChain<C> {
    /// Chain with built-in seeds and presets and no providers
    pub fn new(cache: NutritionCache<C>, translator: TermTranslator) -> Self {
        Self {
            seeds: SeedDictionary::builtin(),
            cache,
            translator,
            providers: Vec::new(),
            presets: PresetTable::builtin(),
            max_query_variants: DEFAULT_MAX_QUERY_VARIANTS,
        }
    }

    /// Replace the seed dictionary
    #[must_use]
    pub fn with_seeds(mut self, seeds: SeedDictionary) -> Self {
        self.seeds = seeds;
        self
    }

    /// Providers in priority order
    #[must_use]
    pub fn with_providers(mut self, providers: Vec<Arc<dyn NutritionProvider>>) -> Self {
        self.providers = providers;
        self
    }

    /// Replace the preset table
    #[must_use]
    pub const fn with_presets(mut self, presets: PresetTable) -> Self {
        self.presets = presets;
        self
    }

    /// Cap on provider query variants per resolution, at least one
    #[must_use]
    pub fn with_max_query_variants(mut self, max: usize) -> Self {
        self.max_query_variants = max.max(1);
        self
    }

    /// Seed dictionary in use
    pub const fn seeds(&self) -> &SeedDictionary {
        &self.seeds
    }

    /// Nutrition cache in use
    pub const fn cache(&self) -> &NutritionCache<C> {
        &self.cache
    }

    /// Translator in use
    pub const fn translator(&self) -> &TermTranslator {
        &self.translator
    }

    /// Providers in priority order
    pub fn providers(&self) -> &[Arc<dyn NutritionProvider>] {
        &self.providers
    }

    /// Ranked candidates for `title`, empty when no source knows it
    pub async fn resolve(
        &self,
        title: &str,
        method: Option<CookingMethod>,
    ) -> Vec<NutritionCandidate> {
        self.resolve_traced(title, method).await.candidates
    }

    /// Like [`Self::resolve`] but also reports which source answered
    #[instrument(skip(self), fields(key = tracing::field::Empty))]
    pub async fn resolve_traced(&self, title: &str, method: Option<CookingMethod>) -> Resolution {
        let key = normalize_key(title);
        tracing::Span::current().record("key", key.as_str());
        if key.is_empty() {
            return Resolution::new(key, ResolutionStep::Unresolved, Vec::new());
        }

        if let Some(seed) = self.seeds.get(&key) {
            AppLogger::log_resolution(&key, "seed", 1);
            return Resolution::new(
                key,
                ResolutionStep::Seed,
                vec![seed.clone().retagged(CandidateSource::Seed)],
            );
        }

        if let Some(cached) = self.cache.get(&key).await {
            let candidates: Vec<_> = cached
                .into_iter()
                .map(|c| c.retagged(CandidateSource::Cache))
                .collect();
            AppLogger::log_resolution(&key, "cache", candidates.len());
            return Resolution::new(key, ResolutionStep::Cache, candidates);
        }

        let terms = self.translator.terms_for(title, method).await;
        let variants = self.query_variants(&terms, method);
        info!(
            key = %key,
            queries = %variants.iter().map(|v| v.term.as_str()).collect::<Vec<_>>().join(", "),
            "Provider queries"
        );

        if let Some((provider, candidates)) = self.query_providers(&variants).await {
            let candidates = partition_by_method(candidates, method);
            self.cache.put(&key, &candidates).await;
            AppLogger::log_resolution(&key, provider, candidates.len());
            return Resolution::new(key, ResolutionStep::Provider(provider), candidates);
        }

        if let Some(preset) = self.presets.lookup(title, method) {
            AppLogger::log_resolution(&key, "preset", 1);
            return Resolution::new(key, ResolutionStep::Preset, vec![preset]);
        }

        AppLogger::log_resolution(&key, "none", 0);
        Resolution::new(key, ResolutionStep::Unresolved, Vec::new())
    }

    /// Method-hinted variant first, then the bare term, deduplicated and capped
    #[must_use]
    pub fn query_variants(&self, terms: &[String], method: Option<CookingMethod>) -> Vec<QueryVariant> {
        let mut variants: Vec<QueryVariant> = Vec::new();
        for term in terms {
            let hints = method.map_or_else(|| vec![None], |m| vec![Some(m), None]);
            for hint in hints {
                let variant = QueryVariant {
                    term: term.clone(),
                    method: hint,
                };
                if !variants.contains(&variant) {
                    variants.push(variant);
                }
            }
        }
        variants.truncate(self.max_query_variants);
        variants
    }

    /// Variants outer, providers inner; first non-empty answer wins
    async fn query_providers(
        &self,
        variants: &[QueryVariant],
    ) -> Option<(&'static str, Vec<NutritionCandidate>)> {
        let mut skipped: Vec<&'static str> = Vec::new();

        for variant in variants {
            for provider in &self.providers {
                let name = provider.name();
                if skipped.contains(&name) {
                    continue;
                }
                match provider.lookup(&variant.term, variant.method).await {
                    LookupOutcome::Found(candidates) if !candidates.is_empty() => {
                        return Some((name, candidates));
                    }
                    LookupOutcome::Unauthorized => {
                        info!(provider = name, "Credentials rejected, skipping provider for this resolution");
                        skipped.push(name);
                    }
                    LookupOutcome::Unavailable => skipped.push(name),
                    outcome => {
                        debug!(provider = name, term = %variant.term, outcome = outcome.label(), "No result");
                    }
                }
            }
            if skipped.len() == self.providers.len() {
                break;
            }
        }
        None
    }
}
