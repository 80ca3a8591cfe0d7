// ABOUTME: Shared test utilities and in-process fakes for integration tests
// ABOUTME: Provides quiet logging plus counting providers, scripted backends and estimators, and chain builders
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 KBJU Diary Contributors
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `kbju_diary`
//!
//! Nothing here touches the network: providers and translation backends are
//! scripted fakes that count their calls.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use kbju_diary::cache::{CacheConfig, NutritionCache};
use kbju_diary::conversation::ConversationEngine;
use kbju_diary::database_plugins::memory::MemoryDiaryStore;
use kbju_diary::errors::{AppError, AppResult};
use kbju_diary::estimation::NutritionEstimator;
use kbju_diary::models::{CandidateSource, CookingMethod, NutritionCandidate};
use kbju_diary::providers::{LookupOutcome, NutritionProvider};
use kbju_diary::resolution::{ResolutionChain, SeedDictionary};
use kbju_diary::translation::{TermTranslator, TranslationBackend, TranslationConfig};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        // Check for TEST_LOG environment variable to control test logging level
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Cache config with the background sweeper off
pub fn test_cache_config() -> CacheConfig {
    CacheConfig {
        max_entries: 100,
        cleanup_interval: Duration::from_secs(300),
        enable_background_cleanup: false,
        ..CacheConfig::default()
    }
}

/// Empty in-memory nutrition cache
pub async fn test_cache() -> Result<NutritionCache> {
    Ok(NutritionCache::in_memory(test_cache_config()).await?)
}

/// Provider-tagged candidate
pub fn candidate(provider: &str, title: &str, kcal: f64) -> NutritionCandidate {
    NutritionCandidate::new(
        title,
        kcal,
        10.0,
        2.0,
        5.0,
        CandidateSource::Provider(provider.to_owned()),
    )
}

/// One recorded provider call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedQuery {
    pub term: String,
    pub method: Option<CookingMethod>,
}

/// Provider fake that replays scripted outcomes and counts calls
///
/// Once the script is exhausted it keeps answering with the fallback outcome.
pub struct CountingProvider {
    name: &'static str,
    configured: bool,
    script: Mutex<VecDeque<LookupOutcome>>,
    fallback: LookupOutcome,
    calls: AtomicUsize,
    queries: Mutex<Vec<RecordedQuery>>,
}

impl CountingProvider {
    /// Always answer with `outcome`
    pub fn always(name: &'static str, outcome: LookupOutcome) -> Arc<Self> {
        Self::scripted(name, Vec::new(), outcome)
    }

    /// Replay `script` in order, then answer with `fallback`
    pub fn scripted(
        name: &'static str,
        script: Vec<LookupOutcome>,
        fallback: LookupOutcome,
    ) -> Arc<Self> {
        Arc::new(Self {
            name,
            configured: true,
            script: Mutex::new(script.into()),
            fallback,
            calls: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
        })
    }

    /// Number of lookups made so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every query received, in order
    pub fn queries(&self) -> Vec<RecordedQuery> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl NutritionProvider for CountingProvider {
    fn name(&self) -> &'static str {
        self.name
    }

    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn lookup(&self, term: &str, method: Option<CookingMethod>) -> LookupOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(RecordedQuery {
            term: term.to_owned(),
            method,
        });
        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or_else(|| self.fallback.clone())
    }
}

/// Translation backend fake answering with fixed keywords or an error
pub struct ScriptedBackend {
    answer: Option<Vec<String>>,
    titles: Vec<(String, String)>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl ScriptedBackend {
    /// Backend that returns `keywords`
    pub fn answering(keywords: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            answer: Some(keywords.iter().map(|k| (*k).to_owned()).collect()),
            titles: Vec::new(),
            delay: None,
            calls: AtomicUsize::new(0),
        })
    }

    /// Backend whose every call fails
    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            answer: None,
            titles: Vec::new(),
            delay: None,
            calls: AtomicUsize::new(0),
        })
    }

    /// Backend that answers only after `delay`
    pub fn slow(keywords: &[&str], delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            answer: Some(keywords.iter().map(|k| (*k).to_owned()).collect()),
            titles: Vec::new(),
            delay: Some(delay),
            calls: AtomicUsize::new(0),
        })
    }

    /// Backend with no keywords that renders the listed English titles in Russian
    pub fn localizing(titles: &[(&str, &str)]) -> Arc<Self> {
        Arc::new(Self {
            answer: Some(Vec::new()),
            titles: titles
                .iter()
                .map(|(en, ru)| ((*en).to_owned(), (*ru).to_owned()))
                .collect(),
            delay: None,
            calls: AtomicUsize::new(0),
        })
    }

    /// Number of calls so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TranslationBackend for ScriptedBackend {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn keywords(&self, _text: &str, _method: Option<CookingMethod>) -> AppResult<Vec<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.answer
            .clone()
            .ok_or_else(|| AppError::external_service("scripted", "backend unavailable"))
    }

    async fn localize(&self, title: &str) -> AppResult<Option<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.answer.is_none() {
            return Err(AppError::external_service("scripted", "backend unavailable"));
        }
        Ok(self
            .titles
            .iter()
            .find(|(en, _)| en == title)
            .map(|(_, ru)| ru.clone()))
    }
}

/// Estimator fake answering with a fixed candidate, nothing or an error
pub struct ScriptedEstimator {
    answer: Option<NutritionCandidate>,
    fails: bool,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl ScriptedEstimator {
    fn build(answer: Option<NutritionCandidate>, fails: bool, delay: Option<Duration>) -> Arc<Self> {
        Arc::new(Self {
            answer,
            fails,
            delay,
            calls: AtomicUsize::new(0),
        })
    }

    /// Estimator returning `title` at the given per-100 g values
    pub fn answering(title: &str, kcal: f64, protein: f64, fat: f64, carbs: f64) -> Arc<Self> {
        let candidate =
            NutritionCandidate::new(title, kcal, protein, fat, carbs, CandidateSource::Estimate);
        Self::build(Some(candidate), false, None)
    }

    /// Estimator that never has an answer
    pub fn empty() -> Arc<Self> {
        Self::build(None, false, None)
    }

    /// Estimator whose every call fails
    pub fn failing() -> Arc<Self> {
        Self::build(None, true, None)
    }

    /// Estimator that answers `kcal` per 100 g only after `delay`
    pub fn slow(title: &str, kcal: f64, delay: Duration) -> Arc<Self> {
        let candidate = NutritionCandidate::new(title, kcal, 0.0, 0.0, 0.0, CandidateSource::Estimate);
        Self::build(Some(candidate), false, Some(delay))
    }

    /// Number of calls so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NutritionEstimator for ScriptedEstimator {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn estimate(
        &self,
        _title: &str,
        _method: Option<CookingMethod>,
    ) -> AppResult<Option<NutritionCandidate>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fails {
            return Err(AppError::external_service("scripted", "estimator unavailable"));
        }
        Ok(self.answer.clone())
    }
}

/// Translator with the built-in dictionary only
pub fn dictionary_translator() -> TermTranslator {
    TermTranslator::new(TranslationConfig::default())
}

/// Chain over built-in seeds, a fresh cache and the given providers
pub async fn chain_with(providers: Vec<Arc<dyn NutritionProvider>>) -> Result<ResolutionChain> {
    init_test_logging();
    Ok(ResolutionChain::new(test_cache().await?, dictionary_translator()).with_providers(providers))
}

/// Chain with no seeds so every title reaches the providers
pub async fn chain_without_seeds(
    providers: Vec<Arc<dyn NutritionProvider>>,
) -> Result<ResolutionChain> {
    Ok(chain_with(providers).await?.with_seeds(SeedDictionary::empty()))
}

/// Seedless chain whose translator renders provider titles through `backend`
pub async fn chain_localizing(
    providers: Vec<Arc<dyn NutritionProvider>>,
    backend: Arc<ScriptedBackend>,
) -> Result<ResolutionChain> {
    init_test_logging();
    let translator = TermTranslator::new(TranslationConfig {
        use_generative_backend: true,
        ..TranslationConfig::default()
    })
    .with_backend(backend)
    .with_title_localization(true);
    Ok(ResolutionChain::new(test_cache().await?, translator)
        .with_providers(providers)
        .with_seeds(SeedDictionary::empty()))
}

/// Engine over a memory store; the store handle is returned for assertions
pub fn engine_over(chain: ResolutionChain) -> (ConversationEngine, Arc<MemoryDiaryStore>) {
    let store = Arc::new(MemoryDiaryStore::new());
    let engine = ConversationEngine::new(Arc::new(chain), store.clone());
    (engine, store)
}
