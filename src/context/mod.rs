// ABOUTME: Dependency wiring from configuration to a ready conversation engine
// ABOUTME: Builds storage, cache, translator, providers, estimator and resolution chain once at startup
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 KBJU Diary Contributors

//! Focused dependency context
//!
//! Every collaborator is constructed here from an explicit [`AppConfig`];
//! nothing downstream reads the environment.

use std::sync::Arc;

use tracing::info;

use crate::cache::NutritionCache;
use crate::config::{AppConfig, TranslationSettings};
use crate::conversation::ConversationEngine;
use crate::database_plugins::factory::Database;
use crate::errors::AppResult;
use crate::estimation::{LlmNutritionEstimator, NutritionEstimator};
use crate::llm::GeminiProvider;
use crate::providers::build_providers;
use crate::resolution::{ResolutionChain, SeedDictionary};
use crate::translation::{LlmKeywordBackend, TermTranslator};

/// Everything a transport needs to serve users
#[derive(Clone)]
pub struct DiaryContext {
    config: Arc<AppConfig>,
    database: Arc<Database>,
    chain: Arc<ResolutionChain>,
    engine: Arc<ConversationEngine>,
}

impl DiaryContext {
    /// Build every collaborator described by `config`
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be opened, the seed file cannot be
    /// read or the provider order names an unknown adapter
    pub async fn from_config(config: AppConfig) -> AppResult<Self> {
        let database = Arc::new(Database::new(&config.database.url.to_connection_string()).await?);
        info!("Storage backend: {}", database.backend_info());

        let chain = Arc::new(build_chain(&config).await?);
        let mut engine = ConversationEngine::new(chain.clone(), database.clone());
        if let Some(estimator) = build_estimator(&config.translation) {
            info!("Generated nutrition estimates enabled via {}", estimator.name());
            engine = engine.with_estimator(estimator);
        }
        let engine = Arc::new(engine);

        Ok(Self {
            config: Arc::new(config),
            database,
            chain,
            engine,
        })
    }

    /// Loaded configuration
    #[must_use]
    pub const fn config(&self) -> &Arc<AppConfig> {
        &self.config
    }

    /// Storage collaborator
    #[must_use]
    pub const fn database(&self) -> &Arc<Database> {
        &self.database
    }

    /// Resolution chain
    #[must_use]
    pub const fn chain(&self) -> &Arc<ResolutionChain> {
        &self.chain
    }

    /// Conversation engine
    #[must_use]
    pub const fn engine(&self) -> &Arc<ConversationEngine> {
        &self.engine
    }
}

/// Translator with the generative backend attached when enabled and keyed
#[must_use]
pub fn build_translator(settings: &TranslationSettings) -> TermTranslator {
    let translator =
        TermTranslator::new(settings.flags).with_title_localization(settings.localize_titles);
    match (&settings.gemini_api_key, settings.flags.use_generative_backend) {
        (Some(key), true) => {
            let provider = GeminiProvider::new(key.clone())
                .with_default_model(settings.gemini_model.clone());
            translator.with_backend(Arc::new(LlmKeywordBackend::new(Arc::new(provider))))
        }
        _ => translator,
    }
}

/// Gemini-backed estimator when estimates are enabled and a key is set
#[must_use]
pub fn build_estimator(settings: &TranslationSettings) -> Option<Arc<dyn NutritionEstimator>> {
    if !settings.enable_estimates {
        return None;
    }
    settings.gemini_api_key.as_ref().map(|key| {
        let provider =
            GeminiProvider::new(key.clone()).with_default_model(settings.gemini_model.clone());
        Arc::new(LlmNutritionEstimator::new(Arc::new(provider))) as Arc<dyn NutritionEstimator>
    })
}

/// Resolution chain over an in-memory nutrition cache
///
/// # Errors
///
/// Returns an error if the cache cannot be created, the seed file is invalid
/// or the provider order names an unknown adapter
pub async fn build_chain(config: &AppConfig) -> AppResult<ResolutionChain> {
    let cache = NutritionCache::in_memory(config.cache.clone()).await?;

    let mut seeds = SeedDictionary::builtin();
    if let Some(path) = &config.resolution.seed_dictionary_path {
        seeds = seeds.extend_from_file(path)?;
        info!("Loaded seed dictionary from {}", path.display());
    }

    let providers = build_providers(
        &config.providers.order,
        &config.providers.usda,
        &config.providers.edamam,
    )?;

    Ok(ResolutionChain::new(cache, build_translator(&config.translation))
        .with_seeds(seeds)
        .with_providers(providers)
        .with_max_query_variants(config.resolution.max_query_variants))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translation::TranslationConfig;

    fn settings(key: Option<&str>, generative: bool) -> TranslationSettings {
        TranslationSettings {
            flags: TranslationConfig {
                use_generative_backend: generative,
                ..TranslationConfig::default()
            },
            localize_titles: true,
            gemini_api_key: key.map(str::to_owned),
            ..TranslationSettings::default()
        }
    }

    #[test]
    fn test_estimator_needs_key_and_flag() {
        assert!(build_estimator(&settings(None, false)).is_none());
        assert!(build_estimator(&settings(Some("AIza-test"), false)).is_some());

        let disabled = TranslationSettings {
            enable_estimates: false,
            ..settings(Some("AIza-test"), true)
        };
        assert!(build_estimator(&disabled).is_none());
    }

    #[test]
    fn test_title_localization_follows_backend() {
        assert!(!build_translator(&settings(Some("AIza-test"), false)).localizes_titles());
        assert!(!build_translator(&settings(None, true)).localizes_titles());
        assert!(build_translator(&settings(Some("AIza-test"), true)).localizes_titles());
    }
}
