// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Handles environment variables, credential masking and runtime configuration parsing
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Environment-based configuration management

use crate::cache::CacheConfig;
use crate::constants::cache::{DEFAULT_CACHE_MAX_ENTRIES, TTL_FOOD_LOOKUP_SECS};
use crate::constants::env_config;
use crate::constants::providers::{
    DEFAULT_GEMINI_MODEL, DEFAULT_MAX_QUERY_VARIANTS, DEFAULT_PROVIDER_ORDER, EDAMAM_BASE_URL,
    USDA_BASE_URL,
};
use crate::constants::service_names;
use crate::providers::{EdamamConfig, UsdaConfig};
use crate::translation::TranslationConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use tracing::{info, warn};

/// Environment type for security and other configurations
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Type-safe database configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum DatabaseUrl {
    /// Process memory store, lost on exit
    #[default]
    Memory,
    /// In-memory `SQLite`
    SqliteMemory,
    /// `SQLite` database with file path
    SQLite {
        /// Database file
        path: PathBuf,
    },
}

impl DatabaseUrl {
    /// Parse from string
    ///
    /// # Errors
    ///
    /// Returns an error if the string is empty
    pub fn parse_url(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            anyhow::bail!("{} must not be empty", env_config::DATABASE_URL);
        }
        if s.eq_ignore_ascii_case("memory") {
            Ok(Self::Memory)
        } else if let Some(path_str) = s.strip_prefix("sqlite:") {
            if path_str == ":memory:" {
                Ok(Self::SqliteMemory)
            } else {
                Ok(Self::SQLite {
                    path: PathBuf::from(path_str.trim_start_matches("//")),
                })
            }
        } else {
            // Fallback: treat as SQLite file path
            Ok(Self::SQLite {
                path: PathBuf::from(s),
            })
        }
    }

    /// Convert to connection string
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::Memory => "memory".to_owned(),
            Self::SqliteMemory => "sqlite::memory:".to_owned(),
            Self::SQLite { path } => format!("sqlite:{}", path.display()),
        }
    }

    /// Check if data is lost on exit
    #[must_use]
    pub const fn is_ephemeral(&self) -> bool {
        matches!(self, Self::Memory | Self::SqliteMemory)
    }
}

/// Database configuration
#[derive(Debug, Clone, Default)]
pub struct DatabaseConfig {
    /// Storage backend
    pub url: DatabaseUrl,
}

/// Provider adapters and their priority
#[derive(Debug, Clone)]
pub struct ProvidersConfig {
    /// Adapter names in priority order
    pub order: Vec<String>,
    /// USDA `FoodData` Central settings
    pub usda: UsdaConfig,
    /// Edamam settings
    pub edamam: EdamamConfig,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            order: DEFAULT_PROVIDER_ORDER.iter().map(|s| (*s).to_owned()).collect(),
            usda: UsdaConfig::default(),
            edamam: EdamamConfig::default(),
        }
    }
}

/// Translation flags plus generative backend credentials
#[derive(Debug, Clone)]
pub struct TranslationSettings {
    /// Active translation sources
    pub flags: TranslationConfig,
    /// Show English provider titles in Russian through the generative backend
    pub localize_titles: bool,
    /// Offer generated estimates when a Gemini key is present
    pub enable_estimates: bool,
    /// Gemini API key
    pub gemini_api_key: Option<String>,
    /// Preferred Gemini model
    pub gemini_model: String,
}

impl Default for TranslationSettings {
    fn default() -> Self {
        Self {
            flags: TranslationConfig::default(),
            localize_titles: false,
            enable_estimates: true,
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_owned(),
        }
    }
}

/// Resolution chain tuning
#[derive(Debug, Clone)]
pub struct ResolutionSettings {
    /// Extra seed foods loaded at startup
    pub seed_dictionary_path: Option<PathBuf>,
    /// Cap on provider query variants per resolution
    pub max_query_variants: usize,
}

impl Default for ResolutionSettings {
    fn default() -> Self {
        Self {
            seed_dictionary_path: None,
            max_query_variants: DEFAULT_MAX_QUERY_VARIANTS,
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Deployment environment
    pub environment: Environment,
    /// Storage backend
    pub database: DatabaseConfig,
    /// Provider adapters
    pub providers: ProvidersConfig,
    /// Term translator
    pub translation: TranslationSettings,
    /// Nutrition cache
    pub cache: CacheConfig,
    /// Resolution chain
    pub resolution: ResolutionSettings,
}

impl AppConfig {
    /// Load configuration from environment variables, reading `.env` first if present
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric or URL variable cannot be parsed
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        // Load .env file if it exists
        if let Err(e) = dotenvy::dotenv() {
            warn!("No .env file found or failed to load: {}", e);
        }

        let use_generative_backend = env_bool(env_config::USE_GEMINI_TRANSLATE)
            .or_else(|| env_bool(env_config::USE_GEMINI_TRANSLATION))
            .unwrap_or(false);

        let config = Self {
            environment: Environment::from_str_or_default(&env_var_or("ENVIRONMENT", "development")),
            database: DatabaseConfig {
                url: DatabaseUrl::parse_url(&env_var_or(env_config::DATABASE_URL, "memory"))
                    .context("Invalid DATABASE_URL value")?,
            },
            providers: ProvidersConfig {
                order: parse_list(&env_var_or(
                    env_config::PROVIDER_ORDER,
                    &DEFAULT_PROVIDER_ORDER.join(","),
                )),
                usda: UsdaConfig {
                    api_key: env_opt(env_config::FDC_API_KEY),
                    base_url: env_var_or(env_config::FDC_BASE_URL, USDA_BASE_URL),
                    ..UsdaConfig::default()
                },
                edamam: EdamamConfig {
                    app_id: env_opt(env_config::EDAMAM_APP_ID),
                    app_key: env_opt(env_config::EDAMAM_APP_KEY),
                    base_url: env_var_or(env_config::EDAMAM_BASE_URL, EDAMAM_BASE_URL),
                    ..EdamamConfig::default()
                },
            },
            translation: TranslationSettings {
                flags: TranslationConfig {
                    use_dictionary: env_bool(env_config::USE_RU_EN_DICTIONARY).unwrap_or(true),
                    use_generative_backend,
                    only_english_queries: env_bool(env_config::ONLY_EN_FOR_PROVIDERS)
                        .unwrap_or(false),
                },
                localize_titles: env_bool(env_config::TRANSLATE_TITLES_BACK).unwrap_or(false),
                enable_estimates: env_bool(env_config::ENABLE_AI_ESTIMATE).unwrap_or(true),
                gemini_api_key: env_opt(env_config::GEMINI_API_KEY),
                gemini_model: env_var_or(env_config::GEMINI_MODEL, DEFAULT_GEMINI_MODEL),
            },
            cache: CacheConfig {
                enabled: !env_bool(env_config::DISABLE_FOOD_CACHE).unwrap_or(false),
                max_entries: env_var_or(
                    env_config::FOOD_CACHE_MAX_ENTRIES,
                    &DEFAULT_CACHE_MAX_ENTRIES.to_string(),
                )
                .parse()
                .context("Invalid FOOD_CACHE_MAX_ENTRIES value")?,
                food_lookup_ttl_secs: env_var_or(
                    env_config::FOOD_CACHE_TTL_SECS,
                    &TTL_FOOD_LOOKUP_SECS.to_string(),
                )
                .parse()
                .context("Invalid FOOD_CACHE_TTL_SECS value")?,
                ..CacheConfig::default()
            },
            resolution: ResolutionSettings {
                seed_dictionary_path: env_opt(env_config::SEED_DICTIONARY_PATH).map(PathBuf::from),
                max_query_variants: env_var_or(
                    env_config::MAX_QUERY_VARIANTS,
                    &DEFAULT_MAX_QUERY_VARIANTS.to_string(),
                )
                .parse()
                .context("Invalid MAX_QUERY_VARIANTS value")?,
            },
        };

        config.validate()?;
        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Validate configuration; missing credentials only warn
    ///
    /// # Errors
    ///
    /// Returns an error if the provider order is empty or names an unknown adapter,
    /// or if the query variant cap is zero
    pub fn validate(&self) -> Result<()> {
        if self.providers.order.is_empty() {
            anyhow::bail!("PROVIDER_ORDER must name at least one provider");
        }
        for name in &self.providers.order {
            if !matches!(
                name.as_str(),
                service_names::EDAMAM | service_names::USDA | "fdc"
            ) {
                anyhow::bail!("Unknown provider '{name}' in PROVIDER_ORDER");
            }
        }
        if self.resolution.max_query_variants == 0 {
            anyhow::bail!("MAX_QUERY_VARIANTS must be at least 1");
        }

        if self.providers.usda.api_key.is_none() {
            warn!("FDC_API_KEY is not set, USDA lookups are disabled");
        }
        if self.providers.edamam.app_id.is_none() || self.providers.edamam.app_key.is_none() {
            warn!("EDAMAM_APP_ID or EDAMAM_APP_KEY is not set, Edamam lookups are disabled");
        }
        if self.translation.flags.use_generative_backend
            && self.translation.gemini_api_key.is_none()
        {
            warn!("Gemini translation is enabled but GEMINI_API_KEY is not set");
        }
        if self.translation.localize_titles && !self.translation.flags.use_generative_backend {
            warn!("TRANSLATE_TITLES_BACK needs USE_GEMINI_TRANSLATE, titles stay in English");
        }
        Ok(())
    }

    /// Get a summary of the configuration for logging, with credentials masked
    #[must_use]
    pub fn summary(&self) -> String {
        let flags = self.translation.flags;
        format!(
            "KBJU Diary Configuration:\n\
             - Environment: {}\n\
             - Database: {}\n\
             - Provider order: {}\n\
             - FDC_API_KEY: {}\n\
             - EDAMAM_APP_ID: {}\n\
             - EDAMAM_APP_KEY: {}\n\
             - GEMINI_API_KEY: {}\n\
             - Gemini model: {}\n\
             - Translation: dictionary={} gemini={} only_en={} titles_back={}\n\
             - AI estimates: {}\n\
             - Food cache: {} (ttl {}s, max {} entries)\n\
             - Seed dictionary file: {}\n\
             - Max query variants: {}",
            self.environment,
            self.database.url.to_connection_string(),
            self.providers.order.join(", "),
            mask_secret(self.providers.usda.api_key.as_deref()),
            mask_secret(self.providers.edamam.app_id.as_deref()),
            mask_secret(self.providers.edamam.app_key.as_deref()),
            mask_secret(self.translation.gemini_api_key.as_deref()),
            self.translation.gemini_model,
            flags.use_dictionary,
            flags.use_generative_backend,
            flags.only_english_queries,
            self.translation.localize_titles,
            self.translation.enable_estimates && self.translation.gemini_api_key.is_some(),
            if self.cache.enabled { "enabled" } else { "disabled" },
            self.cache.food_lookup_ttl_secs,
            self.cache.max_entries,
            self.resolution
                .seed_dictionary_path
                .as_ref()
                .map_or_else(|| "none".to_owned(), |p| p.display().to_string()),
            self.resolution.max_query_variants,
        )
    }
}

/// Mask a credential for display, keeping a short prefix
#[must_use]
pub fn mask_secret(value: Option<&str>) -> String {
    match value {
        None => "<unset>".to_owned(),
        Some(v) if v.chars().count() <= 4 => "****".to_owned(),
        Some(v) => {
            let prefix: String = v.chars().take(4).collect();
            format!("{prefix}****")
        }
    }
}

/// Environment variable or default
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Non-blank environment variable
fn env_opt(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

/// Boolean environment variable accepting `1/true/yes/y/on`, `None` when unset
fn env_bool(key: &str) -> Option<bool> {
    env_opt(key).map(|v| parse_bool(&v))
}

/// Parse a boolean flag value
#[must_use]
pub fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "on"
    )
}

/// Parse a comma-separated list, lower-cased
fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}
