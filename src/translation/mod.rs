// ABOUTME: Term translator turning a parsed dish title into provider search keywords
// ABOUTME: Combines a phrase dictionary, a generative backend and a native-title fallback
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 KBJU Diary Contributors

//! # Term Translator
//!
//! Nutrition providers expect English search terms while users type in
//! Russian. [`TermTranslator::terms_for`] bridges the gap and never fails:
//! every backend error is logged and counted as zero candidates.
//!
//! Order of sources for a non-Latin title:
//!
//! 1. the static phrase dictionary (when enabled)
//! 2. the generative backend (when enabled and configured)
//! 3. the native title and the native title with a method-hint suffix,
//!    unless only-English queries are requested
//!
//! With only-English queries on and both translators disabled, the
//! translator still consults the dictionary and the backend once, and as the
//! very last resort returns the native title instead of nothing.

/// Built-in Russian to English phrase dictionary
pub mod dictionary;
/// Keyword backend on top of an LLM provider
pub mod generative;

pub use dictionary::PhraseDictionary;
pub use generative::{parse_keywords_response, parse_localized_response, LlmKeywordBackend};

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::constants::providers::{GEMINI_TIMEOUT, MAX_SEARCH_TERMS, MIN_SEARCH_TERM_CHARS};
use crate::errors::AppResult;
use crate::models::{CandidateSource, CookingMethod, NutritionCandidate};

/// Which translation sources are active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranslationConfig {
    /// Consult the static phrase dictionary
    pub use_dictionary: bool,
    /// Call the generative backend
    pub use_generative_backend: bool,
    /// Never send the native-language title to providers
    pub only_english_queries: bool,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            use_dictionary: true,
            use_generative_backend: false,
            only_english_queries: false,
        }
    }
}

/// Source of English keyword candidates for a dish title
#[async_trait]
pub trait TranslationBackend: Send + Sync {
    /// Backend identifier for logs
    fn name(&self) -> &'static str;

    /// Concise English food-search keywords for `text`
    ///
    /// # Errors
    ///
    /// Returns an error on transport failures; malformed answers yield `Ok(vec![])`
    async fn keywords(&self, text: &str, method: Option<CookingMethod>) -> AppResult<Vec<String>>;

    /// Russian rendering of an English provider title; `None` when the backend cannot say
    ///
    /// # Errors
    ///
    /// Returns an error on transport failures
    async fn localize(&self, _title: &str) -> AppResult<Option<String>> {
        Ok(None)
    }
}

/// Produces prioritized provider search terms for a dish title
#[derive(Clone)]
pub struct TermTranslator {
    config: TranslationConfig,
    dictionary: PhraseDictionary,
    backend: Option<Arc<dyn TranslationBackend>>,
    backend_timeout: Duration,
    localize_titles: bool,
}

impl TermTranslator {
    /// Translator with the built-in dictionary and no generative backend
    #[must_use]
    pub fn new(config: TranslationConfig) -> Self {
        Self {
            config,
            dictionary: PhraseDictionary::builtin(),
            backend: None,
            backend_timeout: GEMINI_TIMEOUT,
            localize_titles: false,
        }
    }

    /// Attach a generative backend
    #[must_use]
    pub fn with_backend(mut self, backend: Arc<dyn TranslationBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Replace the phrase dictionary
    #[must_use]
    pub fn with_dictionary(mut self, dictionary: PhraseDictionary) -> Self {
        self.dictionary = dictionary;
        self
    }

    /// Upper bound for one backend call
    #[must_use]
    pub const fn with_backend_timeout(mut self, timeout: Duration) -> Self {
        self.backend_timeout = timeout;
        self
    }

    /// Render English provider titles in Russian before they are shown
    #[must_use]
    pub const fn with_title_localization(mut self, enabled: bool) -> Self {
        self.localize_titles = enabled;
        self
    }

    /// Whether provider titles are localized for display
    #[must_use]
    pub fn localizes_titles(&self) -> bool {
        self.localize_titles && self.backend.is_some()
    }

    /// Active configuration
    #[must_use]
    pub const fn config(&self) -> TranslationConfig {
        self.config
    }

    /// Whether a generative backend is attached
    #[must_use]
    pub fn has_backend(&self) -> bool {
        self.backend.is_some()
    }

    /// Up to five search terms for `title`, best first; empty only when nothing applies
    pub async fn terms_for(&self, title: &str, method: Option<CookingMethod>) -> Vec<String> {
        let title = title.trim().to_lowercase();
        if title.is_empty() {
            return Vec::new();
        }

        if is_latin(&title) {
            return normalize_terms([title]);
        }

        let TranslationConfig {
            use_dictionary,
            use_generative_backend,
            only_english_queries,
        } = self.config;

        // A disabled-everything setup in English-only mode would never produce a query
        let forced = only_english_queries && !use_dictionary && !use_generative_backend;
        if forced {
            warn!("Both translators disabled while only-English queries are on, forcing one pass");
        }

        let mut candidates: Vec<String> = Vec::new();

        if use_dictionary || forced {
            candidates.extend(self.dictionary.lookup(&title));
        }

        if use_generative_backend || forced {
            candidates.extend(self.backend_keywords(&title, method).await);
        }

        if !only_english_queries {
            candidates.push(title.clone());
            if let Some(method) = method {
                candidates.push(format!("{title} {}", method.as_str()));
            }
        }

        let mut terms = normalize_terms(candidates);
        if terms.is_empty() && only_english_queries {
            debug!(title = %title, "No English terms found, falling back to the native title");
            terms = normalize_terms([title]);
        }
        terms
    }

    async fn backend_keywords(&self, title: &str, method: Option<CookingMethod>) -> Vec<String> {
        let Some(backend) = self.backend.as_ref() else {
            debug!("Generative translation requested but no backend is configured");
            return Vec::new();
        };

        match tokio::time::timeout(self.backend_timeout, backend.keywords(title, method)).await {
            Ok(Ok(keywords)) => keywords,
            Ok(Err(e)) => {
                warn!(backend = backend.name(), error = %e, "Translation backend failed");
                Vec::new()
            }
            Err(_) => {
                warn!(backend = backend.name(), "Translation backend timed out");
                Vec::new()
            }
        }
    }

    /// Replace Latin titles of provider and cache candidates with their Russian rendering
    ///
    /// Nutrients and order are untouched. Any backend failure, timeout or
    /// empty answer keeps the original title.
    pub async fn localize_candidates(
        &self,
        candidates: Vec<NutritionCandidate>,
    ) -> Vec<NutritionCandidate> {
        let Some(backend) = self.backend.as_ref().filter(|_| self.localize_titles) else {
            return candidates;
        };

        let mut localized = Vec::with_capacity(candidates.len());
        for mut candidate in candidates {
            let from_lookup = matches!(
                candidate.source,
                CandidateSource::Provider(_) | CandidateSource::Cache
            );
            if from_lookup && is_latin(&candidate.title) {
                match tokio::time::timeout(self.backend_timeout, backend.localize(&candidate.title))
                    .await
                {
                    Ok(Ok(Some(title))) => candidate.title = title,
                    Ok(Ok(None)) => {}
                    Ok(Err(e)) => {
                        warn!(backend = backend.name(), error = %e, "Title localization failed");
                    }
                    Err(_) => warn!(backend = backend.name(), "Title localization timed out"),
                }
            }
            localized.push(candidate);
        }
        localized
    }
}

/// True when every alphabetic character is ASCII
#[must_use]
pub fn is_latin(text: &str) -> bool {
    text.chars()
        .filter(|c| c.is_alphabetic())
        .all(|c| c.is_ascii_alphabetic())
}

/// Trim, lower-case, drop short and duplicate terms keeping first-seen order, cap at five
pub fn normalize_terms<I, S>(candidates: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::with_capacity(MAX_SEARCH_TERMS);
    for candidate in candidates {
        let term = candidate.as_ref().trim().to_lowercase();
        if term.chars().count() < MIN_SEARCH_TERM_CHARS || out.contains(&term) {
            continue;
        }
        out.push(term);
        if out.len() == MAX_SEARCH_TERMS {
            break;
        }
    }
    out
}
