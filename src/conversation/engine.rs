// ABOUTME: Conversation engine routing inbound messages through parse, resolve and persist
// ABOUTME: Catches every per-message failure so one user never affects another; offers estimates on request
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 KBJU Diary Contributors

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, Utc};
use tracing::{debug, instrument, warn};

use super::state::{ConversationContext, ConversationState, PendingStep};
use super::store::ConversationStore;
use crate::cache::memory::InMemoryCache;
use crate::cache::CacheProvider;
use crate::constants::providers::GEMINI_TIMEOUT;
use crate::database_plugins::DiaryStore;
use crate::diary::finalize;
use crate::errors::{AppResult, ErrorCode};
use crate::estimation::NutritionEstimator;
use crate::logging::AppLogger;
use crate::models::{
    CandidateSource, DailySummary, DiaryEntry, NewDiaryEntry, NutritionCandidate, ParsedLine,
};
use crate::parser::{first_positive_number, parse_line};
use crate::resolution::ResolutionChain;

const CANCEL_WORDS: &[&str] = &["/cancel", "cancel", "отмена", "отменить"];
const NONE_WORDS: &[&str] = &["/none", "none", "ничего", "ничего из этого"];
const ESTIMATE_WORDS: &[&str] = &["/ai", "/estimate", "ии", "оценка ии"];

/// One message or selection from the transport
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    /// Free text
    Text(String),
    /// Zero-based pick from the last option list
    Choice(usize),
    /// "None of these" on the last option list
    NoneOfThese,
    /// Explicit cancel command
    Cancel,
    /// Ask for a generated per-100 g estimate of the pending dish
    Estimate,
}

impl Inbound {
    /// Classify a text line, recognising cancel and none-of-these words
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let lowered = text.trim().to_lowercase();
        if CANCEL_WORDS.contains(&lowered.as_str()) {
            Self::Cancel
        } else if NONE_WORDS.contains(&lowered.as_str()) {
            Self::NoneOfThese
        } else if ESTIMATE_WORDS.contains(&lowered.as_str()) {
            Self::Estimate
        } else {
            Self::Text(text.to_owned())
        }
    }
}

/// What the transport should show next
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// The line had no dish name
    AskTitle,
    /// Portion mass needed
    AskGrams {
        /// Dish being logged
        title: String,
    },
    /// Calories needed
    AskKcal {
        /// Dish being logged
        title: String,
    },
    /// Pick one option
    Choose {
        /// Dish being logged
        title: String,
        /// Options in display order
        options: Vec<NutritionCandidate>,
    },
    /// Entry written
    Saved {
        /// Persisted entry
        entry: DiaryEntry,
        /// Totals for the entry's day
        summary: DailySummary,
    },
    /// Pending context dropped
    Cancelled,
    /// A pick, "none" or estimate request arrived without a pending dish
    NothingPending,
    /// No estimate could be produced; the pending step is unchanged
    EstimateUnavailable {
        /// Dish being logged
        title: String,
    },
    /// The conversation was cancelled while this message was in flight
    Discarded,
    /// The message could not be completed; nothing was written
    Failed {
        /// Short reason for logs and transports
        reason: String,
    },
}

/// Drives one user's conversation per call
pub struct ConversationEngine<C: CacheProvider = InMemoryCache> {
    chain: Arc<ResolutionChain<C>>,
    store: Arc<dyn DiaryStore>,
    conversations: ConversationStore,
    estimator: Option<Arc<dyn NutritionEstimator>>,
    estimate_timeout: Duration,
}

impl<C: CacheProvider> ConversationEngine<C> {
    /// Engine over a resolution chain and a storage collaborator
    pub fn new(chain: Arc<ResolutionChain<C>>, store: Arc<dyn DiaryStore>) -> Self {
        Self {
            chain,
            store,
            conversations: ConversationStore::new(),
            estimator: None,
            estimate_timeout: GEMINI_TIMEOUT,
        }
    }

    /// Offer generated estimates when the user asks for one
    #[must_use]
    pub fn with_estimator(mut self, estimator: Arc<dyn NutritionEstimator>) -> Self {
        self.estimator = Some(estimator);
        self
    }

    /// Upper bound for one estimate call
    #[must_use]
    pub const fn with_estimate_timeout(mut self, timeout: Duration) -> Self {
        self.estimate_timeout = timeout;
        self
    }

    /// Whether estimates can be offered
    pub fn has_estimator(&self) -> bool {
        self.estimator.is_some()
    }

    /// Resolution chain in use
    pub const fn chain(&self) -> &Arc<ResolutionChain<C>> {
        &self.chain
    }

    /// Storage collaborator in use
    pub const fn store(&self) -> &Arc<dyn DiaryStore> {
        &self.store
    }

    /// Pending contexts
    pub const fn conversations(&self) -> &ConversationStore {
        &self.conversations
    }

    /// Observable state of `chat_id`
    pub fn state(&self, chat_id: i64) -> ConversationState {
        self.conversations.state(chat_id)
    }

    /// Handle one inbound event, dating entries today (UTC)
    pub async fn handle(&self, chat_id: i64, inbound: Inbound) -> Reply {
        self.handle_on(chat_id, inbound, Utc::now().date_naive()).await
    }

    /// Handle one inbound event, dating entries `date`
    #[instrument(skip(self, inbound))]
    pub async fn handle_on(&self, chat_id: i64, inbound: Inbound, date: NaiveDate) -> Reply {
        let inbound = match inbound {
            Inbound::Text(text) => Inbound::from_text(&text),
            other => other,
        };

        // Cancel must not wait behind an in-flight message of the same user
        if inbound == Inbound::Cancel {
            self.conversations.cancel(chat_id);
            return Reply::Cancelled;
        }

        let _guard = self.conversations.lock_user(chat_id).await;
        let generation = self.conversations.generation(chat_id);
        let turn = Turn {
            chat_id,
            generation,
            date,
        };

        match inbound {
            Inbound::Text(text) => self.on_text(turn, &text).await,
            Inbound::Choice(index) => self.on_choice(turn, index).await,
            Inbound::NoneOfThese => self.on_none_of_these(turn),
            Inbound::Estimate => self.on_estimate(turn).await,
            Inbound::Cancel => Reply::Cancelled,
        }
    }

    async fn on_text(&self, turn: Turn, text: &str) -> Reply {
        let fresh = parse_line(text);
        if fresh.is_fully_resolvable() {
            // A complete input always replaces a half-finished one
            self.conversations.clear(turn.chat_id);
            return self.persist(turn, &fresh, None, None).await;
        }

        let Some(context) = self.conversations.get(turn.chat_id) else {
            return self.on_fresh(turn, fresh).await;
        };

        match context.step {
            PendingStep::AwaitingGrams => match first_positive_number(text) {
                Some(grams) => {
                    let parsed = context.parsed.with_mass_grams(grams);
                    self.conversations.clear(turn.chat_id);
                    if parsed.is_fully_resolvable() {
                        // Typed macros only needed the mass
                        return self.persist(turn, &parsed, None, None).await;
                    }
                    self.resolve_and_route(turn, parsed).await
                }
                None => Reply::AskGrams {
                    title: context.parsed.title,
                },
            },
            PendingStep::AwaitingKcal => match first_positive_number(text) {
                Some(kcal) => self.persist(turn, &context.parsed, None, Some(kcal)).await,
                None => Reply::AskKcal {
                    title: context.parsed.title,
                },
            },
            PendingStep::AwaitingChoice => {
                let picked = text
                    .trim()
                    .parse::<usize>()
                    .ok()
                    .filter(|n| (1..=context.candidates.len()).contains(n));
                match picked {
                    Some(number) => self.on_choice(turn, number - 1).await,
                    None => Reply::Choose {
                        title: context.parsed.title,
                        options: context.candidates,
                    },
                }
            }
        }
    }

    async fn on_fresh(&self, turn: Turn, parsed: ParsedLine) -> Reply {
        if parsed.title.is_empty() {
            return Reply::AskTitle;
        }
        if !parsed.has_known_mass() {
            let title = parsed.title.clone();
            if !self.conversations.put_if_current(
                turn.chat_id,
                turn.generation,
                ConversationContext::awaiting_grams(parsed),
            ) {
                return Reply::Discarded;
            }
            return Reply::AskGrams { title };
        }
        self.resolve_and_route(turn, parsed).await
    }

    async fn resolve_and_route(&self, turn: Turn, parsed: ParsedLine) -> Reply {
        let candidates = self
            .chain
            .resolve(&parsed.title, parsed.cooking_method)
            .await;
        let candidates = self.chain.translator().localize_candidates(candidates).await;

        if !self.conversations.is_current(turn.chat_id, turn.generation) {
            debug!(chat_id = turn.chat_id, "Conversation cancelled during resolution, discarding result");
            return Reply::Discarded;
        }

        if candidates.is_empty() {
            let title = parsed.title.clone();
            return if self.conversations.put_if_current(
                turn.chat_id,
                turn.generation,
                ConversationContext::awaiting_kcal(parsed),
            ) {
                Reply::AskKcal { title }
            } else {
                Reply::Discarded
            };
        }

        // A lone seed hit is authoritative, there is nothing to choose
        if let [only] = candidates.as_slice() {
            if only.source == CandidateSource::Seed {
                return self.persist(turn, &parsed, Some(only), None).await;
            }
        }

        let title = parsed.title.clone();
        let options = candidates.clone();
        if self.conversations.put_if_current(
            turn.chat_id,
            turn.generation,
            ConversationContext::awaiting_choice(parsed, candidates),
        ) {
            Reply::Choose { title, options }
        } else {
            Reply::Discarded
        }
    }

    async fn on_choice(&self, turn: Turn, index: usize) -> Reply {
        let Some(context) = self
            .conversations
            .get(turn.chat_id)
            .filter(|c| c.step == PendingStep::AwaitingChoice)
        else {
            return Reply::NothingPending;
        };
        match context.candidates.get(index).cloned() {
            Some(candidate) => {
                self.persist(turn, &context.parsed, Some(&candidate), None)
                    .await
            }
            None => Reply::Choose {
                title: context.parsed.title,
                options: context.candidates,
            },
        }
    }

    fn on_none_of_these(&self, turn: Turn) -> Reply {
        let Some(context) = self
            .conversations
            .get(turn.chat_id)
            .filter(|c| c.step == PendingStep::AwaitingChoice)
        else {
            return Reply::NothingPending;
        };
        let title = context.parsed.title.clone();
        if self.conversations.put_if_current(
            turn.chat_id,
            turn.generation,
            ConversationContext::awaiting_kcal(context.parsed),
        ) {
            Reply::AskKcal { title }
        } else {
            Reply::Discarded
        }
    }

    async fn on_estimate(&self, turn: Turn) -> Reply {
        let Some(context) = self.conversations.get(turn.chat_id).filter(|c| {
            matches!(c.step, PendingStep::AwaitingChoice | PendingStep::AwaitingKcal)
        }) else {
            return Reply::NothingPending;
        };
        let title = context.parsed.title.clone();

        let Some(estimator) = self.estimator.as_ref().filter(|_| context.parsed.has_known_mass())
        else {
            debug!(chat_id = turn.chat_id, "Estimate requested but none can be produced");
            return Reply::EstimateUnavailable { title };
        };

        let estimate = match tokio::time::timeout(
            self.estimate_timeout,
            estimator.estimate(&title, context.parsed.cooking_method),
        )
        .await
        {
            Ok(Ok(estimate)) => estimate,
            Ok(Err(e)) => {
                warn!(estimator = estimator.name(), error = %e, "Nutrition estimate failed");
                None
            }
            Err(_) => {
                warn!(estimator = estimator.name(), "Nutrition estimate timed out");
                None
            }
        };

        if !self.conversations.is_current(turn.chat_id, turn.generation) {
            return Reply::Discarded;
        }
        let Some(estimate) = estimate else {
            return Reply::EstimateUnavailable { title };
        };

        // At most one estimate is on offer; a new one replaces the old
        let mut options: Vec<NutritionCandidate> = context
            .candidates
            .into_iter()
            .filter(|c| c.source != CandidateSource::Estimate)
            .collect();
        options.push(estimate.retagged(CandidateSource::Estimate));

        if self.conversations.put_if_current(
            turn.chat_id,
            turn.generation,
            ConversationContext::awaiting_choice(context.parsed, options.clone()),
        ) {
            Reply::Choose { title, options }
        } else {
            Reply::Discarded
        }
    }

    async fn persist(
        &self,
        turn: Turn,
        parsed: &ParsedLine,
        candidate: Option<&NutritionCandidate>,
        kcal: Option<f64>,
    ) -> Reply {
        let entry = match finalize(parsed, candidate, kcal, turn.date) {
            Ok(entry) => entry,
            Err(e) => {
                AppLogger::log_integrity_failure(turn.chat_id, &e.to_string());
                self.conversations.clear(turn.chat_id);
                return Reply::Failed {
                    reason: e.code.description().to_owned(),
                };
            }
        };

        if !self.conversations.is_current(turn.chat_id, turn.generation) {
            return Reply::Discarded;
        }

        match self.write(turn, entry).await {
            Ok((entry, summary)) => {
                self.conversations.clear(turn.chat_id);
                AppLogger::log_entry_persisted(
                    turn.chat_id,
                    &entry.details.title,
                    entry.details.kcal,
                    entry.details.source.as_str(),
                );
                Reply::Saved { entry, summary }
            }
            Err(e) => {
                if e.code == ErrorCode::InvalidInput {
                    AppLogger::log_integrity_failure(turn.chat_id, &e.to_string());
                } else {
                    tracing::error!(chat_id = turn.chat_id, error = %e, "Failed to store diary entry");
                }
                self.conversations.clear(turn.chat_id);
                Reply::Failed {
                    reason: e.code.description().to_owned(),
                }
            }
        }
    }

    async fn write(
        &self,
        turn: Turn,
        entry: NewDiaryEntry,
    ) -> AppResult<(DiaryEntry, DailySummary)> {
        let user = self.store.get_or_create_user(turn.chat_id).await?;
        let date = entry.date;
        let entry = self.store.add_entry(user.id, entry).await?;
        let summary = self.store.get_daily_summary(user.id, date).await?;
        Ok((entry, summary))
    }
}

/// Identity of the message being handled
#[derive(Debug, Clone, Copy)]
struct Turn {
    chat_id: i64,
    generation: u64,
    date: NaiveDate,
}
