// ABOUTME: Pending conversation context held between messages of one user
// ABOUTME: Never persisted, a restart drops every half-finished conversation
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 KBJU Diary Contributors

use serde::{Deserialize, Serialize};

use crate::models::{NutritionCandidate, ParsedLine};

/// What the engine is waiting for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PendingStep {
    /// Portion mass in grams
    AwaitingGrams,
    /// A pick from the stored candidate list
    AwaitingChoice,
    /// A calorie count
    AwaitingKcal,
}

/// Observable state of one user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConversationState {
    /// Nothing pending
    Idle,
    /// Waiting for grams
    AwaitingGrams,
    /// Waiting for a candidate pick
    AwaitingChoice,
    /// Waiting for calories
    AwaitingKcal,
}

impl From<Option<PendingStep>> for ConversationState {
    fn from(step: Option<PendingStep>) -> Self {
        match step {
            None => Self::Idle,
            Some(PendingStep::AwaitingGrams) => Self::AwaitingGrams,
            Some(PendingStep::AwaitingChoice) => Self::AwaitingChoice,
            Some(PendingStep::AwaitingKcal) => Self::AwaitingKcal,
        }
    }
}

/// Half-finished input of one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationContext {
    /// Parsed line, with mass filled in once known
    pub parsed: ParsedLine,
    /// Options shown to the user, empty unless choosing
    pub candidates: Vec<NutritionCandidate>,
    /// Current await flag
    pub step: PendingStep,
}

impl ConversationContext {
    /// Waiting for the portion mass of `parsed`
    #[must_use]
    pub const fn awaiting_grams(parsed: ParsedLine) -> Self {
        Self {
            parsed,
            candidates: Vec::new(),
            step: PendingStep::AwaitingGrams,
        }
    }

    /// Waiting for a pick among `candidates`
    #[must_use]
    pub const fn awaiting_choice(parsed: ParsedLine, candidates: Vec<NutritionCandidate>) -> Self {
        Self {
            parsed,
            candidates,
            step: PendingStep::AwaitingChoice,
        }
    }

    /// Waiting for calories
    #[must_use]
    pub const fn awaiting_kcal(parsed: ParsedLine) -> Self {
        Self {
            parsed,
            candidates: Vec::new(),
            step: PendingStep::AwaitingKcal,
        }
    }

    /// Whether the grams flag is set
    #[must_use]
    pub fn awaiting_grams_flag(&self) -> bool {
        self.step == PendingStep::AwaitingGrams
    }

    /// Whether the kcal flag is set
    #[must_use]
    pub fn awaiting_kcal_flag(&self) -> bool {
        self.step == PendingStep::AwaitingKcal
    }
}
