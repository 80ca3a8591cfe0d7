// ABOUTME: Per-user conversation state machine collecting missing grams or calories
// ABOUTME: Explicit keyed store with per-user ordering and cancellation generations
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 KBJU Diary Contributors

//! # Conversation State Machine
//!
//! ```text
//! Idle ──unknown mass──▶ AwaitingGrams ──grams──▶ (resolve)
//! (resolve) ──candidates──▶ AwaitingChoice ──pick──▶ Idle (entry saved)
//!                                         ──none──▶ AwaitingKcal
//! (resolve) ──nothing──▶ AwaitingKcal ──kcal──▶ Idle (entry saved)
//! any ──cancel──▶ Idle
//! ```
//!
//! A fresh message that is complete on its own is saved immediately and
//! replaces whatever was pending for that user.

/// Message routing and persistence
pub mod engine;
/// Pending context types
pub mod state;
/// Keyed context store
pub mod store;

pub use engine::{ConversationEngine, Inbound, Reply};
pub use state::{ConversationContext, ConversationState, PendingStep};
pub use store::ConversationStore;
