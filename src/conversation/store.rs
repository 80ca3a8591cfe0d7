// ABOUTME: Keyed conversation context store with per-user locks and generations
// ABOUTME: Cancel bumps the generation so late resolution results are discarded
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 KBJU Diary Contributors

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::state::{ConversationContext, ConversationState};

/// Owner of every pending conversation
///
/// Messages of one user are serialised through [`Self::lock_user`]; the
/// store itself only performs single-key operations, so different users
/// never contend. Writers that may race a cancel go through
/// [`Self::put_if_current`], which checks the generation and writes under
/// the same shard lock that [`Self::cancel`] takes.
#[derive(Debug, Default)]
pub struct ConversationStore {
    contexts: DashMap<i64, ConversationContext>,
    generations: DashMap<i64, u64>,
    locks: DashMap<i64, Arc<Mutex<()>>>,
}

impl ConversationStore {
    /// Empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive handling rights for `chat_id`
    pub async fn lock_user(&self, chat_id: i64) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .entry(chat_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }

    /// Current cancellation generation
    #[must_use]
    pub fn generation(&self, chat_id: i64) -> u64 {
        self.generations.get(&chat_id).map_or(0, |g| *g)
    }

    /// Whether nothing was cancelled since `generation` was read
    #[must_use]
    pub fn is_current(&self, chat_id: i64, generation: u64) -> bool {
        self.generation(chat_id) == generation
    }

    /// Snapshot of the pending context
    #[must_use]
    pub fn get(&self, chat_id: i64) -> Option<ConversationContext> {
        self.contexts.get(&chat_id).map(|c| c.clone())
    }

    /// Observable state
    #[must_use]
    pub fn state(&self, chat_id: i64) -> ConversationState {
        ConversationState::from(self.contexts.get(&chat_id).map(|c| c.step))
    }

    /// Store `context` unless a cancel happened after `generation` was read
    pub fn put_if_current(&self, chat_id: i64, generation: u64, context: ConversationContext) -> bool {
        let current = self.generations.entry(chat_id).or_insert(0);
        if *current != generation {
            return false;
        }
        self.contexts.insert(chat_id, context);
        drop(current);
        true
    }

    /// Drop the pending context without touching the generation
    pub fn clear(&self, chat_id: i64) {
        self.contexts.remove(&chat_id);
    }

    /// Drop the pending context and invalidate in-flight work, returning the new generation
    pub fn cancel(&self, chat_id: i64) -> u64 {
        let mut current = self.generations.entry(chat_id).or_insert(0);
        *current += 1;
        self.contexts.remove(&chat_id);
        *current
    }

    /// Number of users with something pending
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.contexts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ParsedLine;

    #[test]
    fn test_cancel_invalidates_older_generation() {
        let store = ConversationStore::new();
        let generation = store.generation(7);
        store.cancel(7);
        let stored = store.put_if_current(
            7,
            generation,
            ConversationContext::awaiting_grams(ParsedLine::default()),
        );
        assert!(!stored);
        assert_eq!(store.state(7), ConversationState::Idle);
    }

    #[test]
    fn test_users_are_independent() {
        let store = ConversationStore::new();
        assert!(store.put_if_current(
            1,
            0,
            ConversationContext::awaiting_kcal(ParsedLine::default())
        ));
        store.cancel(2);
        assert_eq!(store.state(1), ConversationState::AwaitingKcal);
        assert_eq!(store.generation(1), 0);
    }
}
