// ABOUTME: In-memory storage backend for tests and the console transport
// ABOUTME: DashMap-backed users and per-user entry lists, lost on restart

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use super::{validate_entry, DiaryStore};
use crate::errors::{AppError, AppResult};
use crate::models::{DailySummary, DiaryEntry, NewDiaryEntry, User};

/// Process-local diary store
#[derive(Debug, Default)]
pub struct MemoryDiaryStore {
    users: DashMap<i64, User>,
    entries: DashMap<Uuid, Vec<DiaryEntry>>,
}

impl MemoryDiaryStore {
    /// Empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn user_exists(&self, user_id: Uuid) -> bool {
        self.users.iter().any(|u| u.id == user_id)
    }
}

#[async_trait]
impl DiaryStore for MemoryDiaryStore {
    async fn migrate(&self) -> AppResult<()> {
        Ok(())
    }

    async fn get_or_create_user(&self, chat_id: i64) -> AppResult<User> {
        Ok(self
            .users
            .entry(chat_id)
            .or_insert_with(|| User::new(chat_id))
            .clone())
    }

    async fn add_entry(&self, user_id: Uuid, entry: NewDiaryEntry) -> AppResult<DiaryEntry> {
        validate_entry(&entry)?;
        if !self.user_exists(user_id) {
            return Err(AppError::not_found(format!("User {user_id}")));
        }
        let stored = DiaryEntry {
            id: Uuid::new_v4(),
            user_id,
            created_at: Utc::now(),
            details: entry,
        };
        self.entries.entry(user_id).or_default().push(stored.clone());
        Ok(stored)
    }

    async fn get_entries(&self, user_id: Uuid, date: NaiveDate) -> AppResult<Vec<DiaryEntry>> {
        Ok(self
            .entries
            .get(&user_id)
            .map(|list| {
                list.iter()
                    .filter(|e| e.details.date == date)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn get_daily_summary(&self, user_id: Uuid, date: NaiveDate) -> AppResult<DailySummary> {
        let mut summary = DailySummary::default();
        if let Some(list) = self.entries.get(&user_id) {
            for entry in list.iter().filter(|e| e.details.date == date) {
                summary.accumulate(&entry.details);
            }
        }
        Ok(summary)
    }
}
