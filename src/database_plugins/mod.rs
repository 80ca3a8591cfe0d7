// ABOUTME: Storage collaborator abstraction for users, diary entries and daily summaries
// ABOUTME: Plugin architecture with in-memory and SQLite backends selected at runtime

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::{DailySummary, DiaryEntry, NewDiaryEntry, User};

pub mod factory;
pub mod memory;
pub mod sqlite;

/// Storage collaborator consumed by the conversation engine
///
/// All implementations must enforce the same entry constraints so a record
/// rejected by one backend is rejected by every backend.
#[async_trait]
pub trait DiaryStore: Send + Sync {
    /// Create the schema if needed
    async fn migrate(&self) -> AppResult<()>;

    /// User for a transport chat id, created on first contact
    async fn get_or_create_user(&self, chat_id: i64) -> AppResult<User>;

    /// Persist one entry for `user_id`
    async fn add_entry(&self, user_id: Uuid, entry: NewDiaryEntry) -> AppResult<DiaryEntry>;

    /// Entries of one day in insertion order
    async fn get_entries(&self, user_id: Uuid, date: NaiveDate) -> AppResult<Vec<DiaryEntry>>;

    /// Totals for one day; absent sums are zero
    async fn get_daily_summary(&self, user_id: Uuid, date: NaiveDate) -> AppResult<DailySummary>;
}

/// Entry constraints shared by every backend
///
/// # Errors
///
/// Returns `InvalidInput` naming the first violated constraint
pub fn validate_entry(entry: &NewDiaryEntry) -> AppResult<()> {
    if entry.title.trim().is_empty() {
        return Err(AppError::invalid_input("entry title must not be empty"));
    }
    if !(entry.quantity_value.is_finite() && entry.quantity_value > 0.0) {
        return Err(AppError::invalid_input("entry quantity must be positive"));
    }
    if entry.mass_grams.is_some_and(|g| !(g.is_finite() && g > 0.0)) {
        return Err(AppError::invalid_input("entry mass must be positive"));
    }
    let nutrients = [
        ("kcal", entry.kcal),
        ("protein", entry.protein),
        ("fat", entry.fat),
        ("carbs", entry.carbs),
    ];
    for (name, value) in nutrients {
        if value.is_some_and(|v| !(v.is_finite() && v >= 0.0)) {
            return Err(AppError::invalid_input(format!(
                "entry {name} must be non-negative"
            )));
        }
    }
    Ok(())
}
