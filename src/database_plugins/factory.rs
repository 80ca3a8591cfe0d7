// ABOUTME: Storage factory selecting the diary backend from a connection string
// ABOUTME: Provides a unified DiaryStore over the in-memory and SQLite implementations
//! Database factory for creating diary stores
//!
//! This module provides automatic backend detection and creation based on
//! connection strings.

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::{debug, info};
use uuid::Uuid;

use super::memory::MemoryDiaryStore;
use super::sqlite::SqliteDiaryStore;
use super::DiaryStore;
use crate::errors::{AppError, AppResult};
use crate::models::{DailySummary, DiaryEntry, NewDiaryEntry, User};

/// Supported database types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseType {
    /// Process memory
    Memory,
    /// `SQLite` file or in-memory database
    SQLite,
}

/// Storage instance wrapper that delegates to the selected implementation
pub enum Database {
    /// Process memory
    Memory(MemoryDiaryStore),
    /// `SQLite` via sqlx
    SQLite(SqliteDiaryStore),
}

impl Database {
    /// Get a descriptive string for the current database backend
    #[must_use]
    pub const fn backend_info(&self) -> &'static str {
        match self {
            Self::Memory(_) => "In-memory (process local)",
            Self::SQLite(_) => "SQLite (sqlx)",
        }
    }

    /// Get the database type enum
    #[must_use]
    pub const fn database_type(&self) -> DatabaseType {
        match self {
            Self::Memory(_) => DatabaseType::Memory,
            Self::SQLite(_) => DatabaseType::SQLite,
        }
    }

    /// Create a store from a connection string
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Database URL format is unsupported
    /// - Database connection fails
    /// - Migration fails
    pub async fn new(database_url: &str) -> AppResult<Self> {
        debug!("Detecting database type from URL: {}", database_url);
        let db_type = detect_database_type(database_url)?;
        info!("Detected database type: {:?}", db_type);

        match db_type {
            DatabaseType::Memory => Ok(Self::Memory(MemoryDiaryStore::new())),
            DatabaseType::SQLite => {
                info!("Initializing SQLite database");
                let db = SqliteDiaryStore::new(database_url).await?;
                info!("SQLite database initialized successfully");
                Ok(Self::SQLite(db))
            }
        }
    }
}

/// Automatically detect database type from connection string
///
/// # Errors
///
/// Returns an error if the URL is neither `memory` nor a `sqlite:` URL
pub fn detect_database_type(database_url: &str) -> AppResult<DatabaseType> {
    let url = database_url.trim();
    if url.eq_ignore_ascii_case("memory") {
        Ok(DatabaseType::Memory)
    } else if url.starts_with("sqlite:") {
        Ok(DatabaseType::SQLite)
    } else {
        Err(AppError::config(format!(
            "Unsupported database URL format: {database_url}. \
             Supported formats: memory, sqlite::memory:, sqlite:path/to/db.sqlite"
        )))
    }
}

#[async_trait]
impl DiaryStore for Database {
    async fn migrate(&self) -> AppResult<()> {
        match self {
            Self::Memory(db) => db.migrate().await,
            Self::SQLite(db) => db.migrate().await,
        }
    }

    async fn get_or_create_user(&self, chat_id: i64) -> AppResult<User> {
        match self {
            Self::Memory(db) => db.get_or_create_user(chat_id).await,
            Self::SQLite(db) => db.get_or_create_user(chat_id).await,
        }
    }

    async fn add_entry(&self, user_id: Uuid, entry: NewDiaryEntry) -> AppResult<DiaryEntry> {
        match self {
            Self::Memory(db) => db.add_entry(user_id, entry).await,
            Self::SQLite(db) => db.add_entry(user_id, entry).await,
        }
    }

    async fn get_entries(&self, user_id: Uuid, date: NaiveDate) -> AppResult<Vec<DiaryEntry>> {
        match self {
            Self::Memory(db) => db.get_entries(user_id, date).await,
            Self::SQLite(db) => db.get_entries(user_id, date).await,
        }
    }

    async fn get_daily_summary(&self, user_id: Uuid, date: NaiveDate) -> AppResult<DailySummary> {
        match self {
            Self::Memory(db) => db.get_daily_summary(user_id, date).await,
            Self::SQLite(db) => db.get_daily_summary(user_id, date).await,
        }
    }
}
