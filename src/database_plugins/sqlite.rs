// ABOUTME: SQLite storage backend on sqlx with users and entries tables
// ABOUTME: CHECK constraints mirror the shared entry validation rules

use std::str::FromStr;
use std::time::Instant;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Pool, Row, Sqlite};
use uuid::Uuid;

use super::{validate_entry, DiaryStore};
use crate::errors::{AppError, AppResult};
use crate::logging::AppLogger;
use crate::models::{DailySummary, DiaryEntry, EntrySource, NewDiaryEntry, User};

/// SQLite diary store
#[derive(Clone)]
pub struct SqliteDiaryStore {
    pool: Pool<Sqlite>,
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

impl SqliteDiaryStore {
    /// Connect and migrate
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is malformed, the connection fails or migration fails
    pub async fn new(database_url: &str) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        // Every connection to `sqlite::memory:` opens its own database
        let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Get a reference to the database pool for advanced operations
    pub const fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    fn row_to_user(row: &SqliteRow) -> AppResult<User> {
        let id: String = row.try_get("id")?;
        Ok(User {
            id: Uuid::parse_str(&id)
                .map_err(|e| AppError::database(format!("invalid user id '{id}': {e}")))?,
            chat_id: row.try_get("chat_id")?,
            created_at: row.try_get("created_at")?,
            trial_activated_at: row.try_get("trial_activated_at")?,
            is_admin: row.try_get("is_admin")?,
        })
    }

    fn row_to_entry(row: &SqliteRow) -> AppResult<DiaryEntry> {
        let id: String = row.try_get("id")?;
        let user_id: String = row.try_get("user_id")?;
        let source: String = row.try_get("source")?;
        let parse_uuid = |raw: &str| {
            Uuid::parse_str(raw).map_err(|e| AppError::database(format!("invalid id '{raw}': {e}")))
        };

        Ok(DiaryEntry {
            id: parse_uuid(&id)?,
            user_id: parse_uuid(&user_id)?,
            created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
            details: NewDiaryEntry {
                date: row.try_get("date")?,
                title: row.try_get("title")?,
                quantity_value: row.try_get("amount_value")?,
                quantity_unit: row.try_get("amount_unit")?,
                mass_grams: row.try_get("mass_g")?,
                kcal: row.try_get("kcal")?,
                protein: row.try_get("protein")?,
                fat: row.try_get("fat")?,
                carbs: row.try_get("carbs")?,
                is_calories_only: row.try_get("is_calories_only")?,
                source: EntrySource::from_str(&source)?,
            },
        })
    }
}

#[async_trait]
impl DiaryStore for SqliteDiaryStore {
    async fn migrate(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                chat_id INTEGER UNIQUE NOT NULL,
                created_at DATETIME NOT NULL,
                trial_activated_at DATETIME,
                is_admin BOOLEAN NOT NULL DEFAULT 0
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS entries (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                date TEXT NOT NULL,
                title TEXT NOT NULL,
                amount_value REAL NOT NULL CHECK (amount_value > 0),
                amount_unit TEXT NOT NULL,
                mass_g REAL CHECK (mass_g IS NULL OR mass_g > 0),
                kcal REAL CHECK (kcal IS NULL OR kcal >= 0),
                protein REAL CHECK (protein IS NULL OR protein >= 0),
                fat REAL CHECK (fat IS NULL OR fat >= 0),
                carbs REAL CHECK (carbs IS NULL OR carbs >= 0),
                is_calories_only BOOLEAN NOT NULL DEFAULT 0,
                source TEXT NOT NULL CHECK (source IN ('manual', 'db', 'api', 'preset', 'ai')),
                created_at DATETIME NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_entries_user_date ON entries(user_id, date)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn get_or_create_user(&self, chat_id: i64) -> AppResult<User> {
        let started = Instant::now();
        let candidate = User::new(chat_id);
        let inserted = sqlx::query(
            r"
            INSERT INTO users (id, chat_id, created_at, trial_activated_at, is_admin)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT(chat_id) DO NOTHING
            ",
        )
        .bind(candidate.id.to_string())
        .bind(chat_id)
        .bind(candidate.created_at)
        .bind(candidate.trial_activated_at)
        .bind(candidate.is_admin)
        .execute(&self.pool)
        .await;
        AppLogger::log_database_operation("upsert", "users", inserted.is_ok(), elapsed_ms(started));
        inserted?;

        let row = sqlx::query(
            "SELECT id, chat_id, created_at, trial_activated_at, is_admin FROM users WHERE chat_id = $1",
        )
        .bind(chat_id)
        .fetch_one(&self.pool)
        .await?;
        Self::row_to_user(&row)
    }

    async fn add_entry(&self, user_id: Uuid, entry: NewDiaryEntry) -> AppResult<DiaryEntry> {
        validate_entry(&entry)?;
        let started = Instant::now();
        let stored = DiaryEntry {
            id: Uuid::new_v4(),
            user_id,
            created_at: Utc::now(),
            details: entry,
        };
        let d = &stored.details;

        let result = sqlx::query(
            r"
            INSERT INTO entries (
                id, user_id, date, title, amount_value, amount_unit, mass_g,
                kcal, protein, fat, carbs, is_calories_only, source, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            ",
        )
        .bind(stored.id.to_string())
        .bind(user_id.to_string())
        .bind(d.date)
        .bind(&d.title)
        .bind(d.quantity_value)
        .bind(&d.quantity_unit)
        .bind(d.mass_grams)
        .bind(d.kcal)
        .bind(d.protein)
        .bind(d.fat)
        .bind(d.carbs)
        .bind(d.is_calories_only)
        .bind(d.source.as_str())
        .bind(stored.created_at)
        .execute(&self.pool)
        .await;

        AppLogger::log_database_operation("insert", "entries", result.is_ok(), elapsed_ms(started));
        result?;
        Ok(stored)
    }

    async fn get_entries(&self, user_id: Uuid, date: NaiveDate) -> AppResult<Vec<DiaryEntry>> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, date, title, amount_value, amount_unit, mass_g,
                   kcal, protein, fat, carbs, is_calories_only, source, created_at
            FROM entries
            WHERE user_id = $1 AND date = $2
            ORDER BY created_at ASC, rowid ASC
            ",
        )
        .bind(user_id.to_string())
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_entry).collect()
    }

    async fn get_daily_summary(&self, user_id: Uuid, date: NaiveDate) -> AppResult<DailySummary> {
        let row = sqlx::query(
            r"
            SELECT COALESCE(SUM(kcal), 0.0) AS kcal,
                   COALESCE(SUM(protein), 0.0) AS protein,
                   COALESCE(SUM(fat), 0.0) AS fat,
                   COALESCE(SUM(carbs), 0.0) AS carbs
            FROM entries
            WHERE user_id = $1 AND date = $2
            ",
        )
        .bind(user_id.to_string())
        .bind(date)
        .fetch_one(&self.pool)
        .await?;

        Ok(DailySummary {
            kcal: row.try_get("kcal")?,
            protein: row.try_get("protein")?,
            fat: row.try_get("fat")?,
            carbs: row.try_get("carbs")?,
        })
    }
}
