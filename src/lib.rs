// ABOUTME: Main library entry point for the KBJU meal diary nutrition pipeline
// ABOUTME: Turns free-text meal lines into calorie and macro diary entries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 KBJU Diary Contributors

#![deny(unsafe_code)]

//! # KBJU Diary
//!
//! A nutrition-resolution pipeline for a meal diary. A user types one line
//! such as `куриная грудка отварная 140 г` and receives calories, protein,
//! fat and carbohydrates for the portion.
//!
//! ## Architecture
//!
//! - **Parser**: free text to a structured [`models::ParsedLine`]
//! - **Translation**: dish titles to English search keywords
//! - **Providers**: external nutrition databases behind one contract
//! - **Cache**: TTL cache of resolved candidate lists
//! - **Resolution**: seeds, cache, providers and presets in priority order
//! - **Conversation**: per-user state machine asking for missing grams or calories
//! - **Estimation**: generative per-100 g estimates offered on request
//! - **Diary**: entry assembly from the chosen candidate and portion mass
//! - **Database plugins**: storage collaborator (in-memory or `SQLite`)
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use kbju_diary::config::AppConfig;
//! use kbju_diary::context::DiaryContext;
//! use kbju_diary::conversation::{Inbound, Reply};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let context = DiaryContext::from_config(AppConfig::from_env()?).await?;
//!     let reply = context
//!         .engine()
//!         .handle(42, Inbound::Text("творог 100 г".into()))
//!         .await;
//!     if let Reply::Saved { summary, .. } = reply {
//!         println!("today: {:.1} kcal", summary.kcal);
//!     }
//!     Ok(())
//! }
//! ```

/// Nutrition lookup cache
pub mod cache;

/// Environment configuration
pub mod config;

/// Application constants
pub mod constants;

/// Dependency wiring
pub mod context;

/// Per-user conversation state machine
pub mod conversation;

/// Storage collaborator implementations
pub mod database_plugins;

/// Diary entry assembly
pub mod diary;

/// Unified error handling
pub mod errors;

/// Generative per-100 g nutrition estimates
pub mod estimation;

/// Generative language model client
pub mod llm;

/// Logging configuration and structured log helpers
pub mod logging;

/// Domain models
pub mod models;

/// Free-text meal line parser
pub mod parser;

/// External nutrition provider adapters
pub mod providers;

/// Resolution chain
pub mod resolution;

/// Dish title to search keyword translation
pub mod translation;
