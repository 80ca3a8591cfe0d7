// ABOUTME: Configuration management module for the nutrition pipeline and storage
// ABOUTME: Environment-driven settings for providers, translation, cache and database
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 KBJU Diary Contributors
//! Configuration module for the KBJU diary
//!
//! All settings come from environment variables (optionally loaded from a
//! `.env` file) and are turned into explicit structs at startup, so no
//! component reads the environment at request time.

/// Environment configuration
pub mod environment;

pub use environment::{
    AppConfig, DatabaseConfig, DatabaseUrl, Environment, ProvidersConfig, ResolutionSettings,
    TranslationSettings,
};
