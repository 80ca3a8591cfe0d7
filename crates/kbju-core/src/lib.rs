// ABOUTME: Core types and constants for the KBJU meal diary
// ABOUTME: Foundation crate with error handling, domain models, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 KBJU Diary Contributors

#![deny(unsafe_code)]

//! # KBJU Core
//!
//! Foundation crate providing shared types and constants for the meal diary.
//! This crate is designed to change infrequently, enabling incremental
//! compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode` and `AppResult`
//! - **constants**: Cache TTLs, provider limits, timeouts and environment variable names
//! - **models**: Parsed meal lines, nutrition candidates, diary entries and users

/// Unified error handling system with standard error codes
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Core data models (`ParsedLine`, `NutritionCandidate`, `DiaryEntry`, `User`)
pub mod models;
