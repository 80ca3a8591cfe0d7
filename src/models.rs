// ABOUTME: Re-exports domain models from the kbju-core foundation crate
// ABOUTME: Parsed lines, nutrition candidates, diary entries and users
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 KBJU Diary Contributors

pub use kbju_core::models::*;
