// ABOUTME: Re-exports application constants from the kbju-core foundation crate
// ABOUTME: Keeps crate::constants paths stable for every module of the root crate
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 KBJU Diary Contributors

//! # Constants Module
//!
//! Cache TTLs, provider limits and timeouts, environment variable names and
//! service names. Values live in `kbju-core` so they can be shared with any
//! future transport crate.

pub use kbju_core::constants::*;
