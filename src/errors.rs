// ABOUTME: Re-exports the unified error types from the kbju-core foundation crate
// ABOUTME: AppError, ErrorCode and AppResult are shared across every layer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 KBJU Diary Contributors

pub use kbju_core::errors::*;
