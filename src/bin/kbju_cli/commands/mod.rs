// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 KBJU Diary Contributors
// ABOUTME: Re-exports command modules for kbju-cli
// ABOUTME: Provides the chat transport, single resolution and diagnostics commands

pub mod chat;
pub mod diag;
pub mod resolve;
