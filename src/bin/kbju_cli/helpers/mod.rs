// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 KBJU Diary Contributors
// ABOUTME: Helper modules for kbju-cli
// ABOUTME: Provides console rendering of engine replies and resolutions

pub mod display;
