// ABOUTME: Diary entry assembly from parsed lines and chosen nutrition values
// ABOUTME: Scales per-100g candidates by portion mass and builds storage records
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 KBJU Diary Contributors

/// Entry assembler
pub mod assembler;

pub use assembler::{finalize, round1};
