// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 KBJU Diary Contributors
// ABOUTME: Single-dish resolution command for kbju-cli
// ABOUTME: Parses the dish text and prints every candidate the chain returns

use kbju_diary::context::DiaryContext;
use kbju_diary::parser::parse_line;

use crate::helpers::display;

/// Parse `dish`, resolve its title and print the outcome
pub async fn run(context: &DiaryContext, dish: &str) {
    let parsed = parse_line(dish);
    display::print_parsed(&parsed);

    let resolution = context
        .chain()
        .resolve_traced(&parsed.title, parsed.cooking_method)
        .await;
    display::print_resolution(&resolution);
}
