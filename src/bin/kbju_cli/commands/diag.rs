// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 KBJU Diary Contributors
// ABOUTME: Diagnostics command reporting configuration and source health
// ABOUTME: Prints masked credentials, translation flags, sizes and a live sample translate/resolve

use kbju_diary::context::DiaryContext;
use kbju_diary::parser::parse_line;

use crate::helpers::display;

/// Print configuration health and run the chain on `sample`
pub async fn run(context: &DiaryContext, sample: &str) {
    let chain = context.chain();

    println!("{}", context.config().summary());
    println!();
    println!("Storage: {}", context.database().backend_info());
    println!(
        "Translation flags: {:?} (generative backend attached: {})",
        chain.translator().config(),
        chain.translator().has_backend()
    );
    println!("Seed dictionary entries: {}", chain.seeds().len());
    println!("Nutrition cache entries: {}", chain.cache().len().await);

    let providers: Vec<String> = chain
        .providers()
        .iter()
        .map(|p| {
            let state = if p.is_configured() {
                "configured"
            } else {
                "missing credentials"
            };
            format!("{} ({state})", p.name())
        })
        .collect();
    println!("Providers: {}", providers.join(", "));

    println!();
    println!("Sample: {sample}");
    let parsed = parse_line(sample);
    let terms = chain
        .translator()
        .terms_for(&parsed.title, parsed.cooking_method)
        .await;
    println!("  search terms: {}", terms.join(" | "));

    let resolution = chain
        .resolve_traced(&parsed.title, parsed.cooking_method)
        .await;
    display::print_resolution(&resolution);
}
