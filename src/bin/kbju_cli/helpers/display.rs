// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 KBJU Diary Contributors
// ABOUTME: Output formatting helpers for kbju-cli
// ABOUTME: Renders engine replies, candidates, parsed lines and daily totals

use kbju_diary::conversation::Reply;
use kbju_diary::diary::round1;
use kbju_diary::models::{DailySummary, DiaryEntry, NutritionCandidate, ParsedLine};
use kbju_diary::resolution::Resolution;

/// Greeting shown when the chat loop starts
pub fn print_banner(chat_id: i64) {
    println!("KBJU diary, chat {chat_id}");
    println!("{}", "=".repeat(60));
    println!("Type a meal like \"гречка отварная 150 г\" or \"протеиновый батончик 200 ккал\".");
    print_help();
}

/// Console commands
pub fn print_help() {
    println!("Commands: /pick N, /none, /ai, /cancel, /summary, /quit");
}

/// Render one engine reply
pub fn print_reply(reply: &Reply) {
    match reply {
        Reply::AskTitle => println!("What did you eat? Please include the dish name."),
        Reply::AskGrams { title } => println!("How many grams of \"{title}\"?"),
        Reply::AskKcal { title } => {
            println!("No nutrition data for \"{title}\". How many kcal was it?");
        }
        Reply::Choose { title, options } => {
            println!("Which one matches \"{title}\"?");
            for (i, option) in options.iter().enumerate() {
                println!("  {}. {}", i + 1, format_candidate(option));
            }
            println!("Reply with /pick N, /none or /ai for an estimate.");
        }
        Reply::Saved { entry, summary } => {
            println!("Saved: {}", format_entry(entry));
            print_summary(summary);
        }
        Reply::Cancelled => println!("Cancelled."),
        Reply::NothingPending => println!("There is nothing to choose from right now."),
        Reply::EstimateUnavailable { title } => {
            println!("No estimate is available for \"{title}\". Pick an option or send the kcal.");
        }
        Reply::Discarded => println!("That request was cancelled; nothing was saved."),
        Reply::Failed { reason } => println!("Could not save the entry: {reason}"),
    }
}

/// Day totals line
pub fn print_summary(summary: &DailySummary) {
    println!(
        "Today: {} kcal, P {} / F {} / C {}",
        round1(summary.kcal),
        round1(summary.protein),
        round1(summary.fat),
        round1(summary.carbs)
    );
}

/// Fields extracted from a line
pub fn print_parsed(parsed: &ParsedLine) {
    println!("Title: {}", parsed.title);
    if let Some(method) = parsed.cooking_method {
        println!("Method: {method}");
    }
    if let (Some(value), Some(unit)) = (parsed.quantity_value, parsed.quantity_unit) {
        println!("Quantity: {value} {unit}");
    }
    if let Some(grams) = parsed.mass_grams {
        println!("Mass: {grams} g");
    }
    if let Some(kcal) = parsed.explicit_kcal {
        println!("Explicit kcal: {kcal}");
    }
}

/// Chain outcome with every candidate
pub fn print_resolution(resolution: &Resolution) {
    println!(
        "Key: {} | source: {} | candidates: {}",
        resolution.key,
        resolution.step.label(),
        resolution.candidates.len()
    );
    for (i, candidate) in resolution.candidates.iter().enumerate() {
        println!("  {}. {}", i + 1, format_candidate(candidate));
    }
}

fn format_candidate(candidate: &NutritionCandidate) -> String {
    format!(
        "{} per 100 g: {} kcal, P {} / F {} / C {}",
        candidate.title,
        round1(candidate.kcal_per_100g),
        round1(candidate.protein_per_100g),
        round1(candidate.fat_per_100g),
        round1(candidate.carbs_per_100g)
    )
}

fn format_entry(entry: &DiaryEntry) -> String {
    let details = &entry.details;
    let macros = match (details.protein, details.fat, details.carbs) {
        (Some(p), Some(f), Some(c)) => format!(", P {p} / F {f} / C {c}"),
        _ => String::new(),
    };
    format!(
        "{} {} {}: {} kcal{macros} [{}]",
        details.title,
        details.quantity_value,
        details.quantity_unit,
        details.kcal.map_or_else(|| "?".to_owned(), |k| k.to_string()),
        details.source
    )
}
