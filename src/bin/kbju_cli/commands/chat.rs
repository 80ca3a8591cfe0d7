// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 KBJU Diary Contributors
// ABOUTME: Console chat transport feeding stdin lines to the conversation engine
// ABOUTME: Maps /pick, /none, /ai, /cancel and /summary commands onto engine inputs

use anyhow::Result;
use chrono::Utc;
use kbju_diary::context::DiaryContext;
use kbju_diary::conversation::Inbound;
use kbju_diary::database_plugins::DiaryStore;
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::helpers::display;

/// What one console line asks for
#[derive(Debug, PartialEq)]
enum ConsoleInput {
    Engine(Inbound),
    Summary,
    Help,
    Quit,
    Skip,
}

fn classify(line: &str) -> ConsoleInput {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return ConsoleInput::Skip;
    }
    if let Some(rest) = trimmed.strip_prefix("/pick") {
        return match rest.trim().parse::<usize>() {
            Ok(n) if n >= 1 => ConsoleInput::Engine(Inbound::Choice(n - 1)),
            _ => ConsoleInput::Help,
        };
    }
    match trimmed {
        "/summary" => ConsoleInput::Summary,
        "/help" => ConsoleInput::Help,
        "/quit" | "/exit" => ConsoleInput::Quit,
        _ => ConsoleInput::Engine(Inbound::from_text(trimmed)),
    }
}

/// Run the console loop until stdin closes or `/quit`
pub async fn run(context: &DiaryContext, chat_id: i64) -> Result<()> {
    display::print_banner(chat_id);

    let mut lines = BufReader::new(io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match classify(&line) {
            ConsoleInput::Skip => {}
            ConsoleInput::Quit => break,
            ConsoleInput::Help => display::print_help(),
            ConsoleInput::Summary => {
                let store = context.database();
                let user = store.get_or_create_user(chat_id).await?;
                let summary = store
                    .get_daily_summary(user.id, Utc::now().date_naive())
                    .await?;
                display::print_summary(&summary);
            }
            ConsoleInput::Engine(inbound) => {
                debug!(chat_id, ?inbound, "Dispatching console input");
                let reply = context.engine().handle(chat_id, inbound).await;
                display::print_reply(&reply);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pick_is_one_based() {
        assert_eq!(classify("/pick 2"), ConsoleInput::Engine(Inbound::Choice(1)));
        assert_eq!(classify("/pick 0"), ConsoleInput::Help);
        assert_eq!(classify("/pick x"), ConsoleInput::Help);
    }

    #[test]
    fn test_commands_and_text() {
        assert_eq!(classify("  "), ConsoleInput::Skip);
        assert_eq!(classify("/summary"), ConsoleInput::Summary);
        assert_eq!(classify("/none"), ConsoleInput::Engine(Inbound::NoneOfThese));
        assert_eq!(classify("/cancel"), ConsoleInput::Engine(Inbound::Cancel));
        assert_eq!(classify("/ai"), ConsoleInput::Engine(Inbound::Estimate));
        assert_eq!(
            classify("рис 100 г"),
            ConsoleInput::Engine(Inbound::Text("рис 100 г".into()))
        );
    }
}
