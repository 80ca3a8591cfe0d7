// ABOUTME: KBJU CLI - console transport and diagnostics for the meal diary
// ABOUTME: Chats over stdin/stdout, runs single resolutions and reports configuration health
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 KBJU Diary Contributors
//!
//! Usage:
//! ```bash
//! # Log meals interactively as chat 42
//! kbju-cli chat --chat-id 42
//!
//! # Keep the diary in a SQLite file
//! kbju-cli --database-url sqlite:./data/diary.db chat
//!
//! # Run the resolution chain for one dish
//! kbju-cli resolve "гречка отварная"
//!
//! # Show masked configuration and run a sample lookup
//! kbju-cli diag --sample "куриная грудка"
//! ```

mod commands;
mod helpers;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use kbju_diary::config::{AppConfig, DatabaseUrl};
use kbju_diary::context::DiaryContext;
use kbju_diary::logging::{LogFormat, LoggingConfig};
use tracing::info;

#[derive(Parser)]
#[command(
    name = "kbju-cli",
    about = "KBJU meal diary console",
    long_about = "Console transport for the KBJU meal diary: log meals, resolve dishes and inspect configuration."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Database URL override
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Enable verbose logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Log meals interactively, one message per line
    Chat {
        /// Chat id the diary entries belong to
        #[arg(long, default_value = "1")]
        chat_id: i64,
    },

    /// Resolve a dish through the seed, cache, provider and preset sources
    Resolve {
        /// Dish text, e.g. "рис отварной"
        dish: String,
    },

    /// Print masked configuration, translation flags and a live sample lookup
    Diag {
        /// Dish used for the sample translate and resolve
        #[arg(long, default_value = "гречка отварная")]
        sample: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::from_env();
    logging.format = LogFormat::Compact;
    if cli.verbose {
        "debug".clone_into(&mut logging.level);
    }
    logging.init()?;

    let mut config = AppConfig::from_env()?;
    if let Some(url) = cli.database_url.as_deref() {
        config.database.url =
            DatabaseUrl::parse_url(url).context("Invalid --database-url value")?;
    }
    config.validate()?;

    info!("Starting kbju-cli with {}", config.database.url.to_connection_string());
    let context = DiaryContext::from_config(config).await?;

    match cli.command {
        Command::Chat { chat_id } => commands::chat::run(&context, chat_id).await?,
        Command::Resolve { dish } => commands::resolve::run(&context, &dish).await,
        Command::Diag { sample } => commands::diag::run(&context, &sample).await,
    }

    Ok(())
}
