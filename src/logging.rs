// ABOUTME: Logging configuration and structured logging setup for the meal diary
// ABOUTME: Configures log levels, formatters and the structured AppLogger event helpers
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 KBJU Diary Contributors

//! Logging configuration with structured output
//!
//! Logs always go to stderr so the console chat transport can own stdout.

use crate::constants::{env_config, service_names};
use anyhow::Result;
use serde_json::json;
use std::env;
use std::io;
use tracing::{error, info, warn};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format (json, pretty, compact)
    pub format: LogFormat,
    /// Include source file and line numbers
    pub include_location: bool,
    /// Include thread information
    pub include_thread: bool,
    /// Include span information for tracing
    pub include_spans: bool,
    /// Service name for structured logging
    pub service_name: String,
    /// Service version
    pub service_version: String,
    /// Environment (development, staging, production)
    pub environment: String,
}

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// `JSON` format for production logging
    Json,
    /// Pretty format for development
    Pretty,
    /// Compact format for the interactive CLI
    Compact,
}

impl LogFormat {
    /// Parse from a `LOG_FORMAT` value, defaulting to pretty
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            "compact" => Self::Compact,
            _ => Self::Pretty,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: LogFormat::Pretty,
            include_location: false,
            include_thread: false,
            include_spans: false,
            service_name: service_names::KBJU_CLI.into(),
            service_version: env!("CARGO_PKG_VERSION").to_owned(),
            environment: "development".into(),
        }
    }
}

impl LoggingConfig {
    /// Create logging configuration from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        let level = env::var(env_config::RUST_LOG).unwrap_or_else(|_| "info".into());

        let format = env::var(env_config::LOG_FORMAT)
            .map(|v| LogFormat::from_str_or_default(&v))
            .unwrap_or(LogFormat::Pretty);

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        // In production, use more detailed logging
        let is_production = environment == "production";

        Self {
            level,
            format,
            include_location: is_production || env::var("LOG_INCLUDE_LOCATION").is_ok(),
            include_thread: is_production || env::var("LOG_INCLUDE_THREAD").is_ok(),
            include_spans: env::var("LOG_INCLUDE_SPANS").is_ok(),
            service_name: env::var("SERVICE_NAME")
                .unwrap_or_else(|_| service_names::KBJU_CLI.into()),
            service_version: env!("CARGO_PKG_VERSION").to_owned(),
            environment,
        }
    }

    /// Build the env filter with noise reduction for HTTP and database crates
    fn env_filter(&self) -> EnvFilter {
        env::var(env_config::RUST_LOG)
            .map_or_else(
                |_| EnvFilter::new(&self.level),
                |env_directive| EnvFilter::new(&env_directive),
            )
            .add_directive(
                "hyper=warn"
                    .parse()
                    .unwrap_or_else(|_| tracing::Level::WARN.into()),
            )
            .add_directive(
                "reqwest=warn"
                    .parse()
                    .unwrap_or_else(|_| tracing::Level::WARN.into()),
            )
            .add_directive(
                "rustls=warn"
                    .parse()
                    .unwrap_or_else(|_| tracing::Level::WARN.into()),
            )
            .add_directive(
                "sqlx=warn"
                    .parse()
                    .unwrap_or_else(|_| tracing::Level::WARN.into()),
            )
            .add_directive(
                format!("kbju_diary={}", self.level)
                    .parse()
                    .unwrap_or_else(|_| tracing::Level::INFO.into()),
            )
    }

    /// Initialize the global tracing subscriber
    ///
    /// # Errors
    ///
    /// Returns an error if the tracing subscriber fails to initialize
    pub fn init(&self) -> Result<()> {
        let registry = tracing_subscriber::registry().with(self.env_filter());
        let span_events = if self.include_spans {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };

        match self.format {
            LogFormat::Json => {
                let json_layer = fmt::layer()
                    .with_file(self.include_location)
                    .with_line_number(self.include_location)
                    .with_thread_ids(self.include_thread)
                    .with_thread_names(self.include_thread)
                    .with_target(true)
                    .with_writer(io::stderr)
                    .with_span_events(span_events)
                    .json();

                registry.with(json_layer).try_init()?;
            }
            LogFormat::Pretty => {
                let pretty_layer = fmt::layer()
                    .with_file(self.include_location)
                    .with_line_number(self.include_location)
                    .with_thread_ids(self.include_thread)
                    .with_thread_names(self.include_thread)
                    .with_target(true)
                    .with_writer(io::stderr)
                    .with_span_events(span_events);

                registry.with(pretty_layer).try_init()?;
            }
            LogFormat::Compact => {
                let compact_layer = fmt::layer()
                    .compact()
                    .with_file(false)
                    .with_line_number(false)
                    .with_target(false)
                    .with_writer(io::stderr)
                    .with_span_events(FmtSpan::NONE);

                registry.with(compact_layer).try_init()?;
            }
        }

        self.log_startup_info();
        Ok(())
    }

    /// Log structured startup information
    fn log_startup_info(&self) {
        let config_summary = json!({
            "service": {
                "name": self.service_name,
                "version": self.service_version,
                "environment": self.environment
            },
            "logging": {
                "level": self.level,
                "format": format!("{:?}", self.format),
                "location": self.include_location,
            }
        });

        tracing::debug!(
            service.name = %self.service_name,
            service.version = %self.service_version,
            environment = %self.environment,
            "Logging initialized: {}",
            config_summary
        );
    }
}

/// Initialize logging from environment
///
/// # Errors
///
/// Returns an error if logging initialization fails
pub fn init_from_env() -> Result<()> {
    LoggingConfig::from_env().init()
}

/// Application-specific logging utilities
pub struct AppLogger;

impl AppLogger {
    /// Log a provider call and its outcome
    pub fn log_provider_call(provider: &str, query: &str, outcome: &str, duration_ms: u64) {
        info!(
            provider.name = %provider,
            provider.query = %query,
            provider.outcome = %outcome,
            provider.duration_ms = %duration_ms,
            "Provider lookup"
        );
    }

    /// Log a provider that was skipped for lack of credentials
    pub fn log_provider_unconfigured(provider: &str) {
        info!(
            provider.name = %provider,
            "Provider credentials missing, skipping lookup"
        );
    }

    /// Log a provider failure that was recovered as an empty result
    pub fn log_provider_failure(provider: &str, query: &str, details: &str) {
        warn!(
            provider.name = %provider,
            provider.query = %query,
            error.details = %details,
            "Provider lookup failed"
        );
    }

    /// Log which pipeline step answered a resolution
    pub fn log_resolution(key: &str, source: &str, candidates: usize) {
        info!(
            resolution.key = %key,
            resolution.source = %source,
            resolution.candidates = %candidates,
            "Resolution finished"
        );
    }

    /// Log a persisted diary entry
    pub fn log_entry_persisted(chat_id: i64, title: &str, kcal: Option<f64>, source: &str) {
        info!(
            user.chat_id = %chat_id,
            entry.title = %title,
            entry.kcal = ?kcal,
            entry.source = %source,
            "Diary entry persisted"
        );
    }

    /// Log a data-integrity failure for one message
    pub fn log_integrity_failure(chat_id: i64, details: &str) {
        error!(
            user.chat_id = %chat_id,
            error.details = %details,
            "Could not finalize diary entry"
        );
    }

    /// Log database operations
    pub fn log_database_operation(operation: &str, table: &str, success: bool, duration_ms: u64) {
        info!(
            db.operation = %operation,
            db.table = %table,
            db.success = %success,
            db.duration_ms = %duration_ms,
            "Database operation"
        );
    }
}
