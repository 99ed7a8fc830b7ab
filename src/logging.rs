//! Structured logging initialization
//!
//! Sets up a `tracing` subscriber with an `EnvFilter`, JSON or pretty output,
//! and optional non-blocking writes through `tracing-appender`.
//!
//! | Variable              | Values                              | Default |
//! |-----------------------|-------------------------------------|---------|
//! | `RUM_LOG_LEVEL`       | trace, debug, info, warn, error     | info    |
//! | `RUM_LOG_FORMAT`      | json, pretty                        | json    |
//! | `RUM_LOG_TARGETS`     | comma-separated filter directives   | none    |
//! | `RUM_LOG_ASYNC`       | true, false                         | true    |
//! | `RUM_LOG_LOCATION`    | true, false                         | false   |
//!
//! `RUST_LOG`, when set, takes precedence over `RUM_LOG_LEVEL`.

use anyhow::{Context, Result};
use std::env;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Log format: JSON for production, pretty-print for development
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "pretty" => LogFormat::Pretty,
            _ => LogFormat::Json,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Log level: trace/debug/info/warn/error
    pub log_level: String,
    pub format: LogFormat,
    /// Extra filter directives, comma-separated (e.g. `rum::router=debug`)
    pub target_filter: Option<String>,
    /// Write through a background thread
    pub async_logging: bool,
    /// Include file:line location (dev only)
    pub include_location: bool,
}

impl LogConfig {
    /// Parse configuration from environment variables with defaults
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            log_level: lookup("RUM_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            format: LogFormat::parse(&lookup("RUM_LOG_FORMAT").unwrap_or_default()),
            target_filter: lookup("RUM_LOG_TARGETS").filter(|t| !t.trim().is_empty()),
            async_logging: lookup("RUM_LOG_ASYNC")
                .and_then(|s| s.parse().ok())
                .unwrap_or(true),
            include_location: lookup("RUM_LOG_LOCATION")
                .and_then(|s| s.parse().ok())
                .unwrap_or(false),
        }
    }

    /// Verbose synchronous pretty output for local development
    #[must_use]
    pub fn default_dev() -> Self {
        Self {
            log_level: "debug".to_string(),
            format: LogFormat::Pretty,
            target_filter: None,
            async_logging: false,
            include_location: true,
        }
    }
}

fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Build the event filter for `config`.
///
/// # Errors
///
/// Returns an error naming the first directive in `target_filter` that does not parse.
pub fn build_filter(config: &LogConfig) -> Result<EnvFilter> {
    let level = parse_level(&config.log_level);
    let mut env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    // may_minihttp logs every client disconnect; keep only real problems.
    env_filter = env_filter.add_directive(
        "may_minihttp=warn"
            .parse()
            .context("Invalid built-in log directive")?,
    );

    if let Some(targets) = &config.target_filter {
        for directive in targets.split(',').map(str::trim).filter(|d| !d.is_empty()) {
            env_filter = env_filter.add_directive(
                directive
                    .parse()
                    .with_context(|| format!("Invalid log filter directive: {}", directive))?,
            );
        }
    }

    Ok(env_filter)
}

/// Install the global subscriber.
///
/// With async logging enabled the returned guard flushes buffered lines when
/// dropped; keep it alive for the life of the process.
///
/// # Errors
///
/// Fails on an invalid filter directive or if a global subscriber is
/// already installed.
pub fn init_logging(config: &LogConfig) -> Result<Option<WorkerGuard>> {
    let env_filter = build_filter(config)?;

    let (writer, guard) = if config.async_logging {
        let (non_blocking, guard) = tracing_appender::non_blocking(std::io::stdout());
        (tracing_subscriber::fmt::writer::BoxMakeWriter::new(non_blocking), Some(guard))
    } else {
        (tracing_subscriber::fmt::writer::BoxMakeWriter::new(std::io::stdout), None)
    };

    let fmt_layer = match config.format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_target(true)
            .with_thread_ids(true)
            .with_span_list(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(writer)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .pretty()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(writer)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize logging")?;

    Ok(guard)
}
