//! Structured logging setup.
//!
//! The library only emits `tracing` events; binaries and hosts decide where
//! they go. [`init_logging_with_config`] installs a `tracing-subscriber`
//! registry with an [`EnvFilter`] (a set `RUST_LOG` wins over the configured
//! level) and a JSON or pretty fmt layer writing to stderr.
//!
//! | Variable | Default |
//! |---|---|
//! | `RESTPATH_LOG_LEVEL` | `info` |
//! | `RESTPATH_LOG_FORMAT` | `json` (`pretty` for development) |
//! | `RESTPATH_LOG_TARGET_FILTER` | none, e.g. `restpath::router=debug` |
//! | `RESTPATH_LOG_INCLUDE_LOCATION` | `false` |

use anyhow::{Context, Result};
use std::str::FromStr;
use tracing::Level;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

pub const ENV_LOG_LEVEL: &str = "RESTPATH_LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "RESTPATH_LOG_FORMAT";
pub const ENV_LOG_TARGET_FILTER: &str = "RESTPATH_LOG_TARGET_FILTER";
pub const ENV_LOG_INCLUDE_LOCATION: &str = "RESTPATH_LOG_INCLUDE_LOCATION";

/// Output encoding of log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per event
    #[default]
    Json,
    /// Multi-line, human-oriented
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" | "text" => Ok(LogFormat::Pretty),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

/// Where and how much to log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub level: Level,
    pub format: LogFormat,
    /// Extra filter directives, comma-separated
    pub target_filter: Option<String>,
    /// Include `file:line` in every event
    pub include_location: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: LogFormat::Json,
            target_filter: None,
            include_location: false,
        }
    }
}

impl LogConfig {
    /// Apply overrides from `lookup`, keyed by environment variable name.
    /// Values that do not parse leave the field unchanged.
    #[must_use]
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup(ENV_LOG_LEVEL).and_then(|v| v.trim().parse().ok()) {
            self.level = level;
        }
        if let Some(format) = lookup(ENV_LOG_FORMAT).and_then(|v| v.parse().ok()) {
            self.format = format;
        }
        if let Some(filter) = lookup(ENV_LOG_TARGET_FILTER).filter(|v| !v.trim().is_empty()) {
            self.target_filter = Some(filter);
        }
        if let Some(location) = lookup(ENV_LOG_INCLUDE_LOCATION).and_then(|v| v.trim().parse().ok()) {
            self.include_location = location;
        }
        self
    }

    /// Directives from `target_filter`.
    ///
    /// # Errors
    ///
    /// Returns the first directive that does not parse.
    pub fn directives(&self) -> Result<Vec<Directive>> {
        let Some(filter) = &self.target_filter else {
            return Ok(Vec::new());
        };
        filter
            .split(',')
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(|d| {
                d.parse::<Directive>()
                    .with_context(|| format!("Invalid log filter directive '{d}'"))
            })
            .collect()
    }
}

/// Install the global subscriber described by `config`.
///
/// # Errors
///
/// Fails on a bad filter directive or if a global subscriber is already
/// installed.
pub fn init_logging_with_config(config: &LogConfig) -> Result<()> {
    let mut env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_str()));
    for directive in config.directives()? {
        env_filter = env_filter.add_directive(directive);
    }

    let location = config.include_location;
    let fmt_layer = match config.format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_file(location)
            .with_line_number(location)
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .pretty()
            .with_file(location)
            .with_line_number(location)
            .with_writer(std::io::stderr)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize logging")
}
