//! # Configuration Module
//!
//! Router configuration: the route-validation toggle and the public-field
//! binding compatibility mode.
//!
//! ## Sources
//!
//! Values come from a TOML file, an inline TOML string or environment
//! variables. When a file is loaded, environment variables override it.
//!
//! ### `RESTPATH_SKIP_ROUTE_VALIDATION`
//!
//! Accept legacy templates (no leading slash, variables after a wildcard,
//! variables without a member) at registration instead of failing startup.
//! Suppressed definition errors are logged at `warn`.
//!
//! Default: `false`
//!
//! ### `RESTPATH_BIND_PUBLIC_FIELDS`
//!
//! Also bind members declared as plain fields (`#[rest(field)]`).
//!
//! Default: `false`
//!
//! Both accept `1`, `true`, `yes` or `on` (any case) as true and `0`, `false`,
//! `no` or `off` as false; anything else leaves the value unchanged.
//!
//! ## Usage
//!
//! ```rust
//! use restpath::config::RouterConfig;
//!
//! let config = RouterConfig::from_toml_str("skip_route_validation = true").unwrap();
//! assert!(config.skip_route_validation);
//! assert!(!config.bind_public_fields);
//! ```
//!
//! The configuration is passed to [`Router::builder`](crate::router::Router::builder)
//! explicitly; nothing here is process-global.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

use crate::template::Validation;

pub const ENV_SKIP_ROUTE_VALIDATION: &str = "RESTPATH_SKIP_ROUTE_VALIDATION";
pub const ENV_BIND_PUBLIC_FIELDS: &str = "RESTPATH_BIND_PUBLIC_FIELDS";

/// Router configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Permit non-conformant templates at registration
    pub skip_route_validation: bool,
    /// Bind plain-field members as well as properties
    pub bind_public_fields: bool,
}

impl RouterConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_overrides(|key| env::var(key).ok());
        config
    }

    /// Parse a TOML document holding the config keys at top level.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid TOML or mistyped values.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        toml::from_str(source).context("Failed to parse router configuration")
    }

    /// Read a TOML file, then apply environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config = Self::from_toml_str(&source)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        config.apply_overrides(|key| env::var(key).ok());
        Ok(config)
    }

    /// Override fields from `lookup`, keyed by environment variable name.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_SKIP_ROUTE_VALIDATION).as_deref().and_then(parse_flag) {
            self.skip_route_validation = value;
        }
        if let Some(value) = lookup(ENV_BIND_PUBLIC_FIELDS).as_deref().and_then(parse_flag) {
            self.bind_public_fields = value;
        }
    }

    /// Template validation mode implied by `skip_route_validation`.
    #[must_use]
    pub fn validation(&self) -> Validation {
        if self.skip_route_validation {
            Validation::Skip
        } else {
            Validation::Enforce
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
