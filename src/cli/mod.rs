//! # CLI Module
//!
//! Command-line access to a TOML route manifest (see [`crate::manifest`]).
//!
//! ## Commands
//!
//! ### `routes`
//!
//! List registered routes in registration order:
//!
//! ```bash
//! restpath routes --manifest routes.toml --format json
//! ```
//!
//! ### `check`
//!
//! Build the routing table, fail on the first definition error and print the
//! bucket distribution:
//!
//! ```bash
//! restpath check --manifest routes.toml
//! ```
//!
//! ### `resolve`
//!
//! Resolve one request and print the winning route, its captures and the
//! hydrated request:
//!
//! ```bash
//! restpath resolve --manifest routes.toml GET '/content/v2?format=json'
//! restpath resolve --manifest routes.toml --all GET /content/a/b
//! ```
//!
//! `--skip-validation` on any command accepts legacy templates regardless of
//! the manifest's `[router]` table.

mod commands;


pub use commands::{run, run_cli, Cli, Commands, ManifestArgs, OutputFormat};
