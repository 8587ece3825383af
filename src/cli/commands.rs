use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::{json, Value};
use std::io::Write;
use std::path::PathBuf;

use crate::config::RouterConfig;
use crate::manifest::Manifest;
use crate::router::{Route, RouteMatch, Router};
use crate::template::parse_method;
use crate::typed::{DynamicRequest, RequestData};

/// Command-line interface for restpath
///
/// Loads a TOML route manifest and lists, checks or resolves against it.
#[derive(Debug, Parser)]
#[command(name = "restpath")]
#[command(version, about = "REST route-template matcher", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every subcommand
#[derive(Debug, Clone, clap::Args)]
pub struct ManifestArgs {
    /// Path to the TOML route manifest
    #[arg(short, long, env = "RESTPATH_MANIFEST")]
    pub manifest: PathBuf,

    /// Accept legacy templates, overriding the manifest's [router] table
    #[arg(long, default_value_t = false)]
    pub skip_validation: bool,
}

impl ManifestArgs {
    fn load(&self) -> Result<(Manifest, Router)> {
        let manifest = Manifest::load(&self.manifest)?;
        let config = RouterConfig {
            skip_route_validation: manifest.router.skip_route_validation || self.skip_validation,
            ..manifest.router
        };
        let router = manifest.build_router_with(config)?;
        Ok((manifest, router))
    }
}

/// Output format for listings and resolutions
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List registered routes in registration order
    Routes {
        #[command(flatten)]
        manifest: ManifestArgs,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Build the routing table and report definition errors
    Check {
        #[command(flatten)]
        manifest: ManifestArgs,
    },
    /// Resolve a request and show the hydrated request
    Resolve {
        #[command(flatten)]
        manifest: ManifestArgs,

        /// HTTP verb (case-insensitive)
        verb: String,

        /// Request path, optionally with a query string
        path: String,

        /// Form value as KEY=VALUE (repeatable)
        #[arg(long = "form", value_name = "KEY=VALUE")]
        form: Vec<String>,

        /// Show every matching route, best first
        #[arg(long, default_value_t = false)]
        all: bool,

        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
}

/// Parse arguments and run against stdout.
///
/// # Errors
///
/// Returns manifest, definition and binding errors.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(&cli, &mut out)
}

/// Run `cli`, writing results to `out`.
///
/// # Errors
///
/// Returns manifest, definition and binding errors, and a not-found error
/// when `resolve` matches nothing.
pub fn run(cli: &Cli, out: &mut impl Write) -> Result<()> {
    match &cli.command {
        Commands::Routes { manifest, format } => {
            let (_, router) = manifest.load()?;
            match format {
                OutputFormat::Text => {
                    for route in router.routes() {
                        writeln!(out, "{}", route_line(route))?;
                    }
                }
                OutputFormat::Json => {
                    let routes: Vec<Value> = router.routes().map(|r| route_json(r)).collect();
                    writeln!(out, "{}", serde_json::to_string_pretty(&routes)?)?;
                }
            }
        }
        Commands::Check { manifest } => {
            let (_, router) = manifest.load()?;
            writeln!(
                out,
                "ok: {} routes in {} buckets",
                router.len(),
                router.table().bucket_count()
            )?;
            for (key, size) in router.table().bucket_sizes() {
                writeln!(out, "  {key:<24} {size}")?;
            }
        }
        Commands::Resolve {
            manifest,
            verb,
            path,
            form,
            all,
            format,
        } => {
            let (_, router) = manifest.load()?;
            let method = parse_method(verb).ok_or_else(|| anyhow!("Invalid HTTP verb '{verb}'"))?;
            let data = request_data(path, form)?;

            if *all {
                let matches = router.resolve_all(&method, path);
                match format {
                    OutputFormat::Text => {
                        for m in &matches {
                            writeln!(out, "{:>12} {}", m.score, route_line(&m.route))?;
                        }
                    }
                    OutputFormat::Json => {
                        let list: Vec<Value> = matches.iter().map(match_json).collect();
                        writeln!(out, "{}", serde_json::to_string_pretty(&list)?)?;
                    }
                }
                return Ok(());
            }

            let matched = router
                .resolve(&method, path)
                .ok_or_else(|| anyhow!("No route matches {method} {path}"))?;
            let request = router
                .create_request(&matched, &data)
                .context("Request binding failed")?
                .downcast::<DynamicRequest>()
                .map_err(|_| anyhow!("Manifest routes hydrate into DynamicRequest"))?;

            match format {
                OutputFormat::Text => {
                    writeln!(out, "{}", route_line(&matched.route))?;
                    for (name, value) in &request.values {
                        writeln!(out, "  {name} = {value}")?;
                    }
                }
                OutputFormat::Json => {
                    let mut body = match_json(&matched);
                    body["request"] = serde_json::to_value(&*request)?;
                    writeln!(out, "{}", serde_json::to_string_pretty(&body)?)?;
                }
            }
        }
    }
    Ok(())
}

fn request_data(path: &str, form: &[String]) -> Result<RequestData> {
    let mut data = match path.split_once('?') {
        Some((_, query)) => RequestData::from_query_string(query),
        None => RequestData::new(),
    };
    for pair in form {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| anyhow!("Form value '{pair}' is not KEY=VALUE"))?;
        data = data.with_form(key, value);
    }
    Ok(data)
}

fn route_line(route: &Route) -> String {
    let mut line = format!("{route}");
    if route.priority() != 0 {
        line.push_str(&format!(" (priority {})", route.priority()));
    }
    if let Some(summary) = route.summary() {
        line.push_str(&format!("  # {summary}"));
    }
    line
}

fn route_json(route: &Route) -> Value {
    json!({
        "verbs": route.verbs().to_string(),
        "path": route.path(),
        "request": route.request_type().name(),
        "hash_key": route.first_match_hash_key(),
        "priority": route.priority(),
        "summary": route.summary(),
        "notes": route.notes(),
    })
}

fn match_json(matched: &RouteMatch) -> Value {
    let captures: serde_json::Map<String, Value> = matched
        .captures
        .iter()
        .map(|c| (c.name.to_string(), json!(c.value)))
        .collect();
    json!({
        "route": route_json(&matched.route),
        "score": matched.score,
        "captures": captures,
    })
}
