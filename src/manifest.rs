//! TOML route manifests.
//!
//! A manifest lists routes by request type name, for tooling that has no
//! Rust types to register (the `restpath` binary, contract checks in CI).
//! Every entry hydrates into a [`DynamicRequest`](crate::typed::DynamicRequest).
//!
//! ```toml
//! [router]
//! skip_route_validation = false
//!
//! [[routes]]
//! request = "GetContent"
//! path = "/content/{Version}"
//! verbs = "GET"
//! summary = "Fetch one content version"
//!
//! [[routes]]
//! request = "BrowseContent"
//! path = "/content/{Slug*}"
//! priority = -1
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::RouterConfig;
use crate::router::{RouteDef, Router};

/// One `[[routes]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestRoute {
    /// Request type name
    pub request: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verbs: Option<String>,
    #[serde(default)]
    pub priority: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ManifestRoute {
    #[must_use]
    pub fn to_route_def(&self) -> RouteDef {
        let mut def = RouteDef::new(self.path.clone()).priority(self.priority);
        if let Some(verbs) = &self.verbs {
            def = def.verbs(verbs.clone());
        }
        if let Some(summary) = &self.summary {
            def = def.summary(summary.clone());
        }
        if let Some(notes) = &self.notes {
            def = def.notes(notes.clone());
        }
        def
    }
}

/// A parsed route manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub router: RouterConfig,
    #[serde(default)]
    pub routes: Vec<ManifestRoute>,
}

impl Manifest {
    /// # Errors
    ///
    /// Returns an error for invalid TOML or missing required keys.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        toml::from_str(source).context("Failed to parse route manifest")
    }

    /// Read a manifest file; environment variables override its `[router]`
    /// table.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest {}", path.display()))?;
        let mut manifest = Self::from_toml_str(&source)
            .with_context(|| format!("Invalid manifest {}", path.display()))?;
        manifest
            .router
            .apply_overrides(|key| std::env::var(key).ok());
        Ok(manifest)
    }

    /// Register every entry, in file order, on a router using the manifest's
    /// `[router]` configuration.
    ///
    /// # Errors
    ///
    /// Returns the first definition error, naming the entry that caused it.
    pub fn build_router(&self) -> Result<Router> {
        self.build_router_with(self.router)
    }

    /// [`build_router`](Self::build_router) with an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns the first definition error, naming the entry that caused it.
    pub fn build_router_with(&self, config: RouterConfig) -> Result<Router> {
        let mut builder = Router::builder(config);
        for (idx, route) in self.routes.iter().enumerate() {
            builder = builder
                .add_dynamic(&route.request, route.to_route_def())
                .with_context(|| {
                    format!(
                        "Route #{} ({} {}) rejected",
                        idx + 1,
                        route.request,
                        route.path
                    )
                })?;
        }
        Ok(builder.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"
[router]
bind_public_fields = true

[[routes]]
request = "GetContent"
path = "/content/{Version}"
verbs = "GET"
summary = "One version"

[[routes]]
request = "BrowseContent"
path = "/content/{Slug*}"
priority = -1
"#;

    #[test]
    fn test_parse_manifest() {
        let manifest = Manifest::from_toml_str(MANIFEST).unwrap();
        assert!(manifest.router.bind_public_fields);
        assert!(!manifest.router.skip_route_validation);
        assert_eq!(manifest.routes.len(), 2);
        assert_eq!(manifest.routes[0].verbs.as_deref(), Some("GET"));
        assert_eq!(manifest.routes[1].priority, -1);
        assert_eq!(manifest.routes[1].verbs, None);
    }

    #[test]
    fn test_build_router() {
        let router = Manifest::from_toml_str(MANIFEST)
            .unwrap()
            .build_router()
            .unwrap();
        assert_eq!(router.len(), 2);
        let route = router.routes().next().unwrap();
        assert_eq!(route.summary(), Some("One version"));
        assert_eq!(route.priority(), 0);
    }

    #[test]
    fn test_rejected_entry_is_named() {
        let manifest = Manifest::from_toml_str(
            r#"
[[routes]]
request = "Broken"
path = "/a/{Rest*}/{Id}"
"#,
        )
        .unwrap();
        let err = manifest.build_router().unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("Route #1 (Broken /a/{Rest*}/{Id}) rejected"));
        assert!(message.contains("Rest"));
    }

    #[test]
    fn test_missing_path_is_an_error() {
        assert!(Manifest::from_toml_str("[[routes]]\nrequest = \"X\"\n").is_err());
    }
}
