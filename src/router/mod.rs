//! # Router Module
//!
//! Route registration, bucketing, matching and resolution.
//!
//! ## Overview
//!
//! The router is responsible for:
//! - Compiling route templates into immutable [`Route`]s at startup
//! - Bucketing routes by first-match hash key so a request only looks at a
//!   handful of candidates
//! - Matching candidates against the request verb and path and scoring them
//! - Returning the most specific match with its captured values
//!
//! ## Architecture
//!
//! 1. **Registration**: a [`RouterBuilder`] parses each template, checks it
//!    against the target request type, rejects duplicates and files the route
//!    under its hash key in a [`RouteTable`].
//!
//! 2. **Resolution**: [`Router::resolve`] splits the path, probes the buckets
//!    `n/first`, `*/first`, `n/*` and `*/*`, matches every candidate and keeps
//!    the best by score, then priority, then registration order.
//!
//! ## Example
//!
//! ```rust
//! use http::Method;
//! use restpath::config::RouterConfig;
//! use restpath::router::{RouteDef, Router};
//!
//! let router = Router::builder(RouterConfig::default())
//!     .add_dynamic("GetContent", RouteDef::new("/content/{Version}").verbs("GET"))?
//!     .add_dynamic("Browse", RouteDef::new("/content/{Slug*}"))?
//!     .build();
//!
//! let matched = router.resolve(&Method::GET, "/content/v2").unwrap();
//! assert_eq!(matched.request_type().name(), "GetContent");
//! assert_eq!(matched.get("version"), Some("v2"));
//! # Ok::<(), restpath::template::DefinitionError>(())
//! ```
//!
//! The router is immutable once built. Hosts that register routes after
//! startup wrap it in a [`SharedRouter`] and swap in a rebuilt table.

mod core;
mod matcher;
mod route;
mod shared;
mod table;

pub use core::{RouteMatch, Router, RouterBuilder};
pub use matcher::{
    is_match, match_route, score, Capture, Captures, MatchCandidate, PathParts,
    MAX_INLINE_CAPTURES,
};
pub use route::{Route, RouteDef};
pub use shared::SharedRouter;
pub use table::{probe_keys, RouteTable};
