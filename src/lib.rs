//! # restpath
//!
//! **restpath** resolves REST requests against route templates such as
//! `/content/{Version}` or `/content/{Slug*}/literal` and hydrates the matching
//! request type from the captured values plus query and form data.
//!
//! ## Overview
//!
//! Request types declare their routes; at startup the router compiles every
//! template, buckets it by a coarse hash key and freezes the table. Each
//! request then probes a few buckets, scores the candidates that match and
//! binds the winner's captures onto a fresh request object.
//!
//! ## Architecture
//!
//! - **[`template`]** - Template parsing, verb restrictions, definition errors
//! - **[`router`]** - Route table, matcher, scoring and resolution
//! - **[`typed`]** - Request descriptors, value converters and hydration
//! - **[`dispatcher`]** - Verb + path + query/form in, request object or error out
//! - **[`config`]** - Validation toggle and public-field binding mode
//! - **[`manifest`]** - TOML route manifests for tooling
//! - **[`logging`]** - `tracing-subscriber` setup for binaries
//! - **[`cli`]** - The `restpath` command
//!
//! ### Resolution Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Host as HTTP layer
//!     participant Dispatcher
//!     participant Router
//!     participant Table as RouteTable
//!     participant Matcher
//!     participant Binder as RequestBinder
//!
//!     Host->>Dispatcher: dispatch("GET", "/content/v2", data)
//!     Dispatcher->>Router: resolve(GET, "/content/v2")
//!     Router->>Table: candidates_for(["content", "v2"])
//!     Table-->>Router: buckets 2/content, */content, 2/*, */*
//!     Router->>Matcher: match_route(route, GET, parts)
//!     Matcher-->>Router: score + captures
//!     Router-->>Dispatcher: best RouteMatch
//!     Dispatcher->>Binder: bind(captures, data)
//!     Binder-->>Dispatcher: request object
//!     Dispatcher-->>Host: Dispatched / DispatchError
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use restpath::config::RouterConfig;
//! use restpath::dispatcher::Dispatcher;
//! use restpath::router::Router;
//! use restpath::typed::{RequestData, RestRequest};
//!
//! #[derive(Debug, Default, RestRequest)]
//! #[route("/content/{Version}", "GET")]
//! #[route("/content/{Version}/{Path*}", "GET")]
//! struct GetContent {
//!     version: u32,
//!     path: Option<String>,
//!     format: String,
//! }
//!
//! let router = Router::builder(RouterConfig::default())
//!     .register::<GetContent>()?
//!     .build();
//! let dispatcher = Dispatcher::new(router);
//!
//! let data = RequestData::from_query_string("format=json");
//! let req: GetContent = dispatcher.dispatch_as("GET", "/content/2/a/b", &data).unwrap();
//! assert_eq!(req.version, 2);
//! assert_eq!(req.path.as_deref(), Some("a/b"));
//! assert_eq!(req.format, "json");
//! # Ok::<(), restpath::template::DefinitionError>(())
//! ```
//!
//! ## Precedence
//!
//! When several routes match, the most specific wins: a literal beats a
//! variable, a variable beats a wildcard, a wildcard that absorbs fewer
//! components beats one that absorbs more, and an exact verb beats a verb
//! list, which beats any verb. Remaining ties go to the higher `priority`,
//! then to the route registered first.
//!
//! ## Concurrency
//!
//! A built [`Router`](router::Router) is immutable and `Send + Sync`; resolve
//! from as many threads as needed. Routes added after startup go through
//! [`SharedRouter`](router::SharedRouter), which swaps in a rebuilt table.

// The derive macro emits `::restpath::..` paths; make them resolve in-crate.
extern crate self as restpath;

pub mod cli;
pub mod config;
pub mod dispatcher;
pub mod logging;
pub mod manifest;
pub mod router;
pub mod template;
pub mod typed;

pub use config::RouterConfig;
pub use dispatcher::{DispatchError, Dispatched, Dispatcher};
pub use router::{RouteDef, RouteMatch, Router, RouterBuilder, SharedRouter};
pub use template::DefinitionError;
pub use typed::{BindingError, DynamicRequest, RequestData, RestRequest};
