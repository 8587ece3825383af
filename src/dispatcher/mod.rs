//! # Dispatcher Module
//!
//! The boundary between the HTTP layer and the router: takes the verb, raw
//! path, query pairs and form pairs of an inbound request and returns either a
//! populated request object or a structured error.
//!
//! ## Request Flow
//!
//! 1. Take a snapshot of the current router
//! 2. Resolve the verb and path to the most specific route
//! 3. Hydrate the route's request type from captures, query and form data
//! 4. Hand back a [`Dispatched`] request, or a [`DispatchError`]
//!
//! ## Error Handling
//!
//! - No matching route: [`DispatchError::NoMatch`], HTTP 404
//! - Unconvertible value: [`DispatchError::Binding`], HTTP 400, naming the field
//!
//! Neither touches the route table; one bad request never affects another.
//!
//! ## Example
//!
//! ```rust
//! use restpath::config::RouterConfig;
//! use restpath::dispatcher::Dispatcher;
//! use restpath::router::{RouteDef, Router};
//! use restpath::typed::{DynamicRequest, RequestData};
//!
//! let router = Router::builder(RouterConfig::default())
//!     .add_dynamic("GetUser", RouteDef::new("/users/{Id}").verbs("GET"))?
//!     .build();
//! let dispatcher = Dispatcher::new(router);
//!
//! let user: DynamicRequest = dispatcher
//!     .dispatch_as("get", "/users/42", &RequestData::new())
//!     .unwrap();
//! assert_eq!(user.get("id"), Some("42"));
//! # Ok::<(), restpath::template::DefinitionError>(())
//! ```

mod core;
mod error;

pub use core::{generate_request_id, Dispatched, Dispatcher};
pub use error::DispatchError;
