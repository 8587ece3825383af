//! # Typed Module
//!
//! Hydration of matched routes into request objects.
//!
//! ## Overview
//!
//! Every request type carries an explicit binding table, a
//! [`RequestDescriptor`], built once when the type is registered. Each entry
//! maps a member name to a converting setter, so binding a request is a
//! table lookup per captured value:
//!
//! 1. Path captures are converted and assigned by name.
//! 2. Query pairs, then form pairs, fill members the path did not bind.
//! 3. Anything left keeps the type's `Default` value.
//!
//! Member lookup ignores ASCII case and `_`/`-`, so a `{UniqueId}` variable
//! binds a `unique_id` field. Members registered with
//! [`RequestDescriptor::field`] are only bound when public-field binding is
//! switched on in [`RouterConfig`](crate::config::RouterConfig).
//!
//! ## Usage
//!
//! ```rust
//! use restpath::typed::RestRequest;
//! use uuid::Uuid;
//!
//! #[derive(Debug, Default, RestRequest)]
//! #[route("/complex/{Id}/{Name}/unique/{UniqueId}")]
//! struct Complex {
//!     id: i32,
//!     name: String,
//!     unique_id: Uuid,
//! }
//! ```
//!
//! Types without a Rust definition (routes read from a manifest) hydrate into
//! [`DynamicRequest`].

mod descriptor;
mod hydrate;
mod value;

pub use descriptor::{member_key, BindingError, Member, MemberKind, RequestDescriptor};
pub use hydrate::{
    BindOptions, DynamicRequest, RequestBinder, RequestData, RequestType, RestRequest,
};
pub use restpath_macros::RestRequest;
pub use value::FromRouteValue;
