//! # Template Module
//!
//! Parses route definitions such as `/content/{Version}/files/{Path*}` into an
//! ordered list of typed segments plus the metadata the router needs to bucket
//! and rank them.
//!
//! ## Grammar
//!
//! | Component | Segment |
//! |---|---|
//! | `content` | [`PathSegment::Literal`], matched case-insensitively |
//! | `{Name}` | [`PathSegment::Variable`], binds one component |
//! | `{Name*}` | [`PathSegment::Wildcard`], binds zero or more components |
//! | `{guid}.{format}` | [`PathSegment::Composite`], split on `.` |
//!
//! A variable named `ignore` matches a component without binding it.
//!
//! ## Validation
//!
//! With [`Validation::Enforce`] a template must start with `/`, must not carry
//! a query string, and may only have literals after a wildcard. Legacy route
//! tables can opt out with [`Validation::Skip`]; the switch is passed in
//! explicitly rather than read from process state.

mod error;
mod parser;
mod verbs;

pub use error::DefinitionError;
pub use parser::{parse, PathSegment, PathTemplate, Piece};
pub use verbs::{parse_method, VerbRank, Verbs};

/// Whether template rules are enforced at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Validation {
    #[default]
    Enforce,
    Skip,
}

impl Validation {
    #[must_use]
    pub fn is_enforced(self) -> bool {
        self == Validation::Enforce
    }
}

/// Case folding used for literals and path parts alike.
pub(crate) fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

/// `{ignore}` placeholders match a component but never bind it.
#[must_use]
pub fn is_ignored(variable: &str) -> bool {
    variable.eq_ignore_ascii_case("ignore")
}
