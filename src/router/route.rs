use std::borrow::Cow;
use std::fmt;

use crate::template::{PathSegment, PathTemplate, Piece, Verbs};
use crate::typed::RequestType;

/// Declarative route metadata: what a `#[route(..)]` attribute or a manifest
/// entry supplies for one registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDef {
    pub path: Cow<'static, str>,
    pub verbs: Option<Cow<'static, str>>,
    /// Breaks score ties before registration order does
    pub priority: i32,
    pub summary: Option<Cow<'static, str>>,
    pub notes: Option<Cow<'static, str>>,
}

impl RouteDef {
    pub fn new(path: impl Into<Cow<'static, str>>) -> Self {
        Self {
            path: path.into(),
            verbs: None,
            priority: 0,
            summary: None,
            notes: None,
        }
    }

    #[must_use]
    pub fn verbs(mut self, verbs: impl Into<Cow<'static, str>>) -> Self {
        self.verbs = Some(verbs.into());
        self
    }

    #[must_use]
    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    #[must_use]
    pub fn summary(mut self, summary: impl Into<Cow<'static, str>>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    #[must_use]
    pub fn notes(mut self, notes: impl Into<Cow<'static, str>>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// A compiled route: parsed template, target request type and ranking data.
///
/// Routes are created by the [`RouterBuilder`](super::RouterBuilder) and are
/// immutable afterwards.
#[derive(Debug)]
pub struct Route {
    ordinal: usize,
    template: PathTemplate,
    request_type: RequestType,
    priority: i32,
    summary: Option<String>,
    notes: Option<String>,
    /// Segments that consume exactly one path part
    fixed_parts: usize,
    literal_count: u32,
    variable_count: u32,
    wildcard_count: u32,
}

impl Route {
    pub(crate) fn new(
        ordinal: usize,
        template: PathTemplate,
        request_type: RequestType,
        def: &RouteDef,
    ) -> Self {
        let mut fixed_parts = 0;
        let mut literal_count = 0;
        let mut variable_count = 0;
        let mut wildcard_count = 0;
        for segment in template.segments() {
            match segment {
                PathSegment::Literal(_) => {
                    fixed_parts += 1;
                    literal_count += 1;
                }
                PathSegment::Variable(_) => {
                    fixed_parts += 1;
                    variable_count += 1;
                }
                PathSegment::Wildcard(_) => {
                    wildcard_count += 1;
                    variable_count += 1;
                }
                PathSegment::Composite(pieces) => {
                    fixed_parts += 1;
                    for piece in pieces {
                        match piece {
                            Piece::Literal(_) => literal_count += 1,
                            Piece::Variable(_) => variable_count += 1,
                        }
                    }
                }
            }
        }

        Self {
            ordinal,
            template,
            request_type,
            priority: def.priority,
            summary: def.summary.as_deref().map(str::to_string),
            notes: def.notes.as_deref().map(str::to_string),
            fixed_parts,
            literal_count,
            variable_count,
            wildcard_count,
        }
    }

    /// Registration sequence number; lower registered first
    #[must_use]
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    #[must_use]
    pub fn template(&self) -> &PathTemplate {
        &self.template
    }

    /// Template string as registered
    #[must_use]
    pub fn path(&self) -> &str {
        self.template.definition()
    }

    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        self.template.segments()
    }

    #[must_use]
    pub fn verbs(&self) -> &Verbs {
        self.template.verbs()
    }

    #[must_use]
    pub fn first_match_hash_key(&self) -> &str {
        self.template.first_match_hash_key()
    }

    #[must_use]
    pub fn request_type(&self) -> &RequestType {
        &self.request_type
    }

    #[must_use]
    pub fn priority(&self) -> i32 {
        self.priority
    }

    #[must_use]
    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    #[must_use]
    pub fn is_wildcard_path(&self) -> bool {
        self.wildcard_count > 0
    }

    pub(crate) fn fixed_parts(&self) -> usize {
        self.fixed_parts
    }

    pub(crate) fn literal_count(&self) -> u32 {
        self.literal_count
    }

    pub(crate) fn variable_count(&self) -> u32 {
        self.variable_count
    }

    pub(crate) fn wildcard_count(&self) -> u32 {
        self.wildcard_count
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} -> {}",
            self.verbs(),
            self.path(),
            self.request_type.name()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::{parse, Validation};

    fn route(path: &str, verbs: Option<&str>) -> Route {
        let template = parse(path, verbs, Validation::Enforce).unwrap();
        Route::new(0, template, RequestType::dynamic("Test"), &RouteDef::new(path.to_string()))
    }

    #[test]
    fn test_counts() {
        let r = route("/music/{Artist}/{guid}.xml/{Rest*}", None);
        assert_eq!(r.fixed_parts(), 3);
        assert_eq!(r.literal_count(), 2);
        assert_eq!(r.variable_count(), 3);
        assert_eq!(r.wildcard_count(), 1);
        assert!(r.is_wildcard_path());
    }

    #[test]
    fn test_display() {
        let r = route("/content/{Id}", Some("GET"));
        assert_eq!(r.to_string(), "GET /content/{Id} -> Test");
    }

    #[test]
    fn test_route_def_builder() {
        let def = RouteDef::new("/a")
            .verbs("GET,POST")
            .priority(2)
            .summary("list")
            .notes("paged");
        assert_eq!(def.verbs.as_deref(), Some("GET,POST"));
        assert_eq!(def.priority, 2);
        assert_eq!(def.summary.as_deref(), Some("list"));
        assert_eq!(def.notes.as_deref(), Some("paged"));
    }
}
