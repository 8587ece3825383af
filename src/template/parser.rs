use smallvec::SmallVec;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

use super::error::DefinitionError;
use super::verbs::Verbs;
use super::{fold_case, is_ignored, Validation};

/// One `/`-delimited component of a route template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Exact text, stored case-folded; compared case-insensitively
    Literal(String),
    /// `{Name}`: binds exactly one path component
    Variable(Arc<str>),
    /// `{Name*}`: binds zero or more components, joined with `/`
    Wildcard(Arc<str>),
    /// Hybrid component such as `{mbz_guid}.{content_type}`, split on `.`
    Composite(Vec<Piece>),
}

/// Sub-part of a hybrid component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Piece {
    Literal(String),
    Variable(Arc<str>),
}

impl PathSegment {
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        matches!(self, PathSegment::Wildcard(_))
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Literal(text) => write!(f, "{text}"),
            PathSegment::Variable(name) => write!(f, "{{{name}}}"),
            PathSegment::Wildcard(name) => write!(f, "{{{name}*}}"),
            PathSegment::Composite(pieces) => {
                for (i, piece) in pieces.iter().enumerate() {
                    if i > 0 {
                        write!(f, ".")?;
                    }
                    match piece {
                        Piece::Literal(text) => write!(f, "{text}")?,
                        Piece::Variable(name) => write!(f, "{{{name}}}")?,
                    }
                }
                Ok(())
            }
        }
    }
}

/// A parsed, validated route template.
///
/// Immutable once built; the router wraps it into a [`Route`](crate::router::Route)
/// together with the target request type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    definition: String,
    segments: Vec<PathSegment>,
    verbs: Verbs,
    wildcard_index: Option<usize>,
    first_match_hash_key: String,
    shape_key: String,
}

impl PathTemplate {
    fn new(definition: &str, segments: Vec<PathSegment>, verbs: Verbs) -> Self {
        let wildcard_index = segments.iter().position(PathSegment::is_wildcard);

        let count = match wildcard_index {
            Some(_) => "*".to_string(),
            None => segments.len().to_string(),
        };
        let literal = match segments.first() {
            Some(PathSegment::Literal(text)) => text.as_str(),
            _ => "*",
        };
        let first_match_hash_key = format!("{count}/{literal}");

        let mut shape_key = String::with_capacity(definition.len());
        for segment in &segments {
            shape_key.push('/');
            match segment {
                PathSegment::Literal(text) => shape_key.push_str(text),
                PathSegment::Variable(_) => shape_key.push_str("{}"),
                PathSegment::Wildcard(_) => shape_key.push_str("{*}"),
                PathSegment::Composite(pieces) => {
                    for (i, piece) in pieces.iter().enumerate() {
                        if i > 0 {
                            shape_key.push('.');
                        }
                        match piece {
                            Piece::Literal(text) => shape_key.push_str(text),
                            Piece::Variable(_) => shape_key.push_str("{}"),
                        }
                    }
                }
            }
        }
        if shape_key.is_empty() {
            shape_key.push('/');
        }

        Self {
            definition: definition.to_string(),
            segments,
            verbs,
            wildcard_index,
            first_match_hash_key,
            shape_key,
        }
    }

    /// Template string as registered
    #[must_use]
    pub fn definition(&self) -> &str {
        &self.definition
    }

    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    #[must_use]
    pub fn verbs(&self) -> &Verbs {
        &self.verbs
    }

    /// Position of the (first) wildcard segment
    #[must_use]
    pub fn wildcard_index(&self) -> Option<usize> {
        self.wildcard_index
    }

    /// Coarse bucketing key: `"{count}/{first literal}"` with `*` standing in
    /// for a variable-length count or a non-literal first component.
    #[must_use]
    pub fn first_match_hash_key(&self) -> &str {
        &self.first_match_hash_key
    }

    /// Segment shape with variable names erased; equal shapes match equal paths.
    #[must_use]
    pub fn shape_key(&self) -> &str {
        &self.shape_key
    }

    /// Variable names in segment order, `ignore` placeholders excluded.
    #[must_use]
    pub fn variables(&self) -> Vec<&str> {
        self.segments
            .iter()
            .flat_map(segment_variables)
            .filter(|name| !is_ignored(name))
            .collect()
    }
}

fn segment_variables(segment: &PathSegment) -> SmallVec<[&str; 2]> {
    match segment {
        PathSegment::Literal(_) => SmallVec::new(),
        PathSegment::Variable(name) | PathSegment::Wildcard(name) => {
            let mut names = SmallVec::new();
            names.push(name.as_ref());
            names
        }
        PathSegment::Composite(pieces) => pieces
            .iter()
            .filter_map(|p| match p {
                Piece::Variable(name) => Some(name.as_ref()),
                Piece::Literal(_) => None,
            })
            .collect(),
    }
}

/// Parse a route definition into a [`PathTemplate`].
///
/// `verbs` is `None` (any verb) or a comma-separated verb list. With
/// [`Validation::Enforce`] every rule in [`DefinitionError`] is checked;
/// [`Validation::Skip`] accepts legacy templates and only fails on verbs that
/// cannot be parsed at all.
///
/// # Errors
///
/// Returns a [`DefinitionError`] naming the rule the template violates.
pub fn parse(
    definition: &str,
    verbs: Option<&str>,
    validation: Validation,
) -> Result<PathTemplate, DefinitionError> {
    let enforce = validation.is_enforced();

    let verbs = Verbs::parse(verbs).map_err(|verb| DefinitionError::InvalidVerb {
        template: definition.to_string(),
        verb,
    })?;

    if enforce && !definition.starts_with('/') {
        return Err(DefinitionError::MissingLeadingSlash {
            template: definition.to_string(),
        });
    }
    if definition.contains('?') {
        if enforce {
            return Err(DefinitionError::QueryStringInPath {
                template: definition.to_string(),
            });
        }
        // Request paths are cut at `?`, so this component can never match.
        warn!(template = %definition, "Query string in template; route is unreachable");
    }

    let segments = definition
        .split('/')
        .filter(|component| !component.is_empty())
        .map(|component| parse_component(definition, component, enforce))
        .collect::<Result<Vec<_>, _>>()?;

    if enforce {
        check_wildcard_is_last_variable(definition, &segments)?;
        check_unique_variables(definition, &segments)?;
    }

    Ok(PathTemplate::new(definition, segments, verbs))
}

fn parse_component(
    template: &str,
    component: &str,
    enforce: bool,
) -> Result<PathSegment, DefinitionError> {
    if !component.contains(['{', '}']) {
        return Ok(PathSegment::Literal(literal_text(component)));
    }

    if let Some(inner) = braced(component) {
        let (name, wildcard) = match inner.strip_suffix('*') {
            Some(name) => (name, true),
            None => (inner, false),
        };
        if name.is_empty() {
            if enforce {
                return Err(DefinitionError::EmptyVariableName {
                    template: template.to_string(),
                });
            }
            return Ok(PathSegment::Literal(literal_text(component)));
        }
        return Ok(if wildcard {
            PathSegment::Wildcard(Arc::from(name))
        } else {
            PathSegment::Variable(Arc::from(name))
        });
    }

    if component.contains('.') {
        let mut pieces = Vec::new();
        for piece in component.split('.') {
            match braced(piece) {
                Some(inner) => {
                    let name = match inner.strip_suffix('*') {
                        Some(_) if enforce => {
                            return Err(DefinitionError::WildcardInComposite {
                                template: template.to_string(),
                                component: component.to_string(),
                            })
                        }
                        Some(name) => name,
                        None => inner,
                    };
                    if name.is_empty() {
                        if enforce {
                            return Err(DefinitionError::EmptyVariableName {
                                template: template.to_string(),
                            });
                        }
                        pieces.push(Piece::Literal(literal_text(piece)));
                    } else {
                        pieces.push(Piece::Variable(Arc::from(name)));
                    }
                }
                None if enforce && piece.contains(['{', '}']) => {
                    return Err(DefinitionError::MalformedVariable {
                        template: template.to_string(),
                        component: component.to_string(),
                    })
                }
                None => pieces.push(Piece::Literal(literal_text(piece))),
            }
        }
        return Ok(PathSegment::Composite(pieces));
    }

    if enforce {
        return Err(DefinitionError::MalformedVariable {
            template: template.to_string(),
            component: component.to_string(),
        });
    }
    Ok(PathSegment::Literal(literal_text(component)))
}

/// Literal text as request parts are compared: percent-decoded, then folded.
fn literal_text(text: &str) -> String {
    let decoded = urlencoding::decode(text).unwrap_or(Cow::Borrowed(text));
    fold_case(&decoded)
}

/// Inner text of `{...}` when the braces wrap the whole string and nothing else.
fn braced(s: &str) -> Option<&str> {
    let inner = s.strip_prefix('{')?.strip_suffix('}')?;
    if inner.contains(['{', '}']) {
        None
    } else {
        Some(inner)
    }
}

fn check_wildcard_is_last_variable(
    template: &str,
    segments: &[PathSegment],
) -> Result<(), DefinitionError> {
    let mut wildcard: Option<&str> = None;
    for segment in segments {
        if let Some(wildcard) = wildcard {
            if let Some(variable) = segment_variables(segment).first() {
                return Err(DefinitionError::VariableAfterWildcard {
                    template: template.to_string(),
                    wildcard: wildcard.to_string(),
                    variable: variable.to_string(),
                });
            }
        }
        if let PathSegment::Wildcard(name) = segment {
            wildcard = Some(name.as_ref());
        }
    }
    Ok(())
}

fn check_unique_variables(
    template: &str,
    segments: &[PathSegment],
) -> Result<(), DefinitionError> {
    let mut seen: Vec<String> = Vec::new();
    let names = segments.iter().flat_map(segment_variables);
    for name in names.filter(|name| !is_ignored(name)) {
        let folded = fold_case(name);
        if seen.contains(&folded) {
            return Err(DefinitionError::DuplicateVariable {
                template: template.to_string(),
                variable: name.to_string(),
            });
        }
        seen.push(folded);
    }
    Ok(())
}
