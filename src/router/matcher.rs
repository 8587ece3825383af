//! Route matching and specificity scoring.
//!
//! # Matching
//!
//! A route without a wildcard must consume the path exactly, one segment per
//! part. A route with a wildcard needs at least as many parts as it has
//! single-part segments; the wildcard absorbs the surplus (possibly none), and
//! the segments after it are anchored to the end of the path.
//!
//! # Scoring
//!
//! Scores compare lexicographically on, in order:
//!
//! 1. fewer parts absorbed by a wildcard
//! 2. fewer wildcard segments
//! 3. more literal matches (including literal pieces of hybrid components)
//! 4. fewer variables
//! 5. verb fit: exact verb > verb listed among several > any verb
//!
//! Each criterion gets its own decimal band so a weaker criterion can never
//! outweigh a stronger one. Only the ordering is meaningful.

use http::Method;
use smallvec::SmallVec;
use std::borrow::Cow;
use std::sync::Arc;

use super::route::Route;
use crate::template::{fold_case, is_ignored, PathSegment, Piece, VerbRank};

/// Captures stay inline up to this many variables.
pub const MAX_INLINE_CAPTURES: usize = 8;

/// Path parts stay inline up to this depth.
pub const MAX_INLINE_PARTS: usize = 16;

const BASELINE: i64 = 1_000_000_000;
const ABSORBED_PART_WEIGHT: i64 = 10_000_000;
const WILDCARD_SEGMENT_WEIGHT: i64 = 1_000_000;
const LITERAL_WEIGHT: i64 = 10_000;
const VARIABLE_WEIGHT: i64 = 100;

/// One value captured for a variable or wildcard, in segment order.
///
/// `value` is `None` for a wildcard that absorbed no parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capture {
    pub name: Arc<str>,
    pub value: Option<String>,
}

/// Inline capture storage for the resolve path.
pub type Captures = SmallVec<[Capture; MAX_INLINE_CAPTURES]>;

/// An incoming path split into components.
///
/// Components are percent-decoded; `raw` keeps their case for capture and
/// `folded` is the lowercased copy used for literal comparison. Empty
/// components and anything after `?` or `#` are dropped.
#[derive(Debug, Clone)]
pub struct PathParts<'a> {
    raw: SmallVec<[Cow<'a, str>; MAX_INLINE_PARTS]>,
    folded: SmallVec<[String; MAX_INLINE_PARTS]>,
}

impl<'a> PathParts<'a> {
    #[must_use]
    pub fn parse(path_info: &'a str) -> Self {
        let path = path_info.split(['?', '#']).next().unwrap_or_default();
        let mut raw = SmallVec::new();
        let mut folded = SmallVec::new();
        for part in path.split('/').filter(|p| !p.is_empty()) {
            let decoded = urlencoding::decode(part).unwrap_or(Cow::Borrowed(part));
            folded.push(fold_case(&decoded));
            raw.push(decoded);
        }
        Self { raw, folded }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Component `idx` with its original case
    #[must_use]
    pub fn raw(&self, idx: usize) -> &str {
        &self.raw[idx]
    }

    /// Component `idx`, lowercased
    #[must_use]
    pub fn folded(&self, idx: usize) -> &str {
        &self.folded[idx]
    }

    /// Lowercased first component, used for bucket probing
    #[must_use]
    pub fn first_folded(&self) -> Option<&str> {
        self.folded.first().map(String::as_str)
    }

    /// `raw[start..end]` joined with `/`
    fn join(&self, start: usize, end: usize) -> String {
        let mut joined = String::new();
        for (i, part) in self.raw[start..end].iter().enumerate() {
            if i > 0 {
                joined.push('/');
            }
            joined.push_str(part);
        }
        joined
    }
}

/// A route that matched a request, with its score and captured raw values.
#[derive(Debug, Clone)]
pub struct MatchCandidate {
    pub route: Arc<Route>,
    pub score: i64,
    pub captures: Captures,
}

/// Whether `route` accepts `verb` and `parts`.
#[must_use]
pub fn is_match(route: &Route, verb: &Method, parts: &PathParts<'_>) -> bool {
    walk(route, verb, parts, false).is_some()
}

/// Specificity of `route` for the request, or `-1` when it does not match.
#[must_use]
pub fn score(route: &Route, verb: &Method, parts: &PathParts<'_>) -> i64 {
    walk(route, verb, parts, false).map_or(-1, |(score, _)| score)
}

/// Match `route` and, on success, return its score and captured values.
#[must_use]
pub fn match_route(route: &Arc<Route>, verb: &Method, parts: &PathParts<'_>) -> Option<MatchCandidate> {
    let (score, captures) = walk(route, verb, parts, true)?;
    Some(MatchCandidate {
        route: Arc::clone(route),
        score,
        captures,
    })
}

fn walk(
    route: &Route,
    verb: &Method,
    parts: &PathParts<'_>,
    capture: bool,
) -> Option<(i64, Captures)> {
    let verb_rank = route.verbs().rank(verb)?;

    let absorbed = if route.is_wildcard_path() {
        parts.len().checked_sub(route.fixed_parts())?
    } else if parts.len() == route.fixed_parts() {
        0
    } else {
        return None;
    };

    let mut captures = Captures::new();
    let mut ix = 0;
    let mut wildcard_seen = false;
    for segment in route.segments() {
        match segment {
            PathSegment::Literal(text) => {
                if parts.folded(ix) != text.as_str() {
                    return None;
                }
                ix += 1;
            }
            PathSegment::Variable(name) => {
                if capture && !is_ignored(name) {
                    captures.push(Capture {
                        name: Arc::clone(name),
                        value: Some(parts.raw(ix).to_string()),
                    });
                }
                ix += 1;
            }
            PathSegment::Composite(pieces) => {
                match_composite(pieces, parts.raw(ix), parts.folded(ix), capture, &mut captures)?;
                ix += 1;
            }
            PathSegment::Wildcard(name) => {
                // Only the first wildcard absorbs; legacy templates may carry more.
                let take = if wildcard_seen { 0 } else { absorbed };
                wildcard_seen = true;
                if capture && !is_ignored(name) {
                    captures.push(Capture {
                        name: Arc::clone(name),
                        value: (take > 0).then(|| parts.join(ix, ix + take)),
                    });
                }
                ix += take;
            }
        }
    }
    debug_assert_eq!(ix, parts.len());

    Some((rank(route, absorbed, verb_rank), captures))
}

fn match_composite(
    pieces: &[Piece],
    raw: &str,
    folded: &str,
    capture: bool,
    captures: &mut Captures,
) -> Option<()> {
    if raw.split('.').count() != pieces.len() {
        return None;
    }
    for ((piece, raw_piece), folded_piece) in pieces.iter().zip(raw.split('.')).zip(folded.split('.')) {
        match piece {
            Piece::Literal(text) => {
                if folded_piece != text.as_str() {
                    return None;
                }
            }
            Piece::Variable(name) => {
                if raw_piece.is_empty() {
                    return None;
                }
                if capture && !is_ignored(name) {
                    captures.push(Capture {
                        name: Arc::clone(name),
                        value: Some(raw_piece.to_string()),
                    });
                }
            }
        }
    }
    Some(())
}

fn rank(route: &Route, absorbed: usize, verb_rank: VerbRank) -> i64 {
    let absorbed = absorbed.min(99) as i64;
    let wildcards = i64::from(route.wildcard_count().min(9));
    let literals = i64::from(route.literal_count().min(99));
    let variables = i64::from(route.variable_count().min(99));
    let verb = match verb_rank {
        VerbRank::Exact => 10,
        VerbRank::Listed => 5,
        VerbRank::Any => 1,
    };

    BASELINE - absorbed * ABSORBED_PART_WEIGHT - wildcards * WILDCARD_SEGMENT_WEIGHT
        + literals * LITERAL_WEIGHT
        - variables * VARIABLE_WEIGHT
        + verb
}
