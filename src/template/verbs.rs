use http::Method;
use smallvec::SmallVec;
use std::fmt;

/// Verb restriction attached to a route template.
///
/// `None`, `"*"` and `"ANY"` all accept every verb; anything else is a
/// comma-separated list such as `"GET"` or `"get, post"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verbs {
    /// Accepts every HTTP verb
    Any,
    /// Accepts only the listed verbs
    Only(SmallVec<[Method; 2]>),
}

/// How well a route's verb restriction fits the request verb.
///
/// Ordered from weakest to strongest so that ranks compare directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum VerbRank {
    /// Route accepts any verb
    Any,
    /// Request verb is one of several listed verbs
    Listed,
    /// Route accepts exactly the request verb
    Exact,
}

impl Verbs {
    /// Parse a verbs string. Returns the offending token on failure.
    pub fn parse(verbs: Option<&str>) -> Result<Self, String> {
        let Some(raw) = verbs.map(str::trim) else {
            return Ok(Verbs::Any);
        };
        if raw.is_empty() || raw == "*" || raw.eq_ignore_ascii_case("any") {
            return Ok(Verbs::Any);
        }

        let mut methods: SmallVec<[Method; 2]> = SmallVec::new();
        for token in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            if token == "*" || token.eq_ignore_ascii_case("any") {
                return Ok(Verbs::Any);
            }
            let method = parse_method(token).ok_or_else(|| token.to_string())?;
            if !methods.contains(&method) {
                methods.push(method);
            }
        }

        if methods.is_empty() {
            Ok(Verbs::Any)
        } else {
            Ok(Verbs::Only(methods))
        }
    }

    #[must_use]
    pub fn is_any(&self) -> bool {
        matches!(self, Verbs::Any)
    }

    /// Rank of `verb` against this restriction, `None` when it is not allowed.
    #[must_use]
    pub fn rank(&self, verb: &Method) -> Option<VerbRank> {
        match self {
            Verbs::Any => Some(VerbRank::Any),
            Verbs::Only(methods) if methods.len() == 1 && methods[0] == *verb => {
                Some(VerbRank::Exact)
            }
            Verbs::Only(methods) if methods.contains(verb) => Some(VerbRank::Listed),
            Verbs::Only(_) => None,
        }
    }

    /// First verb both restrictions accept, rendered for diagnostics.
    #[must_use]
    pub fn overlap(&self, other: &Verbs) -> Option<String> {
        match (self, other) {
            (Verbs::Any, Verbs::Any) => Some("ANY".to_string()),
            // ANY plus a verb-specific route on one shape is a legal overload.
            (Verbs::Any, Verbs::Only(_)) | (Verbs::Only(_), Verbs::Any) => None,
            (Verbs::Only(left), Verbs::Only(right)) => left
                .iter()
                .find(|m| right.contains(m))
                .map(|m| m.as_str().to_string()),
        }
    }
}

impl fmt::Display for Verbs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verbs::Any => write!(f, "ANY"),
            Verbs::Only(methods) => {
                for (i, method) in methods.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{method}")?;
                }
                Ok(())
            }
        }
    }
}

/// Parse a request or template verb case-insensitively (`put` == `PUT`).
#[must_use]
pub fn parse_method(verb: &str) -> Option<Method> {
    let verb = verb.trim();
    if verb.is_empty() {
        return None;
    }
    Method::from_bytes(verb.to_ascii_uppercase().as_bytes()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_and_star_mean_any() {
        assert_eq!(Verbs::parse(None).unwrap(), Verbs::Any);
        assert_eq!(Verbs::parse(Some("*")).unwrap(), Verbs::Any);
        assert_eq!(Verbs::parse(Some("any")).unwrap(), Verbs::Any);
        assert_eq!(Verbs::parse(Some("  ")).unwrap(), Verbs::Any);
    }

    #[test]
    fn test_verbs_are_case_insensitive() {
        let verbs = Verbs::parse(Some("put")).unwrap();
        assert_eq!(verbs.rank(&Method::PUT), Some(VerbRank::Exact));
        assert_eq!(parse_method("put"), Some(Method::PUT));
        assert_eq!(parse_method("PuT"), Some(Method::PUT));
    }

    #[test]
    fn test_verb_list_ranks_listed() {
        let verbs = Verbs::parse(Some("GET, post")).unwrap();
        assert_eq!(verbs.rank(&Method::POST), Some(VerbRank::Listed));
        assert_eq!(verbs.rank(&Method::DELETE), None);
        assert_eq!(verbs.to_string(), "GET,POST");
    }

    #[test]
    fn test_rank_ordering() {
        assert!(VerbRank::Exact > VerbRank::Listed);
        assert!(VerbRank::Listed > VerbRank::Any);
    }

    #[test]
    fn test_invalid_verb_is_reported() {
        assert_eq!(Verbs::parse(Some("GET,B@D")).unwrap_err(), "B@D");
    }

    #[test]
    fn test_overlap() {
        let get = Verbs::parse(Some("GET")).unwrap();
        let get_post = Verbs::parse(Some("POST,GET")).unwrap();
        let put = Verbs::parse(Some("PUT")).unwrap();
        assert_eq!(get.overlap(&get_post), Some("GET".to_string()));
        assert_eq!(get.overlap(&put), None);
        assert_eq!(Verbs::Any.overlap(&Verbs::Any), Some("ANY".to_string()));
        assert_eq!(Verbs::Any.overlap(&get), None);
    }
}
