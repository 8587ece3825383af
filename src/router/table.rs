use std::collections::HashMap;
use std::sync::Arc;

use smallvec::SmallVec;

use super::matcher::PathParts;
use super::route::Route;

/// Routes grouped by first-match hash key.
///
/// A template's key is `"{N}/{L}"`: `N` is its segment count (`*` when it
/// contains a wildcard) and `L` its folded first literal (`*` when the first
/// segment is not a plain literal). A request only needs to look at the
/// buckets for `n/p0`, `*/p0`, `n/*` and `*/*`.
#[derive(Debug, Default, Clone)]
pub struct RouteTable {
    buckets: HashMap<String, Vec<Arc<Route>>>,
    routes: Vec<Arc<Route>>,
}

impl RouteTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, route: Arc<Route>) {
        self.buckets
            .entry(route.first_match_hash_key().to_string())
            .or_default()
            .push(Arc::clone(&route));
        self.routes.push(route);
    }

    /// Every route whose key is among the request's probe keys, in
    /// registration order within each bucket.
    pub fn candidates_for<'t>(&'t self, parts: &PathParts<'_>) -> impl Iterator<Item = &'t Arc<Route>> {
        probe_keys(parts)
            .into_iter()
            .filter_map(|key| self.buckets.get(&key))
            .flatten()
    }

    /// Registered route with the same shape (names erased) and an
    /// overlapping verb set, plus the shared verb.
    #[must_use]
    pub fn find_duplicate(&self, route: &Route) -> Option<(&Arc<Route>, String)> {
        let shape = route.template().shape_key();
        let bucket = self.buckets.get(route.first_match_hash_key())?;
        bucket.iter().find_map(|existing| {
            if existing.template().shape_key() != shape {
                return None;
            }
            existing
                .verbs()
                .overlap(route.verbs())
                .map(|verb| (existing, verb))
        })
    }

    /// Routes in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Route>> {
        self.routes.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    #[must_use]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Route count per hash key, sorted by key
    #[must_use]
    pub fn bucket_sizes(&self) -> Vec<(&str, usize)> {
        let mut sizes: Vec<_> = self
            .buckets
            .iter()
            .map(|(key, routes)| (key.as_str(), routes.len()))
            .collect();
        sizes.sort_unstable();
        sizes
    }
}

/// Hash keys a request path can match, without duplicates.
#[must_use]
pub fn probe_keys(parts: &PathParts<'_>) -> SmallVec<[String; 4]> {
    let n = parts.len();
    let mut keys = SmallVec::new();
    if let Some(first) = parts.first_folded() {
        keys.push(format!("{n}/{first}"));
        keys.push(format!("*/{first}"));
        // A literal `*` component would probe the wildcard buckets twice.
        if first != "*" {
            keys.push(format!("{n}/*"));
            keys.push("*/*".to_string());
        }
    } else {
        keys.push("0/*".to_string());
        keys.push("*/*".to_string());
    }
    keys
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::RouteDef;
    use crate::template::{parse, Validation};
    use crate::typed::RequestType;

    fn route(ordinal: usize, path: &str, verbs: Option<&str>) -> Arc<Route> {
        let template = parse(path, verbs, Validation::Enforce).unwrap();
        Arc::new(Route::new(
            ordinal,
            template,
            RequestType::dynamic("T"),
            &RouteDef::new(path.to_string()),
        ))
    }

    #[test]
    fn test_probe_keys() {
        let keys = probe_keys(&PathParts::parse("/Content/a"));
        assert_eq!(keys.as_slice(), ["2/content", "*/content", "2/*", "*/*"]);
        let keys = probe_keys(&PathParts::parse("/"));
        assert_eq!(keys.as_slice(), ["0/*", "*/*"]);
    }

    #[test]
    fn test_candidates_only_from_probed_buckets() {
        let mut table = RouteTable::new();
        table.insert(route(0, "/content/{Id}", None));
        table.insert(route(1, "/other/{Id}", None));
        table.insert(route(2, "/{Slug*}/content", None));
        table.insert(route(3, "/content/a/b", None));

        let parts = PathParts::parse("/content/7");
        let paths: Vec<_> = table.candidates_for(&parts).map(|r| r.path()).collect();
        assert_eq!(paths, ["/content/{Id}", "/{Slug*}/content"]);
        assert_eq!(table.bucket_count(), 4);
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn test_find_duplicate_ignores_variable_names() {
        let mut table = RouteTable::new();
        table.insert(route(0, "/users/{Id}", Some("GET,PUT")));

        let same = route(1, "/Users/{UserId}", Some("PUT"));
        let (existing, verb) = table.find_duplicate(&same).unwrap();
        assert_eq!(existing.path(), "/users/{Id}");
        assert_eq!(verb, "PUT");

        assert!(table.find_duplicate(&route(2, "/users/{Id}", Some("POST"))).is_none());
        assert!(table.find_duplicate(&route(3, "/users/{Id}/x", Some("GET"))).is_none());
    }

    #[test]
    fn test_bucket_sizes_sorted() {
        let mut table = RouteTable::new();
        table.insert(route(0, "/b", None));
        table.insert(route(1, "/a", None));
        table.insert(route(2, "/a", Some("GET")));
        assert_eq!(table.bucket_sizes(), [("1/a", 2), ("1/b", 1)]);
    }
}
