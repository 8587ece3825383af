//! Resolver and registration.
//!
//! Registration happens once through [`RouterBuilder`]; the resulting
//! [`Router`] is immutable and safe to share across threads. Resolution
//! probes at most four buckets, matches every candidate and keeps the best:
//! highest score, then highest priority, then earliest registration.

use http::Method;
use std::any::{Any, TypeId};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::matcher::{match_route, Captures, MatchCandidate, PathParts};
use super::route::{Route, RouteDef};
use super::table::RouteTable;
use crate::config::RouterConfig;
use crate::template::{parse, parse_method, DefinitionError};
use crate::typed::{BindOptions, BindingError, RequestData, RequestType, RestRequest};

const SLOW_RESOLVE: Duration = Duration::from_millis(1);

/// Result of resolving a request to a route.
#[derive(Debug, Clone)]
pub struct RouteMatch {
    /// The winning route
    pub route: Arc<Route>,
    /// Its specificity score for this request
    pub score: i64,
    /// Raw captured values in segment order
    pub captures: Captures,
}

impl RouteMatch {
    /// Captured value for `name` (case-insensitive).
    ///
    /// Returns `None` for unknown names and for a wildcard that absorbed
    /// nothing.
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.captures
            .iter()
            .rfind(|c| c.name.eq_ignore_ascii_case(name))
            .and_then(|c| c.value.as_deref())
    }

    /// Captures as owned pairs; absent wildcard values are skipped.
    #[must_use]
    pub fn captures_map(&self) -> HashMap<String, String> {
        self.captures
            .iter()
            .filter_map(|c| Some((c.name.to_string(), c.value.clone()?)))
            .collect()
    }

    #[must_use]
    pub fn request_type(&self) -> &RequestType {
        self.route.request_type()
    }
}

impl From<MatchCandidate> for RouteMatch {
    fn from(candidate: MatchCandidate) -> Self {
        Self {
            route: candidate.route,
            score: candidate.score,
            captures: candidate.captures,
        }
    }
}

/// Immutable route table plus the configuration it was built with.
#[derive(Debug, Clone)]
pub struct Router {
    table: RouteTable,
    config: RouterConfig,
}

impl Router {
    #[must_use]
    pub fn builder(config: RouterConfig) -> RouterBuilder {
        RouterBuilder::new(config)
    }

    #[must_use]
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Routes in registration order
    pub fn routes(&self) -> impl Iterator<Item = &Arc<Route>> {
        self.table.iter()
    }

    #[must_use]
    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Resolve a request to its most specific route.
    ///
    /// `path_info` may carry a query string; it is ignored for matching.
    #[must_use]
    pub fn resolve(&self, verb: &Method, path_info: &str) -> Option<RouteMatch> {
        debug!(verb = %verb, path = %path_info, "Route match attempt");
        let start = Instant::now();

        let parts = PathParts::parse(path_info);
        let best = best_match(self.table.candidates_for(&parts), verb, &parts);
        let elapsed = start.elapsed();

        match best {
            Some(candidate) => {
                if elapsed > SLOW_RESOLVE {
                    warn!(
                        verb = %verb,
                        path = %path_info,
                        route = %candidate.route.path(),
                        duration_us = elapsed.as_micros(),
                        "Slow route resolution detected"
                    );
                } else {
                    debug!(
                        verb = %verb,
                        path = %path_info,
                        route = %candidate.route.path(),
                        request_type = %candidate.route.request_type().name(),
                        score = candidate.score,
                        duration_us = elapsed.as_micros(),
                        "Route matched"
                    );
                }
                Some(candidate.into())
            }
            None => {
                warn!(
                    verb = %verb,
                    path = %path_info,
                    duration_us = elapsed.as_micros(),
                    "No route matched"
                );
                None
            }
        }
    }

    /// [`resolve`](Self::resolve) with a verb string; unknown verbs never match.
    #[must_use]
    pub fn resolve_verb(&self, verb: &str, path_info: &str) -> Option<RouteMatch> {
        match parse_method(verb) {
            Some(method) => self.resolve(&method, path_info),
            None => {
                warn!(verb = %verb, path = %path_info, "Unparseable request verb");
                None
            }
        }
    }

    /// Every matching route, best first.
    #[must_use]
    pub fn resolve_all(&self, verb: &Method, path_info: &str) -> Vec<RouteMatch> {
        let parts = PathParts::parse(path_info);
        let mut matches: Vec<MatchCandidate> = self
            .table
            .candidates_for(&parts)
            .filter_map(|route| match_route(route, verb, &parts))
            .collect();
        matches.sort_by(rank_order);
        matches.into_iter().map(RouteMatch::from).collect()
    }

    /// Hydrate the matched route's request type.
    ///
    /// # Errors
    ///
    /// Returns a [`BindingError`] when a captured or supplied value cannot be
    /// converted to its member's type.
    pub fn create_request(
        &self,
        matched: &RouteMatch,
        data: &RequestData,
    ) -> Result<Box<dyn Any + Send>, BindingError> {
        matched
            .route
            .request_type()
            .binder()
            .bind(&matched.captures, data, BindOptions::from(&self.config))
    }
}

/// Best-first ordering: score desc, priority desc, registration asc.
fn rank_order(a: &MatchCandidate, b: &MatchCandidate) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| b.route.priority().cmp(&a.route.priority()))
        .then_with(|| a.route.ordinal().cmp(&b.route.ordinal()))
}

fn best_match<'r>(
    candidates: impl Iterator<Item = &'r Arc<Route>>,
    verb: &Method,
    parts: &PathParts<'_>,
) -> Option<MatchCandidate> {
    candidates
        .filter_map(|route| match_route(route, verb, parts))
        .min_by(rank_order)
}

/// Collects routes at startup and produces an immutable [`Router`].
///
/// Definition errors abort registration unless the config skips route
/// validation, in which case they are logged and the route is kept.
#[derive(Debug)]
pub struct RouterBuilder {
    config: RouterConfig,
    table: RouteTable,
    typed: HashMap<TypeId, RequestType>,
    dynamic: HashMap<String, RequestType>,
}

impl RouterBuilder {
    #[must_use]
    pub fn new(config: RouterConfig) -> Self {
        Self {
            config,
            table: RouteTable::new(),
            typed: HashMap::new(),
            dynamic: HashMap::new(),
        }
    }

    /// Register every route `T` declares through [`RestRequest::routes`].
    ///
    /// # Errors
    ///
    /// Returns the first [`DefinitionError`] hit.
    pub fn register<T: RestRequest>(mut self) -> Result<Self, DefinitionError> {
        let routes = T::routes();
        if routes.is_empty() {
            warn!(request_type = std::any::type_name::<T>(), "Request type declares no routes");
        }
        for def in routes {
            self = self.add_route_def::<T>(def)?;
        }
        Ok(self)
    }

    /// Register one template for `T`; `verbs` is `None` for any verb.
    ///
    /// # Errors
    ///
    /// Returns a [`DefinitionError`] for an invalid or conflicting template.
    pub fn add_route<T: RestRequest>(
        self,
        path: &str,
        verbs: Option<&str>,
    ) -> Result<Self, DefinitionError> {
        let mut def = RouteDef::new(path.to_string());
        if let Some(verbs) = verbs {
            def = def.verbs(verbs.to_string());
        }
        self.add_route_def::<T>(def)
    }

    /// Register a full route definition for `T`.
    ///
    /// # Errors
    ///
    /// Returns a [`DefinitionError`] for an invalid or conflicting template.
    pub fn add_route_def<T: RestRequest>(mut self, def: RouteDef) -> Result<Self, DefinitionError> {
        let request_type = self
            .typed
            .entry(TypeId::of::<T>())
            .or_insert_with(RequestType::of::<T>)
            .clone();
        self.insert(def, request_type)?;
        Ok(self)
    }

    /// Register a route whose request hydrates into a
    /// [`DynamicRequest`](crate::typed::DynamicRequest) named `type_name`.
    ///
    /// # Errors
    ///
    /// Returns a [`DefinitionError`] for an invalid or conflicting template.
    pub fn add_dynamic(mut self, type_name: &str, def: RouteDef) -> Result<Self, DefinitionError> {
        let request_type = self
            .dynamic
            .entry(type_name.to_string())
            .or_insert_with(|| RequestType::dynamic(type_name))
            .clone();
        self.insert(def, request_type)?;
        Ok(self)
    }

    /// Register a route for an already-built [`RequestType`].
    ///
    /// # Errors
    ///
    /// Returns a [`DefinitionError`] for an invalid or conflicting template.
    pub fn add_route_with(
        mut self,
        def: RouteDef,
        request_type: RequestType,
    ) -> Result<Self, DefinitionError> {
        self.insert(def, request_type)?;
        Ok(self)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    #[must_use]
    pub fn build(self) -> Router {
        info!(
            routes_count = self.table.len(),
            buckets_count = self.table.bucket_count(),
            skip_route_validation = self.config.skip_route_validation,
            "Routing table loaded"
        );
        Router {
            table: self.table,
            config: self.config,
        }
    }

    fn insert(&mut self, def: RouteDef, request_type: RequestType) -> Result<(), DefinitionError> {
        let validation = self.config.validation();
        let template = parse(&def.path, def.verbs.as_deref(), validation)?;

        let options = BindOptions::from(&self.config);
        let unbound = template
            .variables()
            .into_iter()
            .find(|variable| !request_type.binder().accepts(variable, options))
            .map(str::to_string);
        if let Some(variable) = unbound {
            self.reject(DefinitionError::UnknownMember {
                template: def.path.to_string(),
                variable,
                request_type: request_type.name().to_string(),
            })?;
        }

        let route = Route::new(self.table.len(), template, request_type, &def);
        if let Some((existing, verb)) = self.table.find_duplicate(&route) {
            let err = DefinitionError::DuplicateRoute {
                template: def.path.to_string(),
                existing: existing.path().to_string(),
                verb,
            };
            self.reject(err)?;
        }

        debug!(
            route = %route,
            hash_key = %route.first_match_hash_key(),
            priority = route.priority(),
            "Route registered"
        );
        self.table.insert(Arc::new(route));
        Ok(())
    }

    /// Fail with `err`, or only log it when validation is skipped.
    fn reject(&self, err: DefinitionError) -> Result<(), DefinitionError> {
        if self.config.validation().is_enforced() {
            return Err(err);
        }
        warn!(template = %err.template(), error = %err, "Route validation skipped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typed::{DynamicRequest, RequestDescriptor};

    #[derive(Debug, Default)]
    struct Content {
        version: String,
        slug: String,
    }

    impl RestRequest for Content {
        fn descriptor() -> RequestDescriptor<Self> {
            RequestDescriptor::new("Content")
                .property("Version", |r: &mut Self, v: String| r.version = v)
                .property("Slug", |r: &mut Self, v: String| r.slug = v)
        }
    }

    fn router(routes: &[(&str, Option<&str>)]) -> Router {
        let mut builder = Router::builder(RouterConfig::default());
        for (path, verbs) in routes {
            builder = builder.add_route::<Content>(path, *verbs).unwrap();
        }
        builder.build()
    }

    fn winner(router: &Router, verb: Method, path: &str) -> String {
        router
            .resolve(&verb, path)
            .map(|m| m.route.path().to_string())
            .unwrap_or_default()
    }

    #[test]
    fn test_literal_beats_variable_beats_wildcard() {
        let r = router(&[
            ("/content/{Slug*}", Some("GET")),
            ("/content/{Version}", Some("GET")),
            ("/content/literal", Some("GET")),
        ]);
        assert_eq!(winner(&r, Method::GET, "/content/literal"), "/content/literal");
        assert_eq!(winner(&r, Method::GET, "/content/v2"), "/content/{Version}");
        assert_eq!(winner(&r, Method::GET, "/content/a/b"), "/content/{Slug*}");
    }

    #[test]
    fn test_verb_specific_beats_any() {
        let r = router(&[("/content", None), ("/content", Some("GET"))]);
        assert_eq!(
            r.resolve(&Method::GET, "/content").unwrap().route.ordinal(),
            1
        );
        assert_eq!(
            r.resolve(&Method::POST, "/content").unwrap().route.ordinal(),
            0
        );
    }

    #[test]
    fn test_equal_scores_fall_back_to_priority_then_order() {
        let r = Router::builder(RouterConfig::default())
            .add_dynamic("Item", RouteDef::new("/items/{Id}").verbs("GET"))
            .unwrap()
            .add_dynamic("AnyItem", RouteDef::new("/items/{Key}"))
            .unwrap()
            .add_dynamic("Section", RouteDef::new("/{Section}/1").verbs("GET").priority(5))
            .unwrap()
            .build();

        let all = r.resolve_all(&Method::GET, "/items/1");
        let names: Vec<_> = all.iter().map(|m| m.request_type().name()).collect();
        assert_eq!(names, ["Section", "Item", "AnyItem"]);
        assert_eq!(all[0].score, all[1].score);
    }

    #[test]
    fn test_registration_order_breaks_exact_ties() {
        let r = Router::builder(RouterConfig::default())
            .add_dynamic("A", RouteDef::new("/x/{Id}").verbs("GET"))
            .unwrap()
            .add_dynamic("B", RouteDef::new("/{Section}/1").verbs("GET"))
            .unwrap()
            .build();
        for _ in 0..10 {
            let m = r.resolve(&Method::GET, "/x/1").unwrap();
            assert_eq!(m.request_type().name(), "A");
        }
    }

    #[test]
    fn test_definition_error_aborts_registration() {
        let err = Router::builder(RouterConfig::default())
            .add_route::<Content>("/content/{Slug*}/{Version}", None)
            .unwrap_err();
        assert!(matches!(err, DefinitionError::VariableAfterWildcard { .. }));
    }

    #[test]
    fn test_unknown_member_is_rejected() {
        let err = Router::builder(RouterConfig::default())
            .add_route::<Content>("/content/{Missing}", None)
            .unwrap_err();
        assert!(matches!(err, DefinitionError::UnknownMember { ref variable, .. } if variable == "Missing"));
    }

    #[test]
    fn test_duplicate_route_is_rejected() {
        let err = Router::builder(RouterConfig::default())
            .add_route::<Content>("/content/{Version}", Some("GET"))
            .unwrap()
            .add_route::<Content>("/Content/{Slug}", Some("GET,POST"))
            .unwrap_err();
        assert!(matches!(err, DefinitionError::DuplicateRoute { ref verb, .. } if verb == "GET"));
    }

    #[test]
    fn test_skip_validation_keeps_legacy_routes() {
        let config = RouterConfig {
            skip_route_validation: true,
            ..RouterConfig::default()
        };
        let r = Router::builder(config)
            .add_route::<Content>("content/{Slug*}/{Version}", None)
            .unwrap()
            .add_route::<Content>("/content/{Missing}", None)
            .unwrap()
            .build();
        assert_eq!(r.len(), 2);
        let m = r.resolve(&Method::GET, "/content/a/b/v1").unwrap();
        assert_eq!(m.get("slug"), Some("a/b"));
        assert_eq!(m.get("version"), Some("v1"));
    }

    #[test]
    fn test_resolve_verb_string() {
        let r = router(&[("/content", Some("PUT"))]);
        assert!(r.resolve_verb("put", "/content").is_some());
        assert!(r.resolve_verb("PUT", "/content").is_some());
        assert!(r.resolve_verb("GET", "/content").is_none());
        assert!(r.resolve_verb("", "/content").is_none());
    }

    #[test]
    fn test_create_request() {
        let r = router(&[("/content/{Version}/{Slug*}", None)]);
        let m = r.resolve(&Method::GET, "/content/V1/a/b").unwrap();
        let req = r
            .create_request(&m, &RequestData::new())
            .unwrap()
            .downcast::<Content>()
            .unwrap();
        assert_eq!(req.version, "V1");
        assert_eq!(req.slug, "a/b");
    }

    #[test]
    fn test_dynamic_request_type_is_shared_per_name() {
        let r = Router::builder(RouterConfig::default())
            .add_dynamic("Page", RouteDef::new("/pages/{Id}").verbs("GET"))
            .unwrap()
            .add_dynamic("Page", RouteDef::new("/pages").verbs("GET"))
            .unwrap()
            .build();
        let m = r.resolve(&Method::GET, "/pages/3").unwrap();
        let req = r
            .create_request(&m, &RequestData::new())
            .unwrap()
            .downcast::<DynamicRequest>()
            .unwrap();
        assert_eq!(req.type_name, "Page");
        assert_eq!(req.get("id"), Some("3"));
        assert!(m.request_type().is::<DynamicRequest>());
    }

    #[test]
    fn test_bucketed_resolution_equals_exhaustive() {
        let templates = [
            "/",
            "/content",
            "/content/literal",
            "/content/{Version}",
            "/content/{Slug*}",
            "/content/{Slug*}/literal",
            "/{Slug*}/content",
            "/{Section}/content",
            "/{Section}/{Id}",
            "/files/{Name}.{Ext}",
            "/{Name}.json",
            "/{All*}",
            "/a/b/c",
            "/a/{B}/c/{Rest*}",
        ];
        let mut builder = Router::builder(RouterConfig::default());
        for (i, template) in templates.iter().enumerate() {
            builder = builder
                .add_dynamic(&format!("T{i}"), RouteDef::new(template.to_string()))
                .unwrap();
        }
        let r = builder.build();

        let paths = [
            "/",
            "/content",
            "/CONTENT/literal",
            "/content/v1",
            "/content/a/b/literal",
            "/x/content",
            "/x/y",
            "/files/a.txt",
            "/report.json",
            "/a/b/c",
            "/a/z/c/d/e",
            "/one/two/three/four",
        ];
        for path in paths {
            let parts = PathParts::parse(path);
            let bucketed: Vec<_> = r
                .resolve_all(&Method::GET, path)
                .into_iter()
                .map(|m| m.route.ordinal())
                .collect();
            let mut exhaustive: Vec<MatchCandidate> = r
                .routes()
                .filter_map(|route| match_route(route, &Method::GET, &parts))
                .collect();
            exhaustive.sort_by(rank_order);
            let exhaustive: Vec<_> = exhaustive.iter().map(|c| c.route.ordinal()).collect();
            assert_eq!(bucketed, exhaustive, "path {path}");
            assert!(!bucketed.is_empty(), "path {path}");
        }
    }
}
