use std::any::Any;
use std::borrow::Cow;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use super::error::DispatchError;
use crate::router::{RouteMatch, Router, SharedRouter};
use crate::typed::RequestData;

/// Generate a unique request ID for tracing
#[must_use]
pub fn generate_request_id() -> String {
    Uuid::new_v4().to_string()
}

/// A resolved and hydrated request, ready for the service layer.
pub struct Dispatched {
    /// Correlation id carried in every log line for this request
    pub request_id: String,
    /// The winning route and its raw captures
    pub matched: RouteMatch,
    request: Box<dyn Any + Send>,
}

impl Dispatched {
    /// Name of the hydrated request type
    #[must_use]
    pub fn request_type(&self) -> &str {
        self.matched.request_type().name()
    }

    #[must_use]
    pub fn is<T: 'static>(&self) -> bool {
        self.request.is::<T>()
    }

    #[must_use]
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.request.downcast_ref::<T>()
    }

    /// Take the request out as a `T`.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::TypeMismatch`] when the route produced a
    /// different type.
    pub fn into_request<T: 'static>(self) -> Result<T, DispatchError> {
        let actual = self.request_type().to_string();
        self.request
            .downcast::<T>()
            .map(|request| *request)
            .map_err(|_| DispatchError::TypeMismatch {
                expected: std::any::type_name::<T>(),
                actual,
            })
    }
}

impl std::fmt::Debug for Dispatched {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatched")
            .field("request_id", &self.request_id)
            .field("route", &self.matched.route.path())
            .field("request_type", &self.request_type())
            .finish()
    }
}

/// Turns `(verb, path, query, form)` into a populated request object or a
/// structured error.
///
/// Holds the router through a [`SharedRouter`], so routes can be swapped while
/// dispatching continues; each dispatch works against one snapshot.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    router: Arc<SharedRouter>,
}

impl Dispatcher {
    #[must_use]
    pub fn new(router: Router) -> Self {
        Self {
            router: Arc::new(SharedRouter::new(router)),
        }
    }

    #[must_use]
    pub fn with_shared(router: Arc<SharedRouter>) -> Self {
        Self { router }
    }

    #[must_use]
    pub fn shared(&self) -> &Arc<SharedRouter> {
        &self.router
    }

    /// Resolve and hydrate one request.
    ///
    /// A query string left on `path_info` is parsed and applied before the
    /// query pairs in `data`.
    ///
    /// # Errors
    ///
    /// [`DispatchError::NoMatch`] when nothing matches (including unknown
    /// verbs), [`DispatchError::Binding`] when a value cannot be converted.
    pub fn dispatch(
        &self,
        verb: &str,
        path_info: &str,
        data: &RequestData,
    ) -> Result<Dispatched, DispatchError> {
        let request_id = generate_request_id();
        self.dispatch_with_request_id(verb, path_info, data, request_id)
    }

    /// [`dispatch`](Self::dispatch) with a caller-supplied correlation id.
    ///
    /// # Errors
    ///
    /// See [`dispatch`](Self::dispatch).
    pub fn dispatch_with_request_id(
        &self,
        verb: &str,
        path_info: &str,
        data: &RequestData,
        request_id: String,
    ) -> Result<Dispatched, DispatchError> {
        let router = self.router.load();

        let Some(matched) = router.resolve_verb(verb, path_info) else {
            return Err(DispatchError::NoMatch {
                verb: verb.to_string(),
                path: path_info.to_string(),
            });
        };

        let data = merge_inline_query(path_info, data);
        let request = match router.create_request(&matched, &data) {
            Ok(request) => request,
            Err(err) => {
                warn!(
                    request_id = %request_id,
                    route = %matched.route.path(),
                    field = %err.field,
                    value = %err.value,
                    error = %err,
                    "Request binding failed"
                );
                return Err(err.into());
            }
        };

        debug!(
            request_id = %request_id,
            route = %matched.route.path(),
            request_type = %matched.request_type().name(),
            "Request dispatched"
        );
        Ok(Dispatched {
            request_id,
            matched,
            request,
        })
    }

    /// Dispatch and take the request out as a `T`.
    ///
    /// # Errors
    ///
    /// See [`dispatch`](Self::dispatch); additionally
    /// [`DispatchError::TypeMismatch`] when the route targets another type.
    pub fn dispatch_as<T: 'static>(
        &self,
        verb: &str,
        path_info: &str,
        data: &RequestData,
    ) -> Result<T, DispatchError> {
        self.dispatch(verb, path_info, data)?.into_request::<T>()
    }
}

fn merge_inline_query<'d>(path_info: &str, data: &'d RequestData) -> Cow<'d, RequestData> {
    let Some((_, query)) = path_info.split_once('?') else {
        return Cow::Borrowed(data);
    };
    let query = query.split('#').next().unwrap_or_default();
    if query.is_empty() {
        return Cow::Borrowed(data);
    }
    let mut merged = RequestData::from_query_string(query);
    for (key, value) in data.query() {
        merged = merged.with_query(key.as_str(), value.as_str());
    }
    for (key, value) in data.form() {
        merged = merged.with_form(key.as_str(), value.as_str());
    }
    Cow::Owned(merged)
}
