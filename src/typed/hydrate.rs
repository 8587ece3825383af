use smallvec::SmallVec;
use std::any::{Any, TypeId};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use super::descriptor::{member_key, BindingError, RequestDescriptor};
use crate::config::RouterConfig;
use crate::router::{Capture, RouteDef};
use crate::template::is_ignored;

/// A request message type the router can hydrate.
///
/// Usually derived with `#[derive(RestRequest)]`, which also turns
/// `#[route(..)]` attributes into [`routes`](RestRequest::routes).
pub trait RestRequest: Default + Send + Sized + 'static {
    /// Binding table for the type; called once per type at registration.
    fn descriptor() -> RequestDescriptor<Self>;

    /// Routes declared on the type.
    fn routes() -> Vec<RouteDef> {
        Vec::new()
    }
}

/// Options that change what the hydrator may bind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BindOptions {
    /// Bind members declared as plain fields (compatibility mode)
    pub bind_public_fields: bool,
}

impl From<&RouterConfig> for BindOptions {
    fn from(config: &RouterConfig) -> Self {
        Self {
            bind_public_fields: config.bind_public_fields,
        }
    }
}

/// Query-string and form pairs supplied with a request.
///
/// Query pairs are applied before form pairs, so a form value wins over a
/// query value with the same key. Path captures win over both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestData {
    query: Vec<(String, String)>,
    form: Vec<(String, String)>,
}

impl RequestData {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an `a=1&b=2` query string (percent-decoded, `+` as space).
    #[must_use]
    pub fn from_query_string(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self {
            query: url::form_urlencoded::parse(query.as_bytes())
                .into_owned()
                .collect(),
            form: Vec::new(),
        }
    }

    /// Build from the map-shaped inputs the HTTP layer usually holds.
    #[must_use]
    pub fn from_maps(query: &HashMap<String, String>, form: &HashMap<String, String>) -> Self {
        Self {
            query: query.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
            form: form.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        }
    }

    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn with_form(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.form.push((key.into(), value.into()));
        self
    }

    /// Append pairs from an `application/x-www-form-urlencoded` body.
    pub fn extend_form_urlencoded(&mut self, body: &[u8]) {
        self.form
            .extend(url::form_urlencoded::parse(body).into_owned());
    }

    #[must_use]
    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    #[must_use]
    pub fn form(&self) -> &[(String, String)] {
        &self.form
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.query.is_empty() && self.form.is_empty()
    }

    /// Query pairs followed by form pairs.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.query
            .iter()
            .chain(self.form.iter())
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Type-erased hydrator stored on each route.
pub trait RequestBinder: Send + Sync {
    /// Name used in logs, listings and errors
    fn type_name(&self) -> &str;

    /// Whether a path variable named `variable` has somewhere to go.
    fn accepts(&self, variable: &str, options: BindOptions) -> bool;

    /// Allocate a new request and bind captures plus query/form data onto it.
    ///
    /// # Errors
    ///
    /// Returns a [`BindingError`] for the first value that fails conversion.
    fn bind(
        &self,
        captures: &[Capture],
        data: &RequestData,
        options: BindOptions,
    ) -> Result<Box<dyn Any + Send>, BindingError>;
}

impl<T: Default + Send + 'static> RequestDescriptor<T> {
    /// Build a `T` from path captures and request data.
    ///
    /// Members bound from the path are not overwritten by query or form
    /// values; members left unbound keep `T::default()`.
    ///
    /// # Errors
    ///
    /// Returns a [`BindingError`] for the first value that fails conversion.
    pub fn hydrate(
        &self,
        captures: &[Capture],
        data: &RequestData,
        options: BindOptions,
    ) -> Result<T, BindingError> {
        let mut request = T::default();
        let mut from_path: SmallVec<[usize; 8]> = SmallVec::new();

        for capture in captures {
            if is_ignored(&capture.name) {
                continue;
            }
            let Some(value) = capture.value.as_deref() else {
                continue;
            };
            let Some((idx, member)) = self.lookup(&capture.name) else {
                continue;
            };
            if !member.is_bindable(options.bind_public_fields) {
                continue;
            }
            member.assign(&mut request, value, self.type_name())?;
            from_path.push(idx);
        }

        for (key, value) in data.pairs() {
            let Some((idx, member)) = self.lookup(key) else {
                continue;
            };
            if from_path.contains(&idx) || !member.is_bindable(options.bind_public_fields) {
                continue;
            }
            member.assign(&mut request, value, self.type_name())?;
        }

        Ok(request)
    }
}

impl<T: Default + Send + 'static> RequestBinder for RequestDescriptor<T> {
    fn type_name(&self) -> &str {
        RequestDescriptor::type_name(self)
    }

    fn accepts(&self, variable: &str, options: BindOptions) -> bool {
        is_ignored(variable)
            || self
                .member(variable)
                .is_some_and(|m| m.is_bindable(options.bind_public_fields))
    }

    fn bind(
        &self,
        captures: &[Capture],
        data: &RequestData,
        options: BindOptions,
    ) -> Result<Box<dyn Any + Send>, BindingError> {
        let request = self.hydrate(captures, data, options)?;
        Ok(Box::new(request))
    }
}

/// Request with no Rust type behind it: every value lands in an ordered map.
///
/// Used for routes loaded from a manifest, where only a type name is known.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DynamicRequest {
    /// Request type name the route was registered with
    pub type_name: String,
    /// Bound values keyed by the name they arrived under
    pub values: BTreeMap<String, String>,
}

impl DynamicRequest {
    /// Value bound under `name`, ignoring case and `_`/`-`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        let key = member_key(name);
        self.values
            .iter()
            .find(|(k, _)| member_key(k) == key)
            .map(|(_, v)| v.as_str())
    }
}

struct DynamicBinder {
    name: Arc<str>,
}

impl RequestBinder for DynamicBinder {
    fn type_name(&self) -> &str {
        &self.name
    }

    fn accepts(&self, _variable: &str, _options: BindOptions) -> bool {
        true
    }

    fn bind(
        &self,
        captures: &[Capture],
        data: &RequestData,
        _options: BindOptions,
    ) -> Result<Box<dyn Any + Send>, BindingError> {
        let mut request = DynamicRequest {
            type_name: self.name.to_string(),
            values: BTreeMap::new(),
        };
        let mut from_path: Vec<String> = Vec::new();

        for capture in captures {
            if is_ignored(&capture.name) {
                continue;
            }
            if let Some(value) = &capture.value {
                request
                    .values
                    .insert(capture.name.to_string(), value.clone());
                from_path.push(member_key(&capture.name));
            }
        }

        for (key, value) in data.pairs() {
            let normalized = member_key(key);
            if from_path.contains(&normalized) {
                continue;
            }
            request
                .values
                .retain(|existing, _| member_key(existing) != normalized);
            request.values.insert(key.to_string(), value.to_string());
        }

        Ok(Box::new(request))
    }
}

/// The request type a route targets: its name plus the binder that builds it.
#[derive(Clone)]
pub struct RequestType {
    name: Arc<str>,
    type_id: TypeId,
    binder: Arc<dyn RequestBinder>,
}

impl RequestType {
    /// Build the binding table for `T`.
    #[must_use]
    pub fn of<T: RestRequest>() -> Self {
        Self::from_descriptor(T::descriptor())
    }

    #[must_use]
    pub fn from_descriptor<T: Default + Send + 'static>(descriptor: RequestDescriptor<T>) -> Self {
        Self {
            name: Arc::from(descriptor.type_name()),
            type_id: TypeId::of::<T>(),
            binder: Arc::new(descriptor),
        }
    }

    /// An untyped request type hydrated into [`DynamicRequest`].
    #[must_use]
    pub fn dynamic(name: &str) -> Self {
        let name: Arc<str> = Arc::from(name);
        Self {
            name: Arc::clone(&name),
            type_id: TypeId::of::<DynamicRequest>(),
            binder: Arc::new(DynamicBinder { name }),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether hydration produces a `T`.
    #[must_use]
    pub fn is<T: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    #[must_use]
    pub fn binder(&self) -> &dyn RequestBinder {
        self.binder.as_ref()
    }
}

impl fmt::Debug for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestType")
            .field("name", &self.name)
            .finish()
    }
}
