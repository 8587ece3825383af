use std::collections::HashMap;
use std::fmt;

use super::value::FromRouteValue;

/// How a member is exposed on the request type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    /// Bound through a setter; always bindable
    Property,
    /// Plain public field; bound only when public-field binding is enabled
    Field,
}

type Setter<T> = Box<dyn Fn(&mut T, &str) -> Result<(), String> + Send + Sync>;

/// One bindable member of a request type: name, kind, and converting setter.
pub struct Member<T> {
    name: String,
    kind: MemberKind,
    value_type: &'static str,
    setter: Setter<T>,
}

impl<T> Member<T> {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn kind(&self) -> MemberKind {
        self.kind
    }

    /// Label of the member's declared type
    #[must_use]
    pub fn value_type(&self) -> &'static str {
        self.value_type
    }

    /// Whether the member may be bound under the given options.
    #[must_use]
    pub fn is_bindable(&self, bind_public_fields: bool) -> bool {
        self.kind == MemberKind::Property || bind_public_fields
    }

    /// Convert `raw` and assign it on `target`.
    ///
    /// # Errors
    ///
    /// Returns a [`BindingError`] naming this member when conversion fails.
    pub fn assign(&self, target: &mut T, raw: &str, request_type: &str) -> Result<(), BindingError> {
        (self.setter)(target, raw).map_err(|reason| BindingError {
            request_type: request_type.to_string(),
            field: self.name.clone(),
            value: raw.to_string(),
            expected: self.value_type,
            reason,
        })
    }
}

impl<T> fmt::Debug for Member<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Member")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("value_type", &self.value_type)
            .finish()
    }
}

/// Explicit binding table for one request type.
///
/// Built once per type at registration time and shared by every route that
/// targets the type, so hydration is a table lookup instead of runtime
/// introspection.
///
/// ```
/// use restpath::typed::RequestDescriptor;
///
/// #[derive(Default)]
/// struct GetUser {
///     id: u64,
///     name: String,
/// }
///
/// let descriptor = RequestDescriptor::<GetUser>::new("GetUser")
///     .property("Id", |req, value: u64| req.id = value)
///     .property("Name", |req, value: String| req.name = value);
/// assert!(descriptor.member("id").is_some());
/// ```
pub struct RequestDescriptor<T> {
    type_name: String,
    members: Vec<Member<T>>,
    index: HashMap<String, usize>,
}

impl<T: 'static> RequestDescriptor<T> {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            members: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Register a member bound through `setter`.
    #[must_use]
    pub fn property<V, F>(self, name: &str, setter: F) -> Self
    where
        V: FromRouteValue + 'static,
        F: Fn(&mut T, V) + Send + Sync + 'static,
    {
        self.push::<V, F>(name, MemberKind::Property, setter)
    }

    /// Register a plain public field; only bound in public-field mode.
    #[must_use]
    pub fn field<V, F>(self, name: &str, setter: F) -> Self
    where
        V: FromRouteValue + 'static,
        F: Fn(&mut T, V) + Send + Sync + 'static,
    {
        self.push::<V, F>(name, MemberKind::Field, setter)
    }

    fn push<V, F>(mut self, name: &str, kind: MemberKind, setter: F) -> Self
    where
        V: FromRouteValue + 'static,
        F: Fn(&mut T, V) + Send + Sync + 'static,
    {
        let setter: Setter<T> = Box::new(move |target: &mut T, raw: &str| {
            let value = V::from_route_value(raw)?;
            setter(target, value);
            Ok(())
        });
        // A later registration under the same normalized name replaces the earlier one.
        self.index.insert(member_key(name), self.members.len());
        self.members.push(Member {
            name: name.to_string(),
            kind,
            value_type: V::type_label(),
            setter,
        });
        self
    }
}

impl<T> RequestDescriptor<T> {
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Look a member up by variable/query key, ignoring case and `_`/`-`.
    #[must_use]
    pub fn member(&self, name: &str) -> Option<&Member<T>> {
        self.lookup(name).map(|(_, member)| member)
    }

    pub(crate) fn lookup(&self, name: &str) -> Option<(usize, &Member<T>)> {
        let idx = *self.index.get(&member_key(name))?;
        self.members.get(idx).map(|member| (idx, member))
    }

    pub fn members(&self) -> impl Iterator<Item = &Member<T>> {
        self.members.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl<T> fmt::Debug for RequestDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestDescriptor")
            .field("type_name", &self.type_name)
            .field("members", &self.members)
            .finish()
    }
}

/// Normalized member key: lowercase with `_` and `-` removed, so that
/// `{UniqueId}`, `unique_id` and `unique-id` all name the same member.
#[must_use]
pub fn member_key(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

/// A captured or supplied value could not be converted to its member's type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingError {
    /// Request type being hydrated
    pub request_type: String,
    /// Member the value was destined for
    pub field: String,
    /// Raw value as received
    pub value: String,
    /// Declared type of the member
    pub expected: &'static str,
    /// Converter message
    pub reason: String,
}

impl fmt::Display for BindingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cannot bind '{}' to {}.{} ({}): {}",
            self.value, self.request_type, self.field, self.expected, self.reason
        )
    }
}

impl std::error::Error for BindingError {}
