use http::StatusCode;
use std::fmt;

use crate::typed::BindingError;

/// Per-request failure returned by the [`Dispatcher`](super::Dispatcher).
///
/// Never fatal: the HTTP layer turns it into a client response via
/// [`status`](DispatchError::status).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// No route accepts the verb and path
    NoMatch {
        /// Request verb as received
        verb: String,
        /// Request path as received
        path: String,
    },
    /// A value could not be converted for the matched request type
    Binding(BindingError),
    /// The caller asked for a request type the matched route does not produce
    TypeMismatch {
        /// Type the caller expected
        expected: &'static str,
        /// Request type the route targets
        actual: String,
    },
}

impl DispatchError {
    /// HTTP status for the error response
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            DispatchError::NoMatch { .. } => StatusCode::NOT_FOUND,
            DispatchError::Binding(_) => StatusCode::BAD_REQUEST,
            DispatchError::TypeMismatch { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::NoMatch { verb, path } => {
                write!(f, "no route matches {verb} {path}")
            }
            DispatchError::Binding(err) => write!(f, "{err}"),
            DispatchError::TypeMismatch { expected, actual } => {
                write!(f, "route produces {actual}, not {expected}")
            }
        }
    }
}

impl std::error::Error for DispatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DispatchError::Binding(err) => Some(err),
            _ => None,
        }
    }
}

impl From<BindingError> for DispatchError {
    fn from(err: BindingError) -> Self {
        DispatchError::Binding(err)
    }
}
