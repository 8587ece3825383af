use std::fmt;

/// Definition-time error raised while parsing or registering a route template.
///
/// Returned by [`parse`](super::parse) and by the router builder. Unless
/// route validation is skipped in [`RouterConfig`](crate::config::RouterConfig),
/// any of these aborts registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefinitionError {
    /// The template does not begin with `/`
    MissingLeadingSlash {
        /// The offending template
        template: String,
    },
    /// The template embeds query-string syntax (`?`) in its path portion
    QueryStringInPath {
        /// The offending template
        template: String,
    },
    /// A variable (or another wildcard) follows a wildcard segment
    VariableAfterWildcard {
        /// The offending template
        template: String,
        /// The wildcard that must stay the last variable
        wildcard: String,
        /// The variable found after it
        variable: String,
    },
    /// Unbalanced or misplaced braces inside a component
    MalformedVariable {
        /// The offending template
        template: String,
        /// The component that failed to parse
        component: String,
    },
    /// `{}` or `{*}`
    EmptyVariableName {
        /// The offending template
        template: String,
    },
    /// The same variable name is bound twice in one template
    DuplicateVariable {
        /// The offending template
        template: String,
        /// The repeated variable
        variable: String,
    },
    /// A `{Name*}` wildcard inside a dotted hybrid component
    WildcardInComposite {
        /// The offending template
        template: String,
        /// The hybrid component
        component: String,
    },
    /// The verbs string names something that is not an HTTP method
    InvalidVerb {
        /// The offending template
        template: String,
        /// The verb that failed to parse
        verb: String,
    },
    /// A template variable has no bindable member on the request type
    UnknownMember {
        /// The offending template
        template: String,
        /// The unbound variable
        variable: String,
        /// Request type the route targets
        request_type: String,
    },
    /// Same verb and same segment shape already registered
    DuplicateRoute {
        /// The template being registered
        template: String,
        /// The template registered first
        existing: String,
        /// The overlapping verb (`ANY` when both accept any verb)
        verb: String,
    },
}

impl DefinitionError {
    /// Template string the error was raised for
    #[must_use]
    pub fn template(&self) -> &str {
        match self {
            DefinitionError::MissingLeadingSlash { template }
            | DefinitionError::QueryStringInPath { template }
            | DefinitionError::VariableAfterWildcard { template, .. }
            | DefinitionError::MalformedVariable { template, .. }
            | DefinitionError::EmptyVariableName { template }
            | DefinitionError::DuplicateVariable { template, .. }
            | DefinitionError::WildcardInComposite { template, .. }
            | DefinitionError::InvalidVerb { template, .. }
            | DefinitionError::UnknownMember { template, .. }
            | DefinitionError::DuplicateRoute { template, .. } => template,
        }
    }
}

impl fmt::Display for DefinitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefinitionError::MissingLeadingSlash { template } => {
                write!(f, "route '{template}' must start with a '/'")
            }
            DefinitionError::QueryStringInPath { template } => {
                write!(
                    f,
                    "route '{template}' must not contain a query string ('?'); \
                    query values are bound from the request data instead"
                )
            }
            DefinitionError::VariableAfterWildcard {
                template,
                wildcard,
                variable,
            } => {
                write!(
                    f,
                    "route '{template}' declares variable '{{{variable}}}' after wildcard \
                    '{{{wildcard}*}}'; only literal components may follow a wildcard"
                )
            }
            DefinitionError::MalformedVariable {
                template,
                component,
            } => {
                write!(
                    f,
                    "route '{template}' has a malformed variable in component '{component}'"
                )
            }
            DefinitionError::EmptyVariableName { template } => {
                write!(f, "route '{template}' declares a variable without a name")
            }
            DefinitionError::DuplicateVariable { template, variable } => {
                write!(
                    f,
                    "route '{template}' declares variable '{{{variable}}}' more than once"
                )
            }
            DefinitionError::WildcardInComposite {
                template,
                component,
            } => {
                write!(
                    f,
                    "route '{template}' uses a wildcard inside hybrid component '{component}'"
                )
            }
            DefinitionError::InvalidVerb { template, verb } => {
                write!(f, "route '{template}' names invalid HTTP verb '{verb}'")
            }
            DefinitionError::UnknownMember {
                template,
                variable,
                request_type,
            } => {
                write!(
                    f,
                    "route '{template}' binds '{{{variable}}}' but '{request_type}' has no \
                    member with that name"
                )
            }
            DefinitionError::DuplicateRoute {
                template,
                existing,
                verb,
            } => {
                write!(
                    f,
                    "route '{template}' duplicates '{existing}' for verb {verb}"
                )
            }
        }
    }
}

impl std::error::Error for DefinitionError {}
