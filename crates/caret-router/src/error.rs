//! Error taxonomy for route construction, matching, binding and reverse
//! routing.
//!
//! Construction-time errors ([`IllegalRoute`]) are fatal: a table containing
//! an invalid route is never activated. Request-time errors
//! ([`RouteNotFound`], [`BindingError`]) are recoverable and map onto 404 and
//! 400 style outcomes at the serving boundary. [`UnbindingError`] and
//! [`ReverseRouteError`] surface programming or configuration mistakes in
//! reverse routing and should fail loudly.

use thiserror::Error;

use crate::http::Method;

/// A route definition violated a construction-time invariant.
///
/// Carries the offending definition text so startup failures point at the
/// exact route that needs fixing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("illegal route `{definition}`: {reason}")]
pub struct IllegalRoute {
    /// The route definition that failed validation.
    pub definition: String,
    /// Why it was rejected.
    pub reason: String,
}

impl IllegalRoute {
    pub(crate) fn new(definition: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            definition: definition.into(),
            reason: reason.into(),
        }
    }
}

/// No route in the table was satisfied by the request.
///
/// Recoverable: callers map this onto a 404 outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no route for {method} {path}")]
pub struct RouteNotFound {
    pub method: Method,
    pub path: String,
}

/// A request value could not be converted to a declared parameter.
///
/// Recoverable: callers map this onto a 400 outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingError {
    /// No registered binder accepts the declared type.
    #[error("no parameter binder accepts type `{ty}`")]
    NoBinder { ty: String },
    /// The raw string does not parse as the declared type.
    #[error("invalid value `{value}` for parameter `{name}` of type `{ty}`")]
    Invalid {
        name: String,
        ty: String,
        value: String,
    },
    /// The parameter was found neither in the path nor in the query string.
    #[error("parameter `{name}` not found in path nor in query string")]
    Missing { name: String },
    /// The query string carries several values for a single-valued parameter.
    #[error("query string holds several values for parameter `{name}`")]
    MultipleValues { name: String },
    /// `bind_parameters` was called with a path the route does not match.
    #[error("route `{route}` is not satisfied by path `{path}`")]
    PathMismatch { route: String, path: String },
}

/// A typed value could not be rendered back to a URL-safe string.
///
/// Reverse routing is driven by application code, so this is a programming
/// error rather than a request failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnbindingError {
    /// No registered binder accepts the declared type.
    #[error("no parameter binder accepts type `{ty}`")]
    NoBinder { ty: String },
    /// No value was supplied for a parameter without a default.
    #[error("no value given for parameter `{name}`")]
    MissingArgument { name: String },
    /// The supplied value is not of the declared type.
    #[error("value for parameter `{name}` is not a `{ty}`")]
    TypeMismatch { name: String, ty: String },
}

/// Reverse lookup failed to resolve a unique route.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReverseRouteError {
    /// No route targets the given controller method.
    #[error("no route targets `{target}`")]
    NotFound { target: String },
    /// Several routes target the given controller method; reverse routing
    /// refuses to pick one silently.
    #[error("reverse routing `{target}` is ambiguous across {} routes", .matches.len())]
    Ambiguous {
        target: String,
        /// Rendered definitions of every candidate route.
        matches: Vec<String>,
    },
    #[error(transparent)]
    Unbinding(#[from] UnbindingError),
}
