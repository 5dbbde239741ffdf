//! Reverse routing: from a controller method and argument values back to a
//! concrete URL.
//!
//! The inverse of request matching. Lookup scans the route table for routes
//! targeting the given controller method with the given arity; anything but
//! exactly one candidate is an error, never a silent pick. The resolved
//! [`ReverseRoute`] then accumulates extra query parameters and a fragment
//! before rendering.

use std::collections::BTreeMap;
use std::fmt;

use crate::binder::{BoundParams, BoundValue, ParameterBinders};
use crate::error::ReverseRouteError;
use crate::http::{encode_component, Method};
use crate::table::RouteTable;

const DEFAULT_HTTP_PORT: u16 = 80;
const DEFAULT_HTTPS_PORT: u16 = 443;

/// Reverse lookup over a route table.
pub struct ReverseRoutes<'a> {
    table: &'a RouteTable,
    binders: &'a ParameterBinders,
}

impl<'a> ReverseRoutes<'a> {
    pub fn new(table: &'a RouteTable, binders: &'a ParameterBinders) -> Self {
        Self { table, binders }
    }

    /// Resolve the unique route targeting `controller.method_name` with the
    /// given argument values, in declared parameter order.
    pub fn route_to(
        &self,
        controller: &str,
        method_name: &str,
        args: Vec<BoundValue>,
    ) -> Result<ReverseRoute, ReverseRouteError> {
        let target = format!("{controller}.{method_name}({} args)", args.len());
        let candidates: Vec<_> = self
            .table
            .iter()
            .filter(|route| {
                route.controller() == controller
                    && route.controller_method() == method_name
                    && route.params().len() == args.len()
            })
            .collect();

        let route = match candidates.as_slice() {
            [] => return Err(ReverseRouteError::NotFound { target }),
            [route] => *route,
            _ => {
                return Err(ReverseRouteError::Ambiguous {
                    target,
                    matches: candidates.iter().map(|r| r.to_string()).collect(),
                })
            }
        };

        let mut named = BoundParams::with_capacity(args.len());
        for (param, value) in route.params().iter().zip(args) {
            named.insert(param.name(), value);
        }
        let uri = route.unbind_parameters(self.binders, &named)?;
        Ok(ReverseRoute::new(route.method().clone(), uri))
    }
}

/// A resolved reverse route: HTTP method, unbound URI, and fluent
/// accumulation of extra query parameters and a fragment identifier.
///
/// Appended query parameters are rendered sorted by key. Extra parameters
/// are additive only; the URI produced by unbinding is never rewritten.
#[derive(Debug, Clone)]
pub struct ReverseRoute {
    method: Method,
    uri: String,
    appended: BTreeMap<String, Vec<String>>,
    fragment: Option<String>,
}

impl ReverseRoute {
    pub(crate) fn new(method: Method, uri: String) -> Self {
        Self {
            method,
            uri,
            appended: BTreeMap::new(),
            fragment: None,
        }
    }

    /// The HTTP method of the resolved route.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Render the path, query string and fragment.
    pub fn uri(&self) -> String {
        let mut out = self.uri.clone();
        let mut separator = if out.contains('?') { '&' } else { '?' };
        for (key, values) in &self.appended {
            for value in values {
                out.push(separator);
                separator = '&';
                out.push_str(&encode_component(key));
                out.push('=');
                out.push_str(&encode_component(value));
            }
        }
        if let Some(fragment) = &self.fragment {
            out.push('#');
            out.push_str(fragment);
        }
        out
    }

    /// Append one extra query parameter.
    pub fn append_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.appended
            .entry(key.into())
            .or_default()
            .push(value.into());
        self
    }

    /// Append several values under one key.
    pub fn append_query_values<I, S>(mut self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.appended
            .entry(key.into())
            .or_default()
            .extend(values.into_iter().map(Into::into));
        self
    }

    /// Set the fragment identifier (`#fragment`).
    pub fn with_fragment(mut self, fragment: impl Into<String>) -> Self {
        self.fragment = Some(fragment.into());
        self
    }

    /// Render an absolute `http`/`https` URL. Host and port come from the
    /// caller; the router holds no network configuration.
    pub fn http_url(&self, secure: bool, host: &str, port: u16) -> String {
        self.absolute_url(if secure { "https" } else { "http" }, secure, host, port)
    }

    /// Render an absolute `ws`/`wss` URL.
    pub fn web_socket_url(&self, secure: bool, host: &str, port: u16) -> String {
        self.absolute_url(if secure { "wss" } else { "ws" }, secure, host, port)
    }

    fn absolute_url(&self, scheme: &str, secure: bool, host: &str, port: u16) -> String {
        let default_port = if secure {
            DEFAULT_HTTPS_PORT
        } else {
            DEFAULT_HTTP_PORT
        };
        if port == default_port {
            format!("{scheme}://{host}{}", self.uri())
        } else {
            format!("{scheme}://{host}:{port}{}", self.uri())
        }
    }
}

impl fmt::Display for ReverseRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri())
    }
}
