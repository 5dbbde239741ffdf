//! Request-side collaborator types: the HTTP method, decoded query strings
//! and URL encoding helpers.
//!
//! The routing core never owns a transport. Callers hand it a method, an
//! already-decoded request path and a [`QueryString`]; everything else about
//! the request stays with the serving layer.

use std::borrow::Cow;

use crate::error::BindingError;

pub use http::Method;

/// Resolve a route-definition method token against the standard HTTP
/// method set.
pub(crate) fn parse_method(token: &str) -> Option<Method> {
    match token {
        "GET" => Some(Method::GET),
        "HEAD" => Some(Method::HEAD),
        "POST" => Some(Method::POST),
        "PUT" => Some(Method::PUT),
        "DELETE" => Some(Method::DELETE),
        "OPTIONS" => Some(Method::OPTIONS),
        "PATCH" => Some(Method::PATCH),
        "TRACE" => Some(Method::TRACE),
        "CONNECT" => Some(Method::CONNECT),
        _ => None,
    }
}

/// Decoded query string parameters, declaration order preserved.
///
/// A key may appear several times; binding a parameter from a repeated key is
/// rejected (see [`QueryString::single_value`]).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryString {
    params: Vec<(String, String)>,
}

impl QueryString {
    /// An empty query string.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a raw query string such as `a=b&c=d`. A leading `?` is
    /// tolerated. Keys and values are percent-decoded.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.strip_prefix('?').unwrap_or(raw);
        let mut params = Vec::new();
        for pair in raw.split('&') {
            if pair.is_empty() {
                continue;
            }
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            params.push((decode(key), decode(value)));
        }
        Self { params }
    }

    /// Build a query string from key/value pairs, already decoded.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            params: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Append one key/value pair.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.params.push((key.into(), value.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// True if at least one value exists for `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.params.iter().any(|(k, _)| k == name)
    }

    /// All keys, in order, repeats included.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.params.iter().map(|(k, _)| k.as_str())
    }

    /// All values carried under `name`, in order.
    pub fn values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.params
            .iter()
            .filter(move |(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// The single value carried under `name`.
    ///
    /// A repeated key is an error even when every occurrence carries the same
    /// value: parameter binding is strictly single-valued.
    pub fn single_value<'a>(&'a self, name: &'a str) -> Result<&'a str, BindingError> {
        let mut values = self.values(name);
        let first = values.next().ok_or_else(|| BindingError::Missing {
            name: name.to_string(),
        })?;
        if values.next().is_some() {
            return Err(BindingError::MultipleValues {
                name: name.to_string(),
            });
        }
        Ok(first)
    }
}

fn decode(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| raw.to_string())
}

/// Percent-encode a value destined for a single path segment or a query
/// string component.
pub(crate) fn encode_component(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Percent-encode a wildcard capture: each piece is encoded but the `/`
/// separators survive, so a tree-shaped value keeps its shape in the URL.
pub(crate) fn encode_tree(value: &str) -> String {
    value
        .split('/')
        .map(|piece| urlencoding::encode(piece).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
