//! Path template parsing and matching.
//!
//! A template is split on `/` into segments. A segment starting with `:`
//! captures exactly one path segment; a segment starting with `*` captures
//! one or more segments greedily (slashes included); everything else is a
//! literal that must match byte for byte.
//!
//! Matching compiles the template into a single anchored regex. Capture
//! groups are positional, with a side table mapping each group back to its
//! parameter name: the same name may be bound to several segments, and the
//! last occurrence's capture is the one binding observes.

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use once_cell::sync::Lazy;
use regex::Regex;

static IDENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier regex is valid")
});

/// One element of a parsed path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Matches its text exactly.
    Literal(String),
    /// `:name` — captures exactly one path segment.
    Param(String),
    /// `*name` — captures one or more path segments, greedily.
    Wildcard(String),
}

impl Segment {
    /// The parameter name, for capturing segments.
    pub fn param_name(&self) -> Option<&str> {
        match self {
            Segment::Literal(_) => None,
            Segment::Param(name) | Segment::Wildcard(name) => Some(name),
        }
    }
}

/// The parsed, matchable form of a route's path template.
#[derive(Debug, Clone)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
    regex: Regex,
    /// Parameter name per capture group, in path order.
    captures: Vec<String>,
}

impl PathPattern {
    /// Parse a path template. The error is a plain reason; callers wrap it
    /// into their own error type together with the offending definition.
    pub fn parse(path: &str) -> Result<Self, String> {
        let Some(rest) = path.strip_prefix('/') else {
            return Err(format!("path must start with `/`, got `{path}`"));
        };

        // Trailing empty segments are dropped so `/foo/` parses as `/foo`;
        // interior empty segments are kept as empty literals.
        let mut parts: Vec<&str> = rest.split('/').collect();
        while parts.len() > 1 && parts.last() == Some(&"") {
            parts.pop();
        }

        let mut segments = Vec::with_capacity(parts.len());
        for part in parts {
            let segment = if let Some(name) = part.strip_prefix(':') {
                Segment::Param(validated_name(path, name)?)
            } else if let Some(name) = part.strip_prefix('*') {
                Segment::Wildcard(validated_name(path, name)?)
            } else {
                Segment::Literal(part.to_string())
            };
            segments.push(segment);
        }

        let mut pattern = String::from("^/");
        for (idx, segment) in segments.iter().enumerate() {
            if idx > 0 {
                pattern.push('/');
            }
            match segment {
                Segment::Literal(text) => pattern.push_str(&regex::escape(text)),
                Segment::Param(_) => pattern.push_str("([^/]+)"),
                Segment::Wildcard(_) => pattern.push_str("(.+)"),
            }
        }
        pattern.push('$');

        let regex = Regex::new(&pattern)
            .map_err(|err| format!("path `{path}` does not compile: {err}"))?;
        let captures = segments
            .iter()
            .filter_map(|s| s.param_name().map(str::to_string))
            .collect();

        Ok(Self {
            raw: path.to_string(),
            segments,
            regex,
            captures,
        })
    }

    /// The template text as declared.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Parameter names in path order, duplicates included.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.captures.iter().map(String::as_str)
    }

    /// Whether the concrete request path matches this template.
    pub fn matches(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Match and extract captured parameter values. When one name is bound
    /// to several segments the last occurrence wins.
    pub fn capture(&self, path: &str) -> Option<HashMap<String, String>> {
        let caps = self.regex.captures(path)?;
        let mut values = HashMap::with_capacity(self.captures.len());
        for (idx, name) in self.captures.iter().enumerate() {
            let capture = caps.get(idx + 1)?;
            values.insert(name.clone(), capture.as_str().to_string());
        }
        Some(values)
    }
}

fn validated_name(path: &str, name: &str) -> Result<String, String> {
    if IDENT.is_match(name) {
        Ok(name.to_string())
    } else {
        Err(format!("invalid parameter name `{name}` in path `{path}`"))
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl PartialEq for PathPattern {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for PathPattern {}

impl Hash for PathPattern {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}
