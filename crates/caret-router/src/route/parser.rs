//! Textual route definitions.
//!
//! One route per line:
//!
//! ```text
//! GET /post/:id/comment/:serial blog::Comments.show( i64 id, i32 serial )
//! POST /post/:id               blog::Posts.update( i64 id, String lang = 'en' ) service
//! ```
//!
//! Leading and trailing whitespace is ignored and runs of whitespace
//! collapse. Blank lines and lines starting with `#` are comments. The
//! parameter list may be omitted entirely for zero-argument methods, and
//! trailing bare words are modifiers. `= 'literal'` declares a default
//! value, single-quoted, with `\'` escaping.

use tracing::trace;

use crate::binder::{ParamType, ParameterBinders};
use crate::controller::ControllerRegistry;
use crate::error::IllegalRoute;
use crate::http::parse_method;
use crate::route::{ControllerParams, Param, Route};

/// Parse a multi-line route definition text, skipping blank lines and
/// `#`-comments. Routes keep their declaration order.
pub fn parse_routes(
    text: &str,
    registry: &ControllerRegistry,
    binders: &ParameterBinders,
) -> Result<Vec<Route>, IllegalRoute> {
    let mut routes = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        routes.push(parse_route(line, registry, binders)?);
    }
    Ok(routes)
}

/// Parse a single route definition line.
pub fn parse_route(
    definition: &str,
    registry: &ControllerRegistry,
    binders: &ParameterBinders,
) -> Result<Route, IllegalRoute> {
    let def = normalize_whitespace(definition);
    if def.is_empty() {
        return Err(IllegalRoute::new(definition, "empty route definition"));
    }
    if def.starts_with('#') {
        return Err(IllegalRoute::new(definition, "comment line is not a route"));
    }

    let mut head = def.splitn(3, ' ');
    let method_token = head.next().unwrap_or_default();
    let path = head
        .next()
        .ok_or_else(|| IllegalRoute::new(definition, "missing path"))?;
    let rest = head
        .next()
        .ok_or_else(|| IllegalRoute::new(definition, "missing controller action"))?;

    let method = parse_method(method_token).ok_or_else(|| {
        IllegalRoute::new(definition, format!("unknown HTTP method `{method_token}`"))
    })?;

    // Split the remainder into the action (up to the closing parenthesis, or
    // the first word when no parameter list is given) and trailing modifiers.
    let (action, modifiers_src) = if let Some(open) = rest.find('(') {
        let close = rest
            .rfind(')')
            .filter(|close| *close > open)
            .ok_or_else(|| IllegalRoute::new(definition, "unbalanced parentheses in action"))?;
        (&rest[..=close], rest[close + 1..].trim())
    } else if let Some(space) = rest.find(' ') {
        (&rest[..space], rest[space + 1..].trim())
    } else {
        (rest, "")
    };

    let (target, params_src) = match action.find('(') {
        Some(open) => (&action[..open], Some(&action[open + 1..action.len() - 1])),
        None => (action, None),
    };
    let target = target.trim();
    if target.contains(' ') {
        return Err(IllegalRoute::new(
            definition,
            format!("invalid controller reference `{target}`"),
        ));
    }
    let dot = target.rfind('.').ok_or_else(|| {
        IllegalRoute::new(definition, "expected `Controller.method` in action")
    })?;
    let (controller, method_name) = (&target[..dot], &target[dot + 1..]);
    if controller.is_empty() || method_name.is_empty() {
        return Err(IllegalRoute::new(
            definition,
            "expected `Controller.method` in action",
        ));
    }

    let params = match params_src.map(str::trim) {
        None | Some("") => ControllerParams::default(),
        Some(src) => parse_params(definition, src)?,
    };

    let modifiers: Vec<String> = modifiers_src
        .split_whitespace()
        .map(str::to_string)
        .collect();

    trace!(
        method = %method,
        path,
        controller,
        action = method_name,
        params = params.len(),
        "parsed route definition"
    );

    Route::new(
        method,
        path,
        controller,
        method_name,
        params,
        modifiers,
        registry,
        binders,
    )
    .map_err(|err| IllegalRoute::new(definition, err.reason))
}

fn parse_params(definition: &str, src: &str) -> Result<ControllerParams, IllegalRoute> {
    let mut params: Vec<Param> = Vec::new();
    for segment in split_params(src) {
        let segment = segment.trim();
        if segment.is_empty() {
            return Err(IllegalRoute::new(definition, "empty parameter declaration"));
        }

        let (head, default) = match segment.split_once('=') {
            Some((head, default_src)) => {
                (head.trim(), Some(parse_default(definition, default_src)?))
            }
            None => (segment, None),
        };

        let tokens: Vec<&str> = head.split_whitespace().collect();
        let &[ty_token, name] = tokens.as_slice() else {
            return Err(IllegalRoute::new(
                definition,
                format!("unable to parse parameter `{segment}`"),
            ));
        };

        if params.iter().any(|p| p.name() == name) {
            return Err(IllegalRoute::new(
                definition,
                format!("parameter `{name}` declared twice"),
            ));
        }

        let ty = ParamType::named(ty_token);
        params.push(match default {
            Some(default) => Param::defaulted(name, ty, default),
            None => Param::required(name, ty),
        });
    }
    Ok(ControllerParams::new(params))
}

fn parse_default(definition: &str, src: &str) -> Result<String, IllegalRoute> {
    let src = src.trim();
    let quoted = src.len() >= 2 && src.starts_with('\'') && src.ends_with('\'');
    if !quoted {
        return Err(IllegalRoute::new(
            definition,
            format!("default value must be single-quoted, got `{src}`"),
        ));
    }
    Ok(src[1..src.len() - 1].replace("\\'", "'"))
}

/// Split a parameter list on commas, ignoring commas inside single-quoted
/// default values.
fn split_params(src: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut inside_quotes = false;
    let mut previous = '\0';
    for character in src.chars() {
        if character == '\'' && previous != '\\' {
            inside_quotes = !inside_quotes;
        }
        if character == ',' && !inside_quotes {
            segments.push(std::mem::take(&mut current));
        } else {
            current.push(character);
        }
        previous = character;
    }
    segments.push(current);
    segments
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
