//! Route records: one declared mapping from an HTTP method and path template
//! onto a registered controller method.
//!
//! A `Route` validates itself completely at construction; a value that exists
//! is guaranteed well-formed, so request handling never revalidates. Routes
//! are immutable and cheap to clone (the handler reference is shared).

pub mod builder;
pub mod parser;
pub mod pattern;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::binder::{BoundParams, ParamType, ParameterBinders};
use crate::controller::{ControllerRegistry, Handler, Outcome};
use crate::error::{BindingError, IllegalRoute, UnbindingError};
use crate::http::{encode_component, encode_tree, Method, QueryString};

use pattern::{PathPattern, Segment};

/// A declared controller parameter: name, semantic type and an optional
/// default literal.
///
/// A parameter with a default never fails to bind on absence: the default is
/// used whenever neither the path nor the query string carries a value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Param {
    name: String,
    ty: ParamType,
    default: Option<String>,
}

impl Param {
    pub fn required(name: impl Into<String>, ty: ParamType) -> Self {
        Self {
            name: name.into(),
            ty,
            default: None,
        }
    }

    pub fn defaulted(name: impl Into<String>, ty: ParamType, default: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty,
            default: Some(default.into()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &ParamType {
        &self.ty
    }

    /// The raw default literal, if one was declared.
    pub fn default(&self) -> Option<&str> {
        self.default.as_deref()
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.ty, self.name)?;
        if let Some(default) = &self.default {
            write!(f, " = '{}'", default.replace('\'', "\\'"))?;
        }
        Ok(())
    }
}

/// The ordered controller parameter list of a route, in the exact order the
/// handler expects its arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ControllerParams(Vec<Param>);

impl ControllerParams {
    pub fn new(params: Vec<Param>) -> Self {
        Self(params)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(Param::name)
    }

    pub fn types(&self) -> Vec<ParamType> {
        self.0.iter().map(|p| p.ty.clone()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&Param> {
        self.0.iter().find(|p| p.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Param> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One declared endpoint: HTTP method + path template → controller method.
#[derive(Clone)]
pub struct Route {
    method: Method,
    pattern: PathPattern,
    controller: String,
    controller_method: String,
    params: ControllerParams,
    modifiers: Vec<String>,
    handler: Arc<dyn Handler>,
}

impl Route {
    /// Construct and validate a route.
    ///
    /// Every invariant is checked here, once; a violation is an
    /// [`IllegalRoute`] naming the offending definition. Nothing is deferred
    /// to request time.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        method: Method,
        path: &str,
        controller: impl Into<String>,
        controller_method: impl Into<String>,
        params: ControllerParams,
        modifiers: Vec<String>,
        registry: &ControllerRegistry,
        binders: &ParameterBinders,
    ) -> Result<Self, IllegalRoute> {
        let controller = controller.into();
        let controller_method = controller_method.into();
        let definition = format!("{method} {path} {controller}.{controller_method}(..)");
        let illegal = |reason: String| IllegalRoute::new(&definition, reason);

        let pattern = PathPattern::parse(path).map_err(illegal)?;

        // Every path parameter must be declared; the same name may appear in
        // several segments.
        for name in pattern.param_names() {
            if params.get(name).is_none() {
                return Err(illegal(format!(
                    "path parameter `{name}` is not declared in the controller parameters"
                )));
            }
        }

        // Every declared parameter must either appear in the path or carry a
        // default the binder can supply on absence.
        for param in params.iter() {
            let in_path = pattern.param_names().any(|name| name == param.name());
            if !in_path && param.default().is_none() {
                return Err(illegal(format!(
                    "controller parameter `{}` does not appear in the path and has no default value",
                    param.name()
                )));
            }
        }

        // Declared types must be bindable, and default literals must bind
        // under their declared type.
        for param in params.iter() {
            if !binders.accepts(param.ty()) {
                return Err(illegal(format!(
                    "no parameter binder for type `{}`",
                    param.ty()
                )));
            }
            if let Some(default) = param.default() {
                binders.bind(param.ty(), param.name(), default).map_err(|err| {
                    illegal(format!(
                        "default value for parameter `{}` does not bind: {err}",
                        param.name()
                    ))
                })?;
            }
        }

        // The controller method must be registered with exactly the declared
        // parameter-type sequence. Its return type is fixed by the Handler
        // trait, so registration already guarantees it.
        let types = params.types();
        let resolved = registry
            .resolve(&controller, &controller_method, &types)
            .ok_or_else(|| {
                let signature = types
                    .iter()
                    .map(ParamType::name)
                    .collect::<Vec<_>>()
                    .join(", ");
                illegal(format!(
                    "controller method `{controller}.{controller_method}( {signature} )` is not registered"
                ))
            })?;

        Ok(Self {
            method,
            pattern,
            controller,
            controller_method,
            params,
            modifiers,
            handler: resolved.handler(),
        })
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The path template as declared.
    pub fn path(&self) -> &str {
        self.pattern.raw()
    }

    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    pub fn controller(&self) -> &str {
        &self.controller
    }

    pub fn controller_method(&self) -> &str {
        &self.controller_method
    }

    pub fn params(&self) -> &ControllerParams {
        &self.params
    }

    /// Free-form tags carried for the serving layer; matching ignores them.
    pub fn modifiers(&self) -> &[String] {
        &self.modifiers
    }

    /// True iff the method matches and the path template matches the request
    /// path.
    pub fn satisfied_by(&self, method: &Method, path: &str) -> bool {
        self.method == *method && self.pattern.matches(path)
    }

    /// Extract and convert every declared parameter for a request.
    ///
    /// Values are taken from the path capture first, then from the query
    /// string, then from the declared default. The resulting map is ordered
    /// exactly like the controller's parameter list.
    pub fn bind_parameters(
        &self,
        binders: &ParameterBinders,
        path: &str,
        query: &QueryString,
    ) -> Result<BoundParams, BindingError> {
        let captured = self
            .pattern
            .capture(path)
            .ok_or_else(|| BindingError::PathMismatch {
                route: self.pattern.raw().to_string(),
                path: path.to_string(),
            })?;

        let mut bound = BoundParams::with_capacity(self.params.len());
        for param in self.params.iter() {
            let raw = if let Some(value) = captured.get(param.name()) {
                Some(value.clone())
            } else if query.contains(param.name()) {
                Some(query.single_value(param.name())?.to_string())
            } else {
                None
            };

            let value = match (raw, param.default()) {
                (Some(raw), _) => binders.bind(param.ty(), param.name(), &raw)?,
                (None, Some(default)) => binders.bind(param.ty(), param.name(), default)?,
                (None, None) => {
                    return Err(BindingError::Missing {
                        name: param.name().to_string(),
                    })
                }
            };
            bound.insert(param.name(), value);
        }
        Ok(bound)
    }

    /// The inverse of binding: substitute typed values into the path
    /// template and append everything the path did not consume as a query
    /// string.
    ///
    /// Substituted values are percent-encoded; wildcard values keep their
    /// `/` separators. Parameters missing from `args` fall back to their
    /// declared default.
    pub fn unbind_parameters(
        &self,
        binders: &ParameterBinders,
        args: &BoundParams,
    ) -> Result<String, UnbindingError> {
        let mut uri = String::from("/");
        let mut consumed: Vec<&str> = Vec::new();

        for (idx, segment) in self.pattern.segments().iter().enumerate() {
            if idx > 0 {
                uri.push('/');
            }
            match segment {
                Segment::Literal(text) => uri.push_str(text),
                Segment::Param(name) => {
                    let raw = self.unbind_one(binders, name, args)?;
                    uri.push_str(&encode_component(&raw));
                    consumed.push(name.as_str());
                }
                Segment::Wildcard(name) => {
                    let raw = self.unbind_one(binders, name, args)?;
                    uri.push_str(&encode_tree(&raw));
                    consumed.push(name.as_str());
                }
            }
        }

        let query: Vec<&Param> = self
            .params
            .iter()
            .filter(|p| !consumed.contains(&p.name()))
            .collect();
        if !query.is_empty() {
            uri.push('?');
            for (idx, param) in query.iter().enumerate() {
                if idx > 0 {
                    uri.push('&');
                }
                let raw = self.unbind_one(binders, param.name(), args)?;
                uri.push_str(&encode_component(param.name()));
                uri.push('=');
                uri.push_str(&encode_component(&raw));
            }
        }
        Ok(uri)
    }

    fn unbind_one(
        &self,
        binders: &ParameterBinders,
        name: &str,
        args: &BoundParams,
    ) -> Result<String, UnbindingError> {
        let param = self
            .params
            .get(name)
            .ok_or_else(|| UnbindingError::MissingArgument {
                name: name.to_string(),
            })?;
        match args.get(name) {
            Some(value) => binders.unbind(param.ty(), name, value),
            None => param
                .default()
                .map(str::to_string)
                .ok_or_else(|| UnbindingError::MissingArgument {
                    name: name.to_string(),
                }),
        }
    }

    /// Invoke the resolved handler with bound arguments.
    pub fn invoke(&self, args: &BoundParams) -> Outcome {
        self.handler.invoke(args)
    }

    /// `Controller.method( params )`, the action column of the rendered
    /// definition.
    pub(crate) fn action_string(&self) -> String {
        let mut action = format!("{}.{}", self.controller, self.controller_method);
        if self.params.is_empty() {
            action.push_str("()");
        } else {
            action.push_str("( ");
            let rendered: Vec<String> = self.params.iter().map(Param::to_string).collect();
            action.push_str(&rendered.join(", "));
            action.push_str(" )");
        }
        action
    }
}

impl fmt::Display for Route {
    /// Renders the canonical route-definition line; parsing it back yields
    /// an equal route.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.method, self.pattern, self.action_string())?;
        for modifier in &self.modifiers {
            write!(f, " {modifier}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("path", &self.pattern.raw())
            .field("controller", &self.controller)
            .field("controller_method", &self.controller_method)
            .field("params", &self.params)
            .field("modifiers", &self.modifiers)
            .finish_non_exhaustive()
    }
}

/// Route identity is the declaration tuple: method, path, controller,
/// controller method and parameter list. The handler reference and the
/// modifiers play no part.
impl PartialEq for Route {
    fn eq(&self, other: &Self) -> bool {
        self.method == other.method
            && self.pattern == other.pattern
            && self.controller == other.controller
            && self.controller_method == other.controller_method
            && self.params == other.params
    }
}

impl Eq for Route {}

impl Hash for Route {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.method.hash(state);
        self.pattern.hash(state);
        self.controller.hash(state);
        self.controller_method.hash(state);
        self.params.hash(state);
    }
}
