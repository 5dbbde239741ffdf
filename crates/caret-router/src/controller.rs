//! Registration-time controller method table.
//!
//! Routes do not look handlers up by name at request time. Every controller
//! method is registered once, up front, under its controller name, method
//! name and parameter-type sequence; route construction resolves the handler
//! reference from this table and fails fast when the target does not exist
//! or its signature disagrees with the declared parameters.

use std::fmt;
use std::sync::Arc;

use crate::binder::{BoundParams, ParamType};

/// Result token returned by controller invocation.
///
/// The full outcome-building surface lives with the serving layer; routing
/// only needs the type at the seam to hand results back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    status: u16,
    body: String,
}

impl Outcome {
    /// A 200 outcome with the given body.
    pub fn ok(body: impl Into<String>) -> Self {
        Self::with_status(200, body)
    }

    pub fn with_status(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn body(&self) -> &str {
        &self.body
    }
}

/// An invocable controller method.
///
/// Implemented for free by any `Fn(&BoundParams) -> Outcome` closure or
/// function.
pub trait Handler: Send + Sync {
    fn invoke(&self, args: &BoundParams) -> Outcome;
}

impl<F> Handler for F
where
    F: Fn(&BoundParams) -> Outcome + Send + Sync,
{
    fn invoke(&self, args: &BoundParams) -> Outcome {
        self(args)
    }
}

/// One registered controller method: its identity and its handler.
#[derive(Clone)]
pub struct ControllerMethod {
    controller: String,
    name: String,
    param_types: Vec<ParamType>,
    handler: Arc<dyn Handler>,
}

impl ControllerMethod {
    pub fn controller(&self) -> &str {
        &self.controller
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn param_types(&self) -> &[ParamType] {
        &self.param_types
    }

    pub(crate) fn handler(&self) -> Arc<dyn Handler> {
        Arc::clone(&self.handler)
    }
}

impl fmt::Debug for ControllerMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerMethod")
            .field("controller", &self.controller)
            .field("name", &self.name)
            .field("param_types", &self.param_types)
            .finish_non_exhaustive()
    }
}

/// The controller method table routes resolve against.
///
/// Overloads are supported: the same controller and method name may be
/// registered several times with different parameter-type sequences.
#[derive(Debug, Default)]
pub struct ControllerRegistry {
    methods: Vec<ControllerMethod>,
}

impl ControllerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a controller method under its full signature.
    pub fn register(
        &mut self,
        controller: impl Into<String>,
        name: impl Into<String>,
        param_types: Vec<ParamType>,
        handler: impl Handler + 'static,
    ) {
        self.methods.push(ControllerMethod {
            controller: controller.into(),
            name: name.into(),
            param_types,
            handler: Arc::new(handler),
        });
    }

    /// Find the method matching controller, name and exact parameter-type
    /// sequence. Parameter names play no part in resolution.
    pub fn resolve(
        &self,
        controller: &str,
        name: &str,
        param_types: &[ParamType],
    ) -> Option<&ControllerMethod> {
        self.methods.iter().find(|m| {
            m.controller == controller && m.name == name && m.param_types == param_types
        })
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}
