//! Fluent route construction.
//!
//! The programmatic counterpart of the textual definitions:
//!
//! ```
//! use caret_router::{d, p, route, BoundParams, ControllerRegistry, Method, Outcome,
//!     ParamType, ParameterBinders};
//!
//! let mut registry = ControllerRegistry::new();
//! registry.register(
//!     "blog::Posts",
//!     "show",
//!     vec![ParamType::I64, ParamType::I32],
//!     |_: &BoundParams| Outcome::ok("post"),
//! );
//! let binders = ParameterBinders::new();
//!
//! let route = route(Method::GET)
//!     .on("/post/:id")
//!     .to("blog::Posts", "show", [p("id", ParamType::I64), d("page", ParamType::I32, "1")])
//!     .modified_by(["service"])
//!     .build(&registry, &binders)
//!     .unwrap();
//! assert_eq!(
//!     route.to_string(),
//!     "GET /post/:id blog::Posts.show( i64 id, i32 page = '1' ) service"
//! );
//! ```
//!
//! Both construction surfaces funnel through [`Route::new`], so a route built
//! here satisfies exactly the invariants a parsed route does.

use crate::binder::{ParamType, ParameterBinders};
use crate::controller::ControllerRegistry;
use crate::error::IllegalRoute;
use crate::http::Method;
use crate::route::{ControllerParams, Param, Route};

/// Start building a route for the given HTTP method.
pub fn route(method: Method) -> RouteBuilder {
    RouteBuilder {
        method,
        path: None,
        controller: None,
        controller_method: None,
        params: Vec::new(),
        modifiers: Vec::new(),
    }
}

/// Declare a required parameter.
pub fn p(name: impl Into<String>, ty: ParamType) -> Param {
    Param::required(name, ty)
}

/// Declare a parameter with a default value.
pub fn d(name: impl Into<String>, ty: ParamType, default: impl Into<String>) -> Param {
    Param::defaulted(name, ty, default)
}

/// Builder for a single [`Route`].
#[derive(Debug)]
pub struct RouteBuilder {
    method: Method,
    path: Option<String>,
    controller: Option<String>,
    controller_method: Option<String>,
    params: Vec<Param>,
    modifiers: Vec<String>,
}

impl RouteBuilder {
    /// Set the path template.
    pub fn on(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Set the target controller method and its declared parameters.
    pub fn to(
        mut self,
        controller: impl Into<String>,
        method_name: impl Into<String>,
        params: impl IntoIterator<Item = Param>,
    ) -> Self {
        self.controller = Some(controller.into());
        self.controller_method = Some(method_name.into());
        self.params = params.into_iter().collect();
        self
    }

    /// Attach free-form modifier tags.
    pub fn modified_by<I, S>(mut self, modifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.modifiers.extend(modifiers.into_iter().map(Into::into));
        self
    }

    /// Validate and construct the route.
    pub fn build(
        self,
        registry: &ControllerRegistry,
        binders: &ParameterBinders,
    ) -> Result<Route, IllegalRoute> {
        let path = self
            .path
            .ok_or_else(|| IllegalRoute::new("<builder>", "no path set, call on()"))?;
        let controller = self
            .controller
            .ok_or_else(|| IllegalRoute::new("<builder>", "no controller set, call to()"))?;
        let controller_method = self
            .controller_method
            .filter(|name| !name.is_empty())
            .ok_or_else(|| IllegalRoute::new("<builder>", "no controller method set, call to()"))?;

        Route::new(
            self.method,
            &path,
            controller,
            controller_method,
            ControllerParams::new(self.params),
            self.modifiers,
            registry,
            binders,
        )
    }
}
