//! # Caret Router
//!
//! The routing core of the Caret web stack: a declarative route table mapping
//! HTTP methods and path templates onto registered controller methods, with
//! typed parameter binding in both directions:
//!
//! - **Forward**: match an incoming method + path against the table
//!   (first declared match wins), extract path and query values, and convert
//!   them to typed controller arguments.
//! - **Reverse**: turn a controller method plus argument values back into a
//!   concrete, percent-encoded URL.
//!
//! Routes come from a one-line-per-route text format or an equivalent fluent
//! builder; both validate every invariant at construction, so a table that
//! exists is fully well-formed. Tables are immutable and lock-free to query;
//! development-mode reload swaps in a complete replacement atomically via
//! [`ActiveRoutes`].
//!
//! ## Example
//!
//! ```
//! use caret_router::{
//!     parse_routes, BoundParams, BoundValue, ControllerRegistry, Method, Outcome,
//!     ParamType, ParameterBinders, QueryString, ReverseRoutes, RouteTable,
//! };
//!
//! let mut registry = ControllerRegistry::new();
//! registry.register(
//!     "blog::Posts",
//!     "show",
//!     vec![ParamType::I64],
//!     |args: &BoundParams| {
//!         let id = args.get("id").and_then(|v| v.downcast_ref::<i64>()).copied();
//!         Outcome::ok(format!("post {}", id.unwrap_or_default()))
//!     },
//! );
//! let binders = ParameterBinders::new();
//!
//! let routes = parse_routes(
//!     "# application routes\n\
//!      GET /post/:id blog::Posts.show( i64 id )",
//!     &registry,
//!     &binders,
//! ).unwrap();
//! let table = RouteTable::new(routes);
//!
//! // Forward: request → route → typed arguments → outcome.
//! let route = table.route(&Method::GET, "/post/42").unwrap();
//! let args = route.bind_parameters(&binders, "/post/42", &QueryString::new()).unwrap();
//! assert_eq!(route.invoke(&args).body(), "post 42");
//!
//! // Reverse: controller method + arguments → URL.
//! let reverse = ReverseRoutes::new(&table, &binders);
//! let url = reverse
//!     .route_to("blog::Posts", "show", vec![BoundValue::new(42i64)])
//!     .unwrap();
//! assert_eq!(url.uri(), "/post/42");
//! ```

#![forbid(unsafe_code)]

pub mod binder;
pub mod controller;
pub mod error;
pub mod http;
pub mod reverse;
pub mod route;
pub mod table;

pub use binder::{
    BoundParams, BoundValue, ParamType, ParameterBinder, ParameterBinders, TypedBinder,
};
pub use controller::{ControllerMethod, ControllerRegistry, Handler, Outcome};
pub use error::{BindingError, IllegalRoute, ReverseRouteError, RouteNotFound, UnbindingError};
pub use http::{Method, QueryString};
pub use reverse::{ReverseRoute, ReverseRoutes};
pub use route::builder::{d, p, route, RouteBuilder};
pub use route::parser::{parse_route, parse_routes};
pub use route::pattern::{PathPattern, Segment};
pub use route::{ControllerParams, Param, Route};
pub use table::{ActiveRoutes, RouteTable, RouteTableBuilder};
