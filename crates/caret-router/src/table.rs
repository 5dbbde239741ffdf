//! The ordered route table and its atomically-swappable handle.
//!
//! Lookup is a linear first-match scan in declaration order; whichever of two
//! overlapping patterns was registered first wins. The table is immutable
//! after construction, so matching needs no locks. Development-mode reload is
//! an [`ActiveRoutes::swap`] with a complete, validated replacement table.

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::{debug, info};

use crate::error::RouteNotFound;
use crate::http::Method;
use crate::route::Route;

/// Ordered collection of routes; first match wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new(routes: impl IntoIterator<Item = Route>) -> Self {
        let routes: Vec<Route> = routes.into_iter().collect();
        debug!(routes = routes.len(), "route table built");
        Self { routes }
    }

    /// Compose a table from precedence tiers.
    pub fn builder() -> RouteTableBuilder {
        RouteTableBuilder::default()
    }

    /// Find the first route satisfied by the request, in declaration order.
    pub fn route(&self, method: &Method, path: &str) -> Result<&Route, RouteNotFound> {
        self.routes
            .iter()
            .find(|route| route.satisfied_by(method, path))
            .ok_or_else(|| RouteNotFound {
                method: method.clone(),
                path: path.to_string(),
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl fmt::Display for RouteTable {
    /// Renders the table as column-aligned route definition lines; the
    /// output parses back into an equal table.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let method_width = self
            .routes
            .iter()
            .map(|r| r.method().as_str().len())
            .max()
            .unwrap_or(0);
        let path_width = self
            .routes
            .iter()
            .map(|r| r.path().len())
            .max()
            .unwrap_or(0);

        for (idx, route) in self.routes.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            let mut line = format!(
                "{:<method_width$} {:<path_width$} {}",
                route.method().as_str(),
                route.path(),
                route.action_string(),
            );
            for modifier in route.modifiers() {
                line.push(' ');
                line.push_str(modifier);
            }
            f.write_str(line.trim_end())?;
        }
        Ok(())
    }
}

/// Builds a [`RouteTable`] out of the three route sources, concatenated in
/// the fixed precedence order **framework → plugins → application**.
///
/// An earlier tier shadows a later one wherever their patterns overlap.
/// Within a tier, registration order is preserved.
#[derive(Debug, Default)]
pub struct RouteTableBuilder {
    framework: Vec<Route>,
    plugins: Vec<Route>,
    application: Vec<Route>,
}

impl RouteTableBuilder {
    pub fn framework_routes(mut self, routes: impl IntoIterator<Item = Route>) -> Self {
        self.framework.extend(routes);
        self
    }

    pub fn plugin_routes(mut self, routes: impl IntoIterator<Item = Route>) -> Self {
        self.plugins.extend(routes);
        self
    }

    pub fn application_routes(mut self, routes: impl IntoIterator<Item = Route>) -> Self {
        self.application.extend(routes);
        self
    }

    pub fn build(self) -> RouteTable {
        let mut routes = self.framework;
        routes.extend(self.plugins);
        routes.extend(self.application);
        RouteTable::new(routes)
    }
}

/// Shared handle to the route table currently serving requests.
///
/// `load` pins a consistent table for as long as the caller holds the `Arc`,
/// so an in-flight request keeps one internally-consistent view across its
/// whole lifetime even while `swap` publishes a replacement.
#[derive(Debug)]
pub struct ActiveRoutes {
    current: ArcSwap<RouteTable>,
}

impl ActiveRoutes {
    pub fn new(table: RouteTable) -> Self {
        Self {
            current: ArcSwap::from_pointee(table),
        }
    }

    /// The currently-active table.
    pub fn load(&self) -> Arc<RouteTable> {
        self.current.load_full()
    }

    /// Atomically replace the active table, returning the previous one.
    ///
    /// The replacement must already be complete and validated; construction
    /// failures abort the rebuild before this point is reached.
    pub fn swap(&self, table: RouteTable) -> Arc<RouteTable> {
        let next = Arc::new(table);
        info!(routes = next.len(), "route table swapped");
        self.current.swap(next)
    }
}
