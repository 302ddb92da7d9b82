//! Route handle trait.
//!
//! Routes form a tree: a route either answers a request itself (a
//! destination) or forwards it to one or more child routes, possibly after
//! rewriting it.

use std::sync::Arc;

use async_trait::async_trait;
use smol_str::SmolStr;

use crate::{Reply, Request, RouteResult, RouteTraverser};

/// Shared handle to a route, as held by parent routes and background tasks.
pub type SharedRoute = Arc<dyn Route>;

/// A composable unit of the routing tree.
///
/// Implementations must tolerate concurrent calls: the same route may be
/// invoked from the request path and from background fan-out tasks at the
/// same time.
#[async_trait]
pub trait Route: Send + Sync {
    /// Routes a request and returns the reply of the destination that served it.
    async fn route(&self, request: &Request) -> RouteResult<Reply>;

    /// Descriptive identifier of this route, for introspection and telemetry.
    fn route_name(&self) -> SmolStr {
        SmolStr::new_static("route")
    }

    /// Reports the children (and the requests they would receive) this route
    /// would use for `request`, without executing anything.
    ///
    /// Destinations have no children, so the default visits nothing.
    fn traverse(&self, _request: &Request, _traverser: &dyn RouteTraverser) {}
}

#[async_trait]
impl Route for Arc<dyn Route> {
    async fn route(&self, request: &Request) -> RouteResult<Reply> {
        (**self).route(request).await
    }

    fn route_name(&self) -> SmolStr {
        (**self).route_name()
    }

    fn traverse(&self, request: &Request, traverser: &dyn RouteTraverser) {
        (**self).traverse(request, traverser)
    }
}

#[async_trait]
impl Route for Box<dyn Route> {
    async fn route(&self, request: &Request) -> RouteResult<Reply> {
        (**self).route(request).await
    }

    fn route_name(&self) -> SmolStr {
        (**self).route_name()
    }

    fn traverse(&self, request: &Request, traverser: &dyn RouteTraverser) {
        (**self).traverse(request, traverser)
    }
}

#[async_trait]
impl Route for &dyn Route {
    async fn route(&self, request: &Request) -> RouteResult<Reply> {
        (**self).route(request).await
    }

    fn route_name(&self) -> SmolStr {
        (**self).route_name()
    }

    fn traverse(&self, request: &Request, traverser: &dyn RouteTraverser) {
        (**self).traverse(request, traverser)
    }
}
