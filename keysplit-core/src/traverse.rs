//! Introspection of routing decisions.
//!
//! A [`RouteTraverser`] is handed to [`Route::traverse`]. Each route reports
//! the children it would forward a request to, together with the request as
//! that child would see it, and nothing is executed.

use std::sync::{Mutex, PoisonError};

use smol_str::SmolStr;

use crate::{Request, Route};

/// Visitor notified of every `(child, effective request)` pair a route would use.
pub trait RouteTraverser: Send + Sync {
    /// Called once per child the visiting route would forward to.
    fn visit(&self, route: &dyn Route, request: &Request);
}

/// A single step recorded by [`RecordingTraverser`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraversedRoute {
    /// Name of the visited route.
    pub route_name: SmolStr,
    /// Request the visited route would receive.
    pub request: Request,
}

/// Traverser that records every visited route and walks the whole subtree.
///
/// ```
/// use keysplit_core::{RecordingTraverser, Request, Route};
/// # use keysplit_core::{Reply, RouteResult};
/// # struct Leaf;
/// # #[async_trait::async_trait]
/// # impl Route for Leaf {
/// #     async fn route(&self, _req: &Request) -> RouteResult<Reply> { unimplemented!() }
/// # }
///
/// let traverser = RecordingTraverser::new();
/// Leaf.traverse(&Request::get("foo"), &traverser);
/// assert!(traverser.into_visited().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct RecordingTraverser {
    visited: Mutex<Vec<TraversedRoute>>,
}

impl RecordingTraverser {
    /// Creates an empty traverser.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded steps in visiting order.
    pub fn visited(&self) -> Vec<TraversedRoute> {
        self.visited
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Consumes the traverser and returns the recorded steps.
    pub fn into_visited(self) -> Vec<TraversedRoute> {
        self.visited
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl RouteTraverser for RecordingTraverser {
    fn visit(&self, route: &dyn Route, request: &Request) {
        self.visited
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(TraversedRoute {
                route_name: route.route_name(),
                request: request.clone(),
            });
        route.traverse(request, self);
    }
}
