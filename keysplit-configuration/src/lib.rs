#![warn(missing_docs)]
//! Declarative route trees for keysplit.
//!
//! A route tree is described in YAML or JSON and built into an
//! [`Arc<dyn Route>`](keysplit_core::SharedRoute):
//!
//! ```yaml
//! type: KeySplit
//! replicas: 3
//! all_sync: true
//! destination:
//!   type: Named
//!   name: main-pool
//! ```
//!
//! Destinations speaking a wire protocol are created by the embedding
//! application and made available to the tree through a [`RouteRegistry`].

mod error;
mod route;

pub use error::ConfigError;
pub use route::{RouteConfig, RouteContext, RouteRegistry};
