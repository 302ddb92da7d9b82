#![doc = include_str!("../README.md")]
#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

/// Key augmentation under the protocol's key-length budget.
///
/// Decides whether a key has room for a replica suffix and builds the
/// per-replica physical key.
pub mod augment;

/// Error types for route construction.
///
/// Defines [`ConfigError`], returned when a route is built with parameters
/// outside of their valid range.
pub mod error;

/// Process-wide host identity.
///
/// [`ProcessHostId`](host::ProcessHostId) derives a stable identity from the
/// machine hostname, computed once per process.
pub mod host;

/// Metrics collection for key-split routing.
///
/// When the `metrics` feature is enabled, this module provides counters for
/// routed requests, skipped augmentations and fan-out deliveries, and for the
/// background task manager.
pub mod metrics;

/// Background task offloading for replica fan-out.
///
/// Writes and deletes that must reach every replica are delivered to the
/// non-assigned replicas in the background. This module provides the
/// [`OffloadManager`](offload::OffloadManager) that runs those tasks.
pub mod offload;

/// Per-operation dispatch table.
///
/// Maps every [`Operation`] to the set of replicas it must reach.
pub mod policy;

/// Replica assignment.
pub mod replica;

/// The key-split route handle and its builder.
pub mod route;

pub use error::ConfigError;
pub use host::ProcessHostId;
pub use offload::OffloadManager;
pub use policy::{Dispatch, Fanout};
pub use replica::{MAX_REPLICA_COUNT, MIN_REPLICA_COUNT, ReplicaCount, assigned_replica};
pub use route::{KeySplitRoute, KeySplitRouteBuilder};

pub use keysplit_core::{
    HostId, Key, MAX_KEY_LENGTH, Offload, Operation, Reply, ReplyStatus, Request, Route,
    RouteError, RouteResult, RouteTraverser, SharedRoute, StaticHostId,
};

/// The `keysplit` prelude.
///
/// ```rust
/// use keysplit::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{KeySplitRoute, Offload, Request, Route, RouteError, SharedRoute};
}
