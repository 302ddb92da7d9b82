#![warn(missing_docs)]
//! # keysplit-core
//!
//! Core traits and types for key-split routing inside a cache proxy.
//!
//! This crate defines the protocol-level vocabulary that routes exchange and
//! the seams through which the routing layer talks to its collaborators:
//!
//! - **Describe** an operation ([`Operation`], [`Request`], [`Key`])
//! - **Answer** an operation ([`Reply`], [`ReplyStatus`])
//! - **Forward** an operation through a tree of route handles ([`Route`])
//! - **Inspect** routing decisions without executing them ([`RouteTraverser`])
//! - **Execute** background work without waiting for it ([`Offload`])
//! - **Identify** the current host ([`HostId`])

pub mod error;
pub mod host;
pub mod key;
pub mod offload;
pub mod reply;
pub mod request;
pub mod route;
pub mod traverse;

pub use error::{RouteError, RouteResult};
pub use host::{HostId, StaticHostId};
pub use key::{Key, MAX_KEY_LENGTH};
pub use offload::Offload;
pub use reply::{Reply, ReplyStatus};
pub use request::{Operation, Request};
pub use route::{Route, SharedRoute};
#[doc(hidden)]
pub use smol_str::SmolStr;
pub use traverse::{RecordingTraverser, RouteTraverser, TraversedRoute};

/// Raw byte data type used for keys and values.
/// Using `Bytes` provides efficient zero-copy cloning via reference counting.
pub type Raw = bytes::Bytes;
