//! Offload manager for background task execution.
//!
//! Key-split routes deliver replicated writes and deletes to the
//! non-assigned replicas as background tasks: the caller gets the assigned
//! replica's reply without waiting for the others.
//!
//! # Example
//!
//! ```ignore
//! use keysplit::offload::{OffloadConfig, OffloadManager};
//!
//! let manager = OffloadManager::new(OffloadConfig::default());
//!
//! manager.spawn("fanout", async {
//!     // deliver to another replica
//! });
//! ```

mod manager;
mod policy;

pub use manager::{OffloadHandle, OffloadKey, OffloadManager};
pub use policy::{OffloadConfig, OffloadConfigBuilder, TimeoutPolicy};
