use thiserror::Error;

use crate::{MAX_REPLICA_COUNT, MIN_REPLICA_COUNT};

/// Error returned when a route cannot be built from the given parameters.
///
/// These are caught while the route tree is assembled, before any request
/// can reach the route.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Replica count outside of the supported range.
    #[error(
        "replica count {0} is out of range, expected {min}..={max}",
        min = MIN_REPLICA_COUNT,
        max = MAX_REPLICA_COUNT
    )]
    InvalidReplicaCount(u64),
}
