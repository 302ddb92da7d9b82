use thiserror::Error;

/// Errors raised while loading or building a route tree from configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document could not be deserialized.
    #[error("Failed to parse route configuration: {0}")]
    Parse(String),

    /// A key-split node has a replica count outside the supported range.
    #[error(
        "Invalid replica count {value} at {path}: expected {min}..={max}",
        min = keysplit::MIN_REPLICA_COUNT,
        max = keysplit::MAX_REPLICA_COUNT
    )]
    InvalidReplicaCount {
        /// Location of the offending node, e.g. `root.destination`.
        path: String,
        /// Configured replica count.
        value: u64,
    },

    /// A named route is missing from the registry.
    #[error("Unknown route: {0}")]
    UnknownRoute(String),

    /// The route kind was compiled out.
    #[error("Route not available: {0}. Enable the corresponding feature.")]
    RouteNotAvailable(String),

    /// Route construction failed.
    #[error(transparent)]
    Route(#[from] keysplit::ConfigError),
}
