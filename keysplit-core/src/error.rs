//! Error types for route operations.

use thiserror::Error;

use crate::Operation;

/// Result type returned by [`Route::route`](crate::Route::route).
pub type RouteResult<T> = Result<T, RouteError>;

/// Error type for route operations.
///
/// Groups failures a destination can report so that callers can decide how
/// to react without knowing which destination produced them.
#[derive(Debug, Error)]
pub enum RouteError {
    /// Internal destination error, state or computation error.
    ///
    /// Any error not related to network interaction.
    #[error(transparent)]
    Internal(Box<dyn std::error::Error + Send + Sync>),

    /// Network interaction error.
    ///
    /// Errors occurring while talking to a remote destination.
    #[error(transparent)]
    Connection(Box<dyn std::error::Error + Send + Sync>),

    /// The destination does not implement this operation.
    #[error("operation `{0}` is not supported by this route")]
    Unsupported(Operation),

    /// The destination did not answer in time.
    #[error("route timed out")]
    Timeout,
}

impl RouteError {
    /// Wraps an arbitrary error as [`RouteError::Internal`].
    pub fn internal(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Internal(err.into())
    }
}
