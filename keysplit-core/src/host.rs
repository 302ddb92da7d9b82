//! Host identity used for replica affinity.

use std::sync::Arc;

/// Provider of the numeric identity of the current host.
///
/// The identity must be stable for the lifetime of the process: every request
/// issued by one process maps to the same replica.
pub trait HostId: Send + Sync {
    /// Returns the host identity.
    fn host_id(&self) -> u64;
}

/// Fixed host identity.
///
/// Useful for tests and for deployments that assign identities explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StaticHostId(pub u64);

impl HostId for StaticHostId {
    fn host_id(&self) -> u64 {
        self.0
    }
}

impl<T: HostId + ?Sized> HostId for Arc<T> {
    fn host_id(&self) -> u64 {
        (**self).host_id()
    }
}
