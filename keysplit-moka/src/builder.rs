//! Builder for configuring [`MokaRoute`].

use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::time::{Duration, Instant};

use keysplit_core::Key;
use moka::Expiry;
use moka::future::Cache;
use smol_str::SmolStr;

use crate::route::{Entry, MokaRoute};

const DEFAULT_LEASE_TTL: Duration = Duration::from_secs(10);

/// Expiration policy reading the deadline stored in each [`Entry`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct Expiration;

impl Expiry<Key, Entry> for Expiration {
    fn expire_after_create(&self, _key: &Key, value: &Entry, _created_at: Instant) -> Option<Duration> {
        value.time_to_live()
    }

    fn expire_after_update(
        &self,
        _key: &Key,
        value: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        // The new entry's deadline wins over whatever the old one had left.
        value.time_to_live()
    }
}

/// Builder for creating and configuring a [`MokaRoute`].
///
/// Use [`MokaRoute::builder`] to create a new builder instance.
///
/// ```
/// use std::time::Duration;
/// use keysplit_moka::MokaRoute;
///
/// let route = MokaRoute::builder(10_000)
///     .name("sessions")
///     .lease_ttl(Duration::from_secs(2))
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct MokaRouteBuilder {
    max_capacity: u64,
    name: SmolStr,
    lease_ttl: Duration,
}

impl MokaRouteBuilder {
    /// Creates a builder holding at most `max_capacity` entries.
    pub fn new(max_capacity: u64) -> Self {
        Self {
            max_capacity,
            name: SmolStr::new_static("moka"),
            lease_ttl: DEFAULT_LEASE_TTL,
        }
    }

    /// Sets the route name reported by `route_name`.
    pub fn name(self, name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            ..self
        }
    }

    /// Sets how long a lease issued by `lease-get` stays valid.
    pub fn lease_ttl(self, lease_ttl: Duration) -> Self {
        Self { lease_ttl, ..self }
    }

    /// Builds the route.
    pub fn build(self) -> MokaRoute {
        let cache = Cache::builder()
            .max_capacity(self.max_capacity)
            .expire_after(Expiration)
            .build();
        let leases = Cache::builder()
            .max_capacity(self.max_capacity)
            .time_to_live(self.lease_ttl)
            .build();

        MokaRoute {
            cache,
            leases,
            next_token: Arc::new(AtomicU64::new(1)),
            name: self.name,
        }
    }
}
