//! Operations and requests flowing through the route tree.

use std::fmt;
use std::time::Duration;

use bytes::Bytes;

use crate::Key;

/// Kind of a key-value operation.
///
/// The set is closed: routes match on it exhaustively, so adding a kind forces
/// every routing policy to decide how the new kind is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Read a value.
    Get,
    /// Read a value, acquiring a lease on miss.
    LeaseGet,
    /// Store a value under a previously acquired lease.
    LeaseSet,
    /// Store a value unconditionally.
    Set,
    /// Remove a value.
    Delete,
    /// Store a value only if the key is absent.
    Add,
    /// Update the expiration of an existing value.
    Touch,
    /// Increment a decimal counter.
    Incr,
    /// Decrement a decimal counter.
    Decr,
}

impl Operation {
    /// Stable lowercase name, used for tracing fields and metric labels.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Get => "get",
            Operation::LeaseGet => "lease-get",
            Operation::LeaseSet => "lease-set",
            Operation::Set => "set",
            Operation::Delete => "delete",
            Operation::Add => "add",
            Operation::Touch => "touch",
            Operation::Incr => "incr",
            Operation::Decr => "decr",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single key-value request.
///
/// Requests are cheap to clone: the key and the value are reference-counted
/// byte buffers. A clone is fully owned and independent of the original.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use keysplit_core::{Operation, Request};
///
/// let req = Request::set("foo", "bar").with_ttl(Duration::from_secs(30));
/// assert_eq!(req.operation(), Operation::Set);
/// assert_eq!(req.key().as_bytes(), b"foo");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    operation: Operation,
    key: Key,
    value: Bytes,
    ttl: Option<Duration>,
    lease_token: u64,
    delta: u64,
}

impl Request {
    /// Creates a request of the given kind with no value.
    pub fn new(operation: Operation, key: impl Into<Key>) -> Self {
        Self {
            operation,
            key: key.into(),
            value: Bytes::new(),
            ttl: None,
            lease_token: 0,
            delta: 0,
        }
    }

    /// `get` request.
    pub fn get(key: impl Into<Key>) -> Self {
        Self::new(Operation::Get, key)
    }

    /// `lease-get` request.
    pub fn lease_get(key: impl Into<Key>) -> Self {
        Self::new(Operation::LeaseGet, key)
    }

    /// `lease-set` request carrying the lease token returned by `lease-get`.
    pub fn lease_set(key: impl Into<Key>, value: impl Into<Bytes>, token: u64) -> Self {
        Self {
            value: value.into(),
            lease_token: token,
            ..Self::new(Operation::LeaseSet, key)
        }
    }

    /// `set` request.
    pub fn set(key: impl Into<Key>, value: impl Into<Bytes>) -> Self {
        Self {
            value: value.into(),
            ..Self::new(Operation::Set, key)
        }
    }

    /// `add` request.
    pub fn add(key: impl Into<Key>, value: impl Into<Bytes>) -> Self {
        Self {
            value: value.into(),
            ..Self::new(Operation::Add, key)
        }
    }

    /// `delete` request.
    pub fn delete(key: impl Into<Key>) -> Self {
        Self::new(Operation::Delete, key)
    }

    /// `touch` request setting a new time-to-live.
    pub fn touch(key: impl Into<Key>, ttl: Duration) -> Self {
        Self::new(Operation::Touch, key).with_ttl(ttl)
    }

    /// `incr` request.
    pub fn incr(key: impl Into<Key>, delta: u64) -> Self {
        Self {
            delta,
            ..Self::new(Operation::Incr, key)
        }
    }

    /// `decr` request.
    pub fn decr(key: impl Into<Key>, delta: u64) -> Self {
        Self {
            delta,
            ..Self::new(Operation::Decr, key)
        }
    }

    /// Sets the time-to-live of the stored value.
    pub fn with_ttl(self, ttl: Duration) -> Self {
        Self {
            ttl: Some(ttl),
            ..self
        }
    }

    /// Returns an owned copy of this request addressed to `key`.
    pub fn with_key(&self, key: Key) -> Self {
        Self {
            key,
            ..self.clone()
        }
    }

    /// Operation kind.
    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// Target key.
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// Value payload; empty for operations without one.
    pub fn value(&self) -> &Bytes {
        &self.value
    }

    /// Requested time-to-live.
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    /// Lease token, meaningful for `lease-set` only.
    pub fn lease_token(&self) -> u64 {
        self.lease_token
    }

    /// Counter delta, meaningful for `incr`/`decr` only.
    pub fn delta(&self) -> u64 {
        self.delta
    }
}
