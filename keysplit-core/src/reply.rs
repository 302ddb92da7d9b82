//! Replies returned by routes.

use bytes::Bytes;

/// Outcome of an operation on a destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReplyStatus {
    /// Value found.
    Found,
    /// Key missing.
    NotFound,
    /// Value stored.
    Stored,
    /// Value not stored (condition failed, e.g. `add` on an existing key or a stale lease).
    NotStored,
    /// Key already exists.
    Exists,
    /// Value deleted.
    Deleted,
    /// Expiration updated.
    Touched,
}

/// Reply to a [`Request`](crate::Request).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    status: ReplyStatus,
    value: Option<Bytes>,
    lease_token: Option<u64>,
}

impl Reply {
    /// Creates a reply without a value.
    pub fn new(status: ReplyStatus) -> Self {
        Self {
            status,
            value: None,
            lease_token: None,
        }
    }

    /// Creates a `Found` reply carrying `value`.
    pub fn found(value: impl Into<Bytes>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::new(ReplyStatus::Found)
        }
    }

    /// Attaches a value to the reply.
    pub fn with_value(self, value: impl Into<Bytes>) -> Self {
        Self {
            value: Some(value.into()),
            ..self
        }
    }

    /// Attaches a lease token to the reply.
    pub fn with_lease_token(self, token: u64) -> Self {
        Self {
            lease_token: Some(token),
            ..self
        }
    }

    /// Reply status.
    pub fn status(&self) -> ReplyStatus {
        self.status
    }

    /// Returned value, if any.
    pub fn value(&self) -> Option<&Bytes> {
        self.value.as_ref()
    }

    /// Lease token issued by `lease-get` on miss.
    pub fn lease_token(&self) -> Option<u64> {
        self.lease_token
    }

    /// Returns `true` for a `Found` reply.
    pub fn is_hit(&self) -> bool {
        self.status == ReplyStatus::Found
    }

    /// Returns `true` for a `Stored` reply.
    pub fn is_stored(&self) -> bool {
        self.status == ReplyStatus::Stored
    }
}

impl From<ReplyStatus> for Reply {
    fn from(status: ReplyStatus) -> Self {
        Self::new(status)
    }
}
