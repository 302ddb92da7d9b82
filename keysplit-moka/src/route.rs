//! Moka destination route.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use bytes::Bytes;
use keysplit_core::{Key, Operation, Reply, ReplyStatus, Request, Route, RouteError, RouteResult};
use moka::future::Cache;
use smol_str::SmolStr;

use crate::builder::MokaRouteBuilder;

/// Stored value with its absolute expiration deadline.
#[derive(Debug, Clone)]
pub(crate) struct Entry {
    value: Bytes,
    expire: Option<Instant>,
}

impl Entry {
    fn new(value: Bytes, ttl: Option<Duration>) -> Self {
        Self {
            value,
            expire: ttl.map(|ttl| Instant::now() + ttl),
        }
    }

    pub(crate) fn time_to_live(&self) -> Option<Duration> {
        self.expire
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }
}

/// In-memory destination answering requests like a memcache server.
///
/// Cloning is cheap and clones share the same storage.
///
/// # Caveats
///
/// - `add`, `touch`, `incr` and `decr` read then write; concurrent updates
///   of the same key may interleave.
/// - Expiration is **best-effort**, as in Moka.
#[derive(Clone)]
pub struct MokaRoute {
    pub(crate) cache: Cache<Key, Entry>,
    pub(crate) leases: Cache<Key, u64>,
    pub(crate) next_token: Arc<AtomicU64>,
    pub(crate) name: SmolStr,
}

impl std::fmt::Debug for MokaRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MokaRoute")
            .field("name", &self.name)
            .field("entries", &self.cache.entry_count())
            .finish()
    }
}

impl MokaRoute {
    /// Creates a new builder holding at most `max_capacity` entries.
    pub fn builder(max_capacity: u64) -> MokaRouteBuilder {
        MokaRouteBuilder::new(max_capacity)
    }

    /// Returns the stored value for `key`, bypassing request handling.
    pub async fn peek(&self, key: &Key) -> Option<Bytes> {
        self.cache.get(key).await.map(|entry| entry.value)
    }

    /// Returns `true` if `key` holds a value.
    pub fn contains(&self, key: &Key) -> bool {
        self.cache.contains_key(key)
    }

    /// Processes pending maintenance and returns the number of entries.
    pub async fn entry_count(&self) -> u64 {
        self.cache.run_pending_tasks().await;
        self.cache.entry_count()
    }

    async fn get(&self, key: &Key) -> Reply {
        match self.cache.get(key).await {
            Some(entry) => Reply::found(entry.value),
            None => Reply::new(ReplyStatus::NotFound),
        }
    }

    async fn lease_get(&self, key: &Key) -> Reply {
        if let Some(entry) = self.cache.get(key).await {
            return Reply::found(entry.value);
        }
        let token = self.next_token.fetch_add(1, Ordering::Relaxed);
        self.leases.insert(key.clone(), token).await;
        Reply::new(ReplyStatus::NotFound).with_lease_token(token)
    }

    async fn lease_set(&self, request: &Request) -> Reply {
        let key = request.key();
        match self.leases.get(key).await {
            Some(token) if token == request.lease_token() => {
                self.leases.invalidate(key).await;
                self.store(request).await
            }
            _ => Reply::new(ReplyStatus::NotStored),
        }
    }

    async fn store(&self, request: &Request) -> Reply {
        let entry = Entry::new(request.value().clone(), request.ttl());
        self.cache.insert(request.key().clone(), entry).await;
        Reply::new(ReplyStatus::Stored)
    }

    async fn set(&self, request: &Request) -> Reply {
        self.leases.invalidate(request.key()).await;
        self.store(request).await
    }

    async fn add(&self, request: &Request) -> Reply {
        let entry = Entry::new(request.value().clone(), request.ttl());
        let inserted = self
            .cache
            .entry(request.key().clone())
            .or_insert(entry)
            .await;
        if inserted.is_fresh() {
            Reply::new(ReplyStatus::Stored)
        } else {
            Reply::new(ReplyStatus::NotStored)
        }
    }

    async fn delete(&self, key: &Key) -> Reply {
        self.leases.invalidate(key).await;
        match self.cache.remove(key).await {
            Some(_) => Reply::new(ReplyStatus::Deleted),
            None => Reply::new(ReplyStatus::NotFound),
        }
    }

    async fn touch(&self, request: &Request) -> Reply {
        match self.cache.get(request.key()).await {
            Some(entry) => {
                let touched = Entry::new(entry.value, request.ttl());
                self.cache.insert(request.key().clone(), touched).await;
                Reply::new(ReplyStatus::Touched)
            }
            None => Reply::new(ReplyStatus::NotFound),
        }
    }

    async fn arithmetic(&self, request: &Request) -> RouteResult<Reply> {
        let key = request.key();
        let Some(entry) = self.cache.get(key).await else {
            return Ok(Reply::new(ReplyStatus::NotFound));
        };

        let current: u64 = std::str::from_utf8(&entry.value)
            .ok()
            .and_then(|text| text.trim().parse().ok())
            .ok_or_else(|| {
                RouteError::internal(format!("value of `{key}` is not a decimal number"))
            })?;
        let updated = match request.operation() {
            Operation::Decr => current.saturating_sub(request.delta()),
            _ => current.wrapping_add(request.delta()),
        };

        let value = Bytes::from(updated.to_string());
        let updated_entry = Entry {
            value: value.clone(),
            expire: entry.expire,
        };
        self.cache.insert(key.clone(), updated_entry).await;
        Ok(Reply::new(ReplyStatus::Stored).with_value(value))
    }
}

#[async_trait]
impl Route for MokaRoute {
    async fn route(&self, request: &Request) -> RouteResult<Reply> {
        let reply = match request.operation() {
            Operation::Get => self.get(request.key()).await,
            Operation::LeaseGet => self.lease_get(request.key()).await,
            Operation::LeaseSet => self.lease_set(request).await,
            Operation::Set => self.set(request).await,
            Operation::Add => self.add(request).await,
            Operation::Delete => self.delete(request.key()).await,
            Operation::Touch => self.touch(request).await,
            Operation::Incr | Operation::Decr => self.arithmetic(request).await?,
        };
        tracing::trace!(
            route = %self.name,
            operation = %request.operation(),
            key = %request.key(),
            status = ?reply.status(),
            "Request served"
        );
        Ok(reply)
    }

    fn route_name(&self) -> SmolStr {
        self.name.clone()
    }
}
