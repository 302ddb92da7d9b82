//! Test doubles shared by the integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::{DashMap, DashSet};
use keysplit_core::{
    Key, Operation, Reply, ReplyStatus, Request, Route, RouteError, RouteResult, SharedRoute,
};
use smol_str::SmolStr;

/// Child route recording every request it receives, keyed by physical key.
///
/// Replies echo the physical key as value so tests can tell which replica
/// answered.
#[derive(Clone, Default)]
pub struct RecordingRoute {
    calls: Arc<DashMap<Key, Vec<Operation>>>,
    failing: Arc<DashSet<Key>>,
    slow: Arc<DashMap<Key, Duration>>,
}

impl RecordingRoute {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes requests for `key` fail with a connection error.
    pub fn fail_on(self, key: impl Into<Key>) -> Self {
        self.failing.insert(key.into());
        self
    }

    /// Delays requests for `key` before they are recorded and answered.
    pub fn slow_on(self, key: impl Into<Key>, delay: Duration) -> Self {
        self.slow.insert(key.into(), delay);
        self
    }

    pub fn shared(&self) -> SharedRoute {
        Arc::new(self.clone())
    }

    /// Operations received for `key`, in arrival order.
    pub fn calls(&self, key: impl Into<Key>) -> Vec<Operation> {
        self.calls
            .get(&key.into())
            .map(|ops| ops.clone())
            .unwrap_or_default()
    }

    /// All physical keys that received at least one request, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.calls.iter().map(|e| e.key().to_string()).collect();
        keys.sort();
        keys
    }

    pub fn total_calls(&self) -> usize {
        self.calls.iter().map(|e| e.value().len()).sum()
    }
}

#[async_trait]
impl Route for RecordingRoute {
    async fn route(&self, request: &Request) -> RouteResult<Reply> {
        let delay = self.slow.get(request.key()).map(|d| *d);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.calls
            .entry(request.key().clone())
            .or_default()
            .push(request.operation());

        if self.failing.contains(request.key()) {
            return Err(RouteError::Connection(Box::new(std::io::Error::other(
                "simulated connection error",
            ))));
        }

        let status = match request.operation() {
            Operation::Get | Operation::LeaseGet => ReplyStatus::Found,
            Operation::Delete => ReplyStatus::Deleted,
            Operation::Touch => ReplyStatus::Touched,
            _ => ReplyStatus::Stored,
        };
        Ok(Reply::new(status).with_value(request.key().clone().into_bytes()))
    }

    fn route_name(&self) -> SmolStr {
        SmolStr::new_static("recording")
    }
}
