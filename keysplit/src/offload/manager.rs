//! OffloadManager implementation for background task execution.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
#[cfg(feature = "metrics")]
use std::time::Instant;

use dashmap::DashMap;
use smol_str::SmolStr;
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{Instrument, info_span, warn};

use super::policy::{OffloadConfig, TimeoutPolicy};

#[cfg(feature = "metrics")]
use crate::metrics::{
    OFFLOAD_TASK_DURATION, OFFLOAD_TASKS_ACTIVE, OFFLOAD_TASKS_COMPLETED, OFFLOAD_TASKS_SPAWNED,
    OFFLOAD_TASKS_TIMEOUT,
};

/// Key identifying an offloaded task: its kind plus a per-manager sequence number.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OffloadKey {
    /// Kind of the task (e.g., "fanout").
    pub kind: SmolStr,
    /// Unique identifier within the manager.
    pub id: u64,
}

impl fmt::Display for OffloadKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.kind, self.id)
    }
}

/// Handle to a spawned offload task.
#[derive(Debug)]
pub struct OffloadHandle {
    handle: JoinHandle<()>,
}

impl OffloadHandle {
    /// Check if the task is finished.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Abort the task.
    pub fn abort(&self) {
        self.handle.abort();
    }
}

/// Internal state shared across clones.
#[derive(Debug)]
struct OffloadManagerInner {
    config: OffloadConfig,
    tasks: DashMap<OffloadKey, OffloadHandle>,
    key_counter: AtomicU64,
}

/// Manager for offloading tasks to background execution.
///
/// Tasks are spawned on the ambient tokio runtime. Outside of one,
/// [`spawn`](Self::spawn) drops the task with a warning. Nothing awaits a
/// spawned task on the request path; the bookkeeping kept here exists for
/// shutdown and tests.
#[derive(Clone, Debug)]
pub struct OffloadManager {
    inner: Arc<OffloadManagerInner>,
}

impl OffloadManager {
    /// Create a new OffloadManager with the given configuration.
    pub fn new(config: OffloadConfig) -> Self {
        Self {
            inner: Arc::new(OffloadManagerInner {
                config,
                tasks: DashMap::new(),
                key_counter: AtomicU64::new(0),
            }),
        }
    }

    /// Create a new OffloadManager with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(OffloadConfig::default())
    }

    fn next_key(&self, kind: impl Into<SmolStr>) -> OffloadKey {
        let id = self.inner.key_counter.fetch_add(1, Ordering::Relaxed);
        OffloadKey {
            kind: kind.into(),
            id,
        }
    }

    /// Spawn a task with auto-generated key and specified kind.
    ///
    /// The kind is used for metrics labels and tracing. When called outside
    /// of a tokio runtime the task is dropped without running.
    pub fn spawn<F>(&self, kind: impl Into<SmolStr>, task: F) -> OffloadKey
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let key = self.next_key(kind);

        let runtime = match Handle::try_current() {
            Ok(runtime) => runtime,
            Err(error) => {
                warn!(%key, %error, "No tokio runtime, dropping offload task");
                return key;
            }
        };

        // The task waits until its handle is tracked, so its own removal
        // always comes after the insert.
        let (tracked_tx, tracked_rx) = oneshot::channel::<()>();
        let task = async move {
            let _ = tracked_rx.await;
            task.await;
        };
        let handle = self.spawn_inner(&runtime, task, key.clone());
        self.inner.tasks.insert(key.clone(), handle);
        let _ = tracked_tx.send(());

        #[cfg(feature = "metrics")]
        {
            metrics::counter!(*OFFLOAD_TASKS_SPAWNED, "kind" => key.kind.to_string()).increment(1);
            metrics::gauge!(*OFFLOAD_TASKS_ACTIVE, "kind" => key.kind.to_string()).increment(1.0);
        }

        key
    }

    /// Get the number of currently active tasks.
    pub fn active_task_count(&self) -> usize {
        self.inner.tasks.iter().filter(|e| !e.is_finished()).count()
    }

    /// Get the total number of tracked tasks (including finished).
    pub fn total_task_count(&self) -> usize {
        self.inner.tasks.len()
    }

    /// Clean up finished task handles.
    pub fn cleanup_finished(&self) {
        self.inner.tasks.retain(|_, handle| !handle.is_finished());
    }

    /// Cancel all running tasks.
    pub fn cancel_all(&self) {
        for entry in self.inner.tasks.iter() {
            entry.abort();
        }
    }

    /// Check if a task with the given key is in flight.
    pub fn is_in_flight(&self, key: &OffloadKey) -> bool {
        self.inner.tasks.get(key).is_some_and(|h| !h.is_finished())
    }

    /// Wait for all currently tracked tasks to complete.
    pub async fn wait_all(&self) {
        loop {
            self.cleanup_finished();
            if self.inner.tasks.is_empty() {
                break;
            }
            tokio::task::yield_now().await;
        }
    }

    /// Wait for all tasks with a timeout.
    ///
    /// Returns `true` if all tasks completed within the timeout,
    /// `false` if the timeout was reached.
    pub async fn wait_all_timeout(&self, timeout: std::time::Duration) -> bool {
        tokio::time::timeout(timeout, self.wait_all()).await.is_ok()
    }

    fn spawn_inner<F>(&self, runtime: &Handle, task: F, key: OffloadKey) -> OffloadHandle
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let inner = self.inner.clone();
        let span = info_span!("offload_task", kind = %key.kind, id = key.id);

        let handle = match self.inner.config.timeout_policy {
            TimeoutPolicy::None => runtime.spawn(
                async move {
                    #[cfg(feature = "metrics")]
                    let start = Instant::now();
                    task.await;
                    inner.tasks.remove(&key);
                    #[cfg(feature = "metrics")]
                    Self::record_completion(start, &key.kind);
                }
                .instrument(span),
            ),
            TimeoutPolicy::Cancel(duration) => runtime.spawn(
                async move {
                    #[cfg(feature = "metrics")]
                    let start = Instant::now();
                    match tokio::time::timeout(duration, task).await {
                        Ok(()) => {
                            #[cfg(feature = "metrics")]
                            Self::record_completion(start, &key.kind);
                        }
                        Err(_) => {
                            warn!(%key, "Offload task cancelled due to timeout");
                            #[cfg(feature = "metrics")]
                            Self::record_timeout(start, &key.kind);
                        }
                    }
                    inner.tasks.remove(&key);
                }
                .instrument(span),
            ),
            TimeoutPolicy::Warn(duration) => runtime.spawn(
                async move {
                    let start = std::time::Instant::now();
                    task.await;
                    let elapsed = start.elapsed();
                    if elapsed > duration {
                        warn!(
                            %key,
                            elapsed_ms = elapsed.as_millis(),
                            threshold_ms = duration.as_millis(),
                            "Offload task exceeded timeout threshold"
                        );
                    }
                    inner.tasks.remove(&key);
                    #[cfg(feature = "metrics")]
                    Self::record_completion(start, &key.kind);
                }
                .instrument(span),
            ),
        };

        OffloadHandle { handle }
    }

    #[cfg(feature = "metrics")]
    fn record_completion(start: Instant, kind: &SmolStr) {
        let duration = start.elapsed().as_secs_f64();
        metrics::counter!(*OFFLOAD_TASKS_COMPLETED, "kind" => kind.to_string()).increment(1);
        metrics::gauge!(*OFFLOAD_TASKS_ACTIVE, "kind" => kind.to_string()).decrement(1.0);
        metrics::histogram!(*OFFLOAD_TASK_DURATION, "kind" => kind.to_string()).record(duration);
    }

    #[cfg(feature = "metrics")]
    fn record_timeout(start: Instant, kind: &SmolStr) {
        let duration = start.elapsed().as_secs_f64();
        metrics::counter!(*OFFLOAD_TASKS_TIMEOUT, "kind" => kind.to_string()).increment(1);
        metrics::gauge!(*OFFLOAD_TASKS_ACTIVE, "kind" => kind.to_string()).decrement(1.0);
        metrics::histogram!(*OFFLOAD_TASK_DURATION, "kind" => kind.to_string()).record(duration);
    }
}

impl Default for OffloadManager {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl keysplit_core::Offload for OffloadManager {
    fn spawn<F>(&self, kind: impl Into<SmolStr>, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        OffloadManager::spawn(self, kind, future);
    }
}
