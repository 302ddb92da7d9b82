//! Metrics declaration and recording helpers.
//!
//! ## Naming Pattern
//!
//! - `keysplit_requests_total` - requests routed, by operation and fan-out mode
//! - `keysplit_augment_skipped_total` - requests forwarded unsplit because the key is too long
//! - `keysplit_fanout_{spawned,errors}_total` - background deliveries to non-assigned replicas
//! - `keysplit_offload_*` - background task manager
//!
//! Without the `metrics` feature every helper compiles to nothing.

use keysplit_core::Operation;

use crate::policy::Fanout;

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
lazy_static! {
    // Routing metrics

    /// Metric name for routed requests counter.
    pub static ref KEYSPLIT_REQUESTS_TOTAL: &'static str = {
        metrics::describe_counter!(
            "keysplit_requests_total",
            "Total number of requests routed by key-split routes."
        );
        "keysplit_requests_total"
    };

    /// Metric name for skipped augmentation counter.
    pub static ref KEYSPLIT_AUGMENT_SKIPPED: &'static str = {
        metrics::describe_counter!(
            "keysplit_augment_skipped_total",
            "Total number of requests forwarded unsplit because the key is too long."
        );
        "keysplit_augment_skipped_total"
    };

    /// Metric name for spawned fan-out deliveries counter.
    pub static ref KEYSPLIT_FANOUT_SPAWNED: &'static str = {
        metrics::describe_counter!(
            "keysplit_fanout_spawned_total",
            "Total number of background deliveries to non-assigned replicas."
        );
        "keysplit_fanout_spawned_total"
    };

    /// Metric name for failed fan-out deliveries counter.
    pub static ref KEYSPLIT_FANOUT_ERRORS: &'static str = {
        metrics::describe_counter!(
            "keysplit_fanout_errors_total",
            "Total number of failed background deliveries to non-assigned replicas."
        );
        "keysplit_fanout_errors_total"
    };

    // Offload metrics

    /// Metric name for spawned offload tasks counter.
    pub static ref OFFLOAD_TASKS_SPAWNED: &'static str = {
        metrics::describe_counter!(
            "keysplit_offload_tasks_spawned_total",
            "Total number of background tasks spawned."
        );
        "keysplit_offload_tasks_spawned_total"
    };

    /// Metric name for completed offload tasks counter.
    pub static ref OFFLOAD_TASKS_COMPLETED: &'static str = {
        metrics::describe_counter!(
            "keysplit_offload_tasks_completed_total",
            "Total number of background tasks that ran to completion."
        );
        "keysplit_offload_tasks_completed_total"
    };

    /// Metric name for timed out offload tasks counter.
    pub static ref OFFLOAD_TASKS_TIMEOUT: &'static str = {
        metrics::describe_counter!(
            "keysplit_offload_tasks_timeout_total",
            "Total number of background tasks cancelled by the timeout policy."
        );
        "keysplit_offload_tasks_timeout_total"
    };

    /// Metric name for active offload tasks gauge.
    pub static ref OFFLOAD_TASKS_ACTIVE: &'static str = {
        metrics::describe_gauge!(
            "keysplit_offload_tasks_active",
            "Number of background tasks currently running."
        );
        "keysplit_offload_tasks_active"
    };

    /// Metric name for offload task duration histogram.
    pub static ref OFFLOAD_TASK_DURATION: &'static str = {
        metrics::describe_histogram!(
            "keysplit_offload_task_duration_seconds",
            metrics::Unit::Seconds,
            "Duration of background tasks in seconds."
        );
        "keysplit_offload_task_duration_seconds"
    };
}

/// Records a routed request.
#[inline]
pub fn record_request(operation: Operation, fanout: Fanout) {
    #[cfg(feature = "metrics")]
    metrics::counter!(
        *KEYSPLIT_REQUESTS_TOTAL,
        "operation" => operation.name(),
        "mode" => fanout.name()
    )
    .increment(1);
    #[cfg(not(feature = "metrics"))]
    let _ = (operation, fanout);
}

/// Records a request forwarded unsplit because its key is too long.
#[inline]
pub fn record_augment_skipped(operation: Operation) {
    #[cfg(feature = "metrics")]
    metrics::counter!(*KEYSPLIT_AUGMENT_SKIPPED, "operation" => operation.name()).increment(1);
    #[cfg(not(feature = "metrics"))]
    let _ = operation;
}

/// Records a background delivery handed to the offload scheduler.
#[inline]
pub fn record_fanout_spawned(operation: Operation) {
    #[cfg(feature = "metrics")]
    metrics::counter!(*KEYSPLIT_FANOUT_SPAWNED, "operation" => operation.name()).increment(1);
    #[cfg(not(feature = "metrics"))]
    let _ = operation;
}

/// Records a failed background delivery.
#[inline]
pub fn record_fanout_error(operation: Operation) {
    #[cfg(feature = "metrics")]
    metrics::counter!(*KEYSPLIT_FANOUT_ERRORS, "operation" => operation.name()).increment(1);
    #[cfg(not(feature = "metrics"))]
    let _ = operation;
}
