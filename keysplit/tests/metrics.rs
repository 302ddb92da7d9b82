//! Tests for verifying metrics recorded by key-split routing.

#![cfg(feature = "metrics")]

mod common;

use keysplit::KeySplitRoute;
use keysplit::offload::OffloadManager;
use keysplit_core::{Request, Route, StaticHostId};
use metrics_util::debugging::{DebugValue, DebuggingRecorder};
use metrics_util::{CompositeKey, MetricKind};

use common::RecordingRoute;

type SnapshotEntry = (
    CompositeKey,
    Option<metrics::Unit>,
    Option<metrics::SharedString>,
    DebugValue,
);

/// Sum a counter across all label sets matching `label`.
fn counter(entries: &[SnapshotEntry], name: &str, label: (&str, &str)) -> u64 {
    entries
        .iter()
        .filter(|(key, _, _, _)| key.kind() == MetricKind::Counter && key.key().name() == name)
        .filter(|(key, _, _, _)| {
            key.key()
                .labels()
                .any(|l| l.key() == label.0 && l.value() == label.1)
        })
        .map(|(_, _, _, value)| match value {
            DebugValue::Counter(v) => *v,
            _ => 0,
        })
        .sum()
}

/// Run `f` on a single-threaded runtime under a local recorder.
fn record<F, Fut>(f: F) -> Vec<SnapshotEntry>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = ()>,
{
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    metrics::with_local_recorder(&recorder, || {
        // Spawned fan-out tasks must run on this thread to see the local recorder.
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(f());
    });

    snapshotter.snapshot().into_vec()
}

fn build(child: &RecordingRoute, replicas: u64, offload: &OffloadManager) -> KeySplitRoute {
    KeySplitRoute::builder(child.shared())
        .replicas(replicas)
        .all_sync(true)
        .host_id(StaticHostId(0))
        .offload(offload.clone())
        .build()
        .unwrap()
}

#[test]
fn test_request_counter_labels_mode() {
    let entries = record(|| async {
        let child = RecordingRoute::new();
        let offload = OffloadManager::with_defaults();
        let route = build(&child, 3, &offload);

        route.route(&Request::get("foo")).await.unwrap();
        route.route(&Request::get("foo")).await.unwrap();
        route.route(&Request::delete("foo")).await.unwrap();
        offload.wait_all().await;
    });

    assert_eq!(
        counter(&entries, "keysplit_requests_total", ("operation", "get")),
        2
    );
    assert_eq!(
        counter(&entries, "keysplit_requests_total", ("mode", "assigned")),
        2
    );
    assert_eq!(
        counter(&entries, "keysplit_requests_total", ("mode", "all")),
        1
    );
}

#[test]
fn test_fanout_spawned_and_errors() {
    let entries = record(|| async {
        let child = RecordingRoute::new().fail_on("bar::2");
        let offload = OffloadManager::with_defaults();
        let route = build(&child, 3, &offload);

        route.route(&Request::set("bar", "v")).await.unwrap();
        offload.wait_all().await;
    });

    assert_eq!(
        counter(&entries, "keysplit_fanout_spawned_total", ("operation", "set")),
        2
    );
    assert_eq!(
        counter(&entries, "keysplit_fanout_errors_total", ("operation", "set")),
        1
    );
    assert_eq!(
        counter(&entries, "keysplit_offload_tasks_spawned_total", ("kind", "keysplit_fanout")),
        2
    );
}

#[test]
fn test_augment_skipped_for_long_keys() {
    let entries = record(|| async {
        let child = RecordingRoute::new();
        let offload = OffloadManager::with_defaults();
        let route = build(&child, 3, &offload);

        route.route(&Request::delete("z".repeat(300))).await.unwrap();
        offload.wait_all().await;
    });

    assert_eq!(
        counter(&entries, "keysplit_augment_skipped_total", ("operation", "delete")),
        1
    );
    assert_eq!(
        counter(&entries, "keysplit_fanout_spawned_total", ("operation", "delete")),
        0
    );
}
