//! End-to-end routing through KeySplitRoute into an in-memory pool.

use std::sync::Arc;

use bytes::Bytes;
use keysplit::KeySplitRoute;
use keysplit::offload::OffloadManager;
use keysplit_core::{Key, ReplyStatus, Request, Route, SharedRoute, StaticHostId};
use keysplit_moka::MokaRoute;

fn host_route(pool: &MokaRoute, offload: &OffloadManager, host_id: u64) -> KeySplitRoute {
    let child: SharedRoute = Arc::new(pool.clone());
    KeySplitRoute::builder(child)
        .replicas(3)
        .all_sync(true)
        .host_id(StaticHostId(host_id))
        .offload(offload.clone())
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_all_sync_set_is_visible_from_every_host() {
    let pool = MokaRoute::builder(1_000).build();
    let offload = OffloadManager::with_defaults();
    let writer = host_route(&pool, &offload, 0);

    writer.route(&Request::set("hot", "value")).await.unwrap();
    offload.wait_all().await;

    for host_id in 0..3 {
        let reader = host_route(&pool, &offload, host_id);
        let reply = reader.route(&Request::get("hot")).await.unwrap();
        assert!(reply.is_hit(), "host {host_id}");
        assert_eq!(reply.value(), Some(&Bytes::from_static(b"value")));
    }
    assert_eq!(pool.entry_count().await, 3);
}

#[tokio::test]
async fn test_delete_clears_every_replica() {
    let pool = MokaRoute::builder(1_000).build();
    let offload = OffloadManager::with_defaults();
    let route = host_route(&pool, &offload, 2);

    route.route(&Request::set("hot", "value")).await.unwrap();
    offload.wait_all().await;
    assert_eq!(pool.entry_count().await, 3);

    let reply = route.route(&Request::delete("hot")).await.unwrap();
    offload.wait_all().await;

    assert_eq!(reply.status(), ReplyStatus::Deleted);
    for key in ["hot", "hot::1", "hot::2"] {
        assert!(!pool.contains(&Key::from(key)), "{key}");
    }
}

#[tokio::test]
async fn test_lease_is_scoped_to_assigned_replica() {
    let pool = MokaRoute::builder(1_000).build();
    let offload = OffloadManager::with_defaults();
    let route = host_route(&pool, &offload, 1);

    let miss = route.route(&Request::lease_get("hot")).await.unwrap();
    let token = miss.lease_token().unwrap();
    let stored = route
        .route(&Request::lease_set("hot", "value", token))
        .await
        .unwrap();
    offload.wait_all().await;

    assert!(stored.is_stored());
    assert_eq!(
        pool.peek(&Key::from("hot::1")).await,
        Some(Bytes::from_static(b"value"))
    );
    assert!(!pool.contains(&Key::from("hot")));
    assert!(!pool.contains(&Key::from("hot::2")));
}
