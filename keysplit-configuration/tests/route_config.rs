use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use keysplit::OffloadManager;
use keysplit_configuration::{ConfigError, RouteConfig, RouteContext, RouteRegistry};
use keysplit_core::{Reply, Request, Route, RouteResult, SharedRoute, StaticHostId};
use pretty_assertions::assert_eq;

/// Destination recording the physical keys it was asked for.
#[derive(Default)]
struct KeyLog {
    keys: Mutex<Vec<String>>,
}

#[async_trait]
impl Route for KeyLog {
    async fn route(&self, request: &Request) -> RouteResult<Reply> {
        self.keys.lock().unwrap().push(request.key().to_string());
        Ok(Reply::found(Bytes::new()))
    }
}

impl KeyLog {
    fn keys(&self) -> Vec<String> {
        let mut keys = self.keys.lock().unwrap().clone();
        keys.sort();
        keys
    }
}

fn context(pool: Arc<KeyLog>, host_id: u64) -> RouteContext {
    let registry = RouteRegistry::new().with("main-pool", pool as SharedRoute);
    RouteContext::new(registry).with_host_id(StaticHostId(host_id))
}

// =============================================================================
// Parsing
// =============================================================================

#[test]
fn test_keysplit_yaml_deserialize() {
    let yaml = r#"
type: KeySplit
replicas: 3
all_sync: true
destination:
  type: Named
  name: main-pool
"#;

    let config = RouteConfig::from_yaml(yaml).expect("failed to deserialize");

    assert_eq!(
        config,
        RouteConfig::KeySplit {
            replicas: 3,
            all_sync: true,
            destination: Box::new(RouteConfig::Named {
                name: "main-pool".to_string()
            }),
        }
    );
}

#[test]
fn test_all_sync_defaults_to_false_and_child_alias() {
    let yaml = r#"
type: KeySplit
replicas: 2
child:
  type: Moka
  max_capacity: 100
"#;

    let config = RouteConfig::from_yaml(yaml).expect("failed to deserialize");

    assert_eq!(
        config,
        RouteConfig::KeySplit {
            replicas: 2,
            all_sync: false,
            destination: Box::new(RouteConfig::Moka {
                max_capacity: 100,
                name: None
            }),
        }
    );
}

#[test]
fn test_keysplit_json_deserialize() {
    let json = r#"{
        "type": "KeySplit",
        "replicas": 4,
        "destination": { "type": "Named", "name": "main-pool" }
    }"#;

    let config = RouteConfig::from_json(json).expect("failed to deserialize");

    assert!(matches!(
        config,
        RouteConfig::KeySplit {
            replicas: 4,
            all_sync: false,
            ..
        }
    ));
}

#[test]
fn test_unknown_type_is_parse_error() {
    let result = RouteConfig::from_yaml("type: Shard\nreplicas: 2\n");
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}

// =============================================================================
// Validation
// =============================================================================

#[test]
fn test_replica_bounds_are_validated() {
    for replicas in [0, 1, 1001] {
        let config = RouteConfig::KeySplit {
            replicas,
            all_sync: false,
            destination: Box::new(RouteConfig::Named {
                name: "main-pool".to_string(),
            }),
        };
        match config.validate() {
            Err(ConfigError::InvalidReplicaCount { path, value }) => {
                assert_eq!(path, "root");
                assert_eq!(value, replicas);
            }
            other => panic!("expected InvalidReplicaCount, got {other:?}"),
        }
    }
}

#[test]
fn test_nested_invalid_node_reports_path() {
    let yaml = r#"
type: KeySplit
replicas: 2
destination:
  type: KeySplit
  replicas: 1001
  destination:
    type: Named
    name: main-pool
"#;
    let config = RouteConfig::from_yaml(yaml).unwrap();

    let err = config.validate().unwrap_err();

    assert!(matches!(
        err,
        ConfigError::InvalidReplicaCount { ref path, value: 1001 } if path == "root.destination"
    ));
    assert!(err.to_string().contains("2..=1000"));
}

// =============================================================================
// Building
// =============================================================================

#[test]
fn test_unknown_named_route() {
    let config = RouteConfig::Named {
        name: "missing".to_string(),
    };

    let result = config.into_route(&RouteContext::new(RouteRegistry::new()));

    assert!(matches!(result, Err(ConfigError::UnknownRoute(name)) if name == "missing"));
}

#[test]
fn test_invalid_tree_builds_nothing() {
    let config = RouteConfig::KeySplit {
        replicas: 1,
        all_sync: false,
        destination: Box::new(RouteConfig::Named {
            name: "missing".to_string(),
        }),
    };

    // Validation runs before the named route is resolved.
    let result = config.into_route(&RouteContext::new(RouteRegistry::new()));

    assert!(matches!(result, Err(ConfigError::InvalidReplicaCount { .. })));
}

#[tokio::test]
async fn test_built_tree_routes_through_registry() {
    let pool = Arc::new(KeyLog::default());
    let offload = OffloadManager::with_defaults();
    let context = context(pool.clone(), 4).with_offload(offload.clone());
    let yaml = r#"
type: KeySplit
replicas: 3
all_sync: true
destination:
  type: Named
  name: main-pool
"#;

    let route = RouteConfig::from_yaml(yaml)
        .unwrap()
        .into_route(&context)
        .unwrap();

    assert_eq!(route.route_name(), "keysplit|replicas=3|all-sync=true|replicaId=1");

    route.route(&Request::get("foo")).await.unwrap();
    assert_eq!(pool.keys(), vec!["foo::1"]);

    route.route(&Request::set("bar", "v")).await.unwrap();
    offload.wait_all().await;
    assert_eq!(pool.keys(), vec!["bar", "bar::1", "bar::2", "foo::1"]);
}

#[cfg(feature = "moka")]
#[tokio::test]
async fn test_moka_destination() {
    let yaml = r#"
type: KeySplit
replicas: 2
destination:
  type: Moka
  max_capacity: 1000
  name: local
"#;
    let context = RouteContext::new(RouteRegistry::new()).with_host_id(StaticHostId(1));

    let route = RouteConfig::from_yaml(yaml)
        .unwrap()
        .into_route(&context)
        .unwrap();

    route.route(&Request::set("foo", "bar")).await.unwrap();
    let reply = route.route(&Request::get("foo")).await.unwrap();

    assert!(reply.is_hit());
    assert_eq!(reply.value(), Some(&Bytes::from_static(b"bar")));
}
