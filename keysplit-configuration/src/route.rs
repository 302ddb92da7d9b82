use std::collections::HashMap;
use std::sync::Arc;

use keysplit::{KeySplitRoute, MAX_REPLICA_COUNT, MIN_REPLICA_COUNT, OffloadManager, ProcessHostId};
use keysplit_core::{HostId, SharedRoute};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;

/// Routes created outside of the configuration, looked up by name.
#[derive(Clone, Default)]
pub struct RouteRegistry {
    routes: HashMap<String, SharedRoute>,
}

impl RouteRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `route` under `name`, replacing any previous entry.
    pub fn register(&mut self, name: impl Into<String>, route: SharedRoute) -> &mut Self {
        self.routes.insert(name.into(), route);
        self
    }

    /// Builder-style variant of [`register`](Self::register).
    pub fn with(mut self, name: impl Into<String>, route: SharedRoute) -> Self {
        self.register(name, route);
        self
    }

    /// Looks up a route by name.
    pub fn get(&self, name: &str) -> Option<SharedRoute> {
        self.routes.get(name).cloned()
    }

    /// Number of registered routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether no route is registered.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl std::fmt::Debug for RouteRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteRegistry")
            .field("routes", &self.routes.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Shared state for building a route tree.
///
/// Every key-split node built with the same context shares its host
/// identity and background task manager.
#[derive(Clone)]
pub struct RouteContext {
    registry: RouteRegistry,
    host: Arc<dyn HostId>,
    offload: OffloadManager,
}

impl RouteContext {
    /// Creates a context using the process host identity and a default
    /// [`OffloadManager`].
    pub fn new(registry: RouteRegistry) -> Self {
        Self {
            registry,
            host: Arc::new(ProcessHostId),
            offload: OffloadManager::default(),
        }
    }

    /// Replaces the host identity used by key-split nodes.
    pub fn with_host_id(self, host: impl HostId + 'static) -> Self {
        self.with_host(Arc::new(host))
    }

    /// Replaces the host identity with an already shared provider.
    pub fn with_host(self, host: Arc<dyn HostId>) -> Self {
        Self { host, ..self }
    }

    /// Replaces the background task manager.
    pub fn with_offload(self, offload: OffloadManager) -> Self {
        Self { offload, ..self }
    }

    /// Routes available to `Named` nodes.
    pub fn registry(&self) -> &RouteRegistry {
        &self.registry
    }

    /// Host identity shared by every key-split node.
    pub fn host(&self) -> &Arc<dyn HostId> {
        &self.host
    }

    /// Manager running background fan-out for every key-split node.
    pub fn offload(&self) -> &OffloadManager {
        &self.offload
    }
}

impl std::fmt::Debug for RouteContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteContext")
            .field("registry", &self.registry)
            .field("host_id", &self.host.host_id())
            .finish()
    }
}

/// A node of a route tree.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum RouteConfig {
    /// Splits keys across replicas of the destination.
    KeySplit {
        /// Number of replicas, `2..=1000`.
        replicas: u64,
        /// Deliver sets to every replica, not only the assigned one.
        #[serde(default)]
        all_sync: bool,
        /// Route receiving the per-replica requests.
        #[serde(alias = "child")]
        destination: Box<RouteConfig>,
    },
    /// In-process cache, mostly useful for tests and local setups.
    Moka {
        /// Maximum number of entries.
        max_capacity: u64,
        /// Route name reported by `route_name`.
        #[serde(default)]
        name: Option<String>,
    },
    /// Route supplied through the [`RouteRegistry`].
    Named {
        /// Registry key.
        name: String,
    },
}

impl RouteConfig {
    /// Parses a route tree from YAML.
    pub fn from_yaml(source: &str) -> Result<Self, ConfigError> {
        serde_saphyr::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Parses a route tree from JSON.
    pub fn from_json(source: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Checks every node of the tree without building anything.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_at("root")
    }

    fn validate_at(&self, path: &str) -> Result<(), ConfigError> {
        match self {
            RouteConfig::KeySplit {
                replicas,
                destination,
                ..
            } => {
                let range = u64::from(MIN_REPLICA_COUNT)..=u64::from(MAX_REPLICA_COUNT);
                if !range.contains(replicas) {
                    return Err(ConfigError::InvalidReplicaCount {
                        path: path.to_string(),
                        value: *replicas,
                    });
                }
                destination.validate_at(&format!("{path}.destination"))
            }
            RouteConfig::Moka { .. } | RouteConfig::Named { .. } => Ok(()),
        }
    }

    /// Validates the tree and builds it.
    pub fn into_route(self, context: &RouteContext) -> Result<SharedRoute, ConfigError> {
        self.validate()?;
        self.build(context)
    }

    fn build(self, context: &RouteContext) -> Result<SharedRoute, ConfigError> {
        match self {
            RouteConfig::KeySplit {
                replicas,
                all_sync,
                destination,
            } => {
                let child = destination.build(context)?;
                let route = KeySplitRoute::builder(child)
                    .replicas(replicas)
                    .all_sync(all_sync)
                    .host(Arc::clone(&context.host))
                    .offload(context.offload.clone())
                    .build()?;
                debug!(route = %keysplit_core::Route::route_name(&route), "Built key-split route");
                Ok(Arc::new(route))
            }
            #[cfg(feature = "moka")]
            RouteConfig::Moka { max_capacity, name } => {
                let mut builder = keysplit_moka::MokaRoute::builder(max_capacity);
                if let Some(name) = name {
                    builder = builder.name(name);
                }
                Ok(Arc::new(builder.build()))
            }
            #[cfg(not(feature = "moka"))]
            RouteConfig::Moka { .. } => Err(ConfigError::RouteNotAvailable("Moka".to_string())),
            RouteConfig::Named { name } => context
                .registry
                .get(&name)
                .ok_or(ConfigError::UnknownRoute(name)),
        }
    }
}
