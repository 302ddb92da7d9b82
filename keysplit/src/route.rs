//! Key-split route handle.
//!
//! [`KeySplitRoute`] lets a single logical key live on several hosts of a
//! destination pool to keep a hot key from overwhelming one host. Each
//! replica stores the key under its own physical name (`key`, `key::1`,
//! `key::2`, ...), and the child route hashes those names to different hosts.
//!
//! # Replica assignment
//!
//! Every process is pinned to one replica, `host_id % replicas`. Requests
//! that need a single target always use that replica, which keeps reads from
//! one host on one physical key.
//!
//! # Dispatch
//!
//! | Operation | Replicas |
//! |---|---|
//! | get, lease-get, lease-set | assigned |
//! | set | all if `all_sync`, otherwise assigned |
//! | delete | all |
//! | add, touch, incr, decr | assigned |
//!
//! When a request goes to all replicas, the assigned replica is served on the
//! caller's path and its reply is returned. The other replicas are served by
//! background tasks whose outcome is never reported back.
//!
//! # Long keys
//!
//! A key is only split if it has room for the widest replica suffix within
//! [`MAX_KEY_LENGTH`]. Otherwise the request is forwarded to the child
//! unchanged, once, as if splitting were disabled.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use keysplit_core::{
    HostId, MAX_KEY_LENGTH, Offload, Reply, Request, Route, RouteResult, RouteTraverser,
    SharedRoute,
};
use smol_str::{SmolStr, format_smolstr};
use tracing::{debug, trace};

use crate::augment::{REPLICA_SEPARATOR, augment, can_augment};
use crate::host::ProcessHostId;
use crate::metrics;
use crate::offload::OffloadManager;
use crate::policy::{Dispatch, Fanout};
use crate::replica::{MAX_REPLICA_COUNT, ReplicaCount, assigned_replica};
use crate::ConfigError;

const FANOUT_TASK: &str = "keysplit_fanout";

/// Route that splits one logical key across several replicas.
///
/// Configuration is fixed at construction. Every call is a pure function of
/// that configuration, the host identity and the request.
pub struct KeySplitRoute<O = OffloadManager> {
    child: SharedRoute,
    replicas: ReplicaCount,
    all_sync: bool,
    host: Arc<dyn HostId>,
    offload: O,
}

impl KeySplitRoute<OffloadManager> {
    /// Creates a builder forwarding to `child`.
    ///
    /// The default [`OffloadManager`] runs fan-out on the ambient tokio
    /// runtime. Requests routed outside of one reach the assigned replica
    /// only, and a warning is logged for every dropped delivery.
    pub fn builder(child: SharedRoute) -> KeySplitRouteBuilder<OffloadManager> {
        KeySplitRouteBuilder::new(child)
    }
}

impl<O> KeySplitRoute<O>
where
    O: Offload,
{
    /// Creates a route from already validated parameters.
    pub fn new(
        child: SharedRoute,
        replicas: ReplicaCount,
        all_sync: bool,
        host: Arc<dyn HostId>,
        offload: O,
    ) -> Self {
        Self {
            child,
            replicas,
            all_sync,
            host,
            offload,
        }
    }

    /// The route requests are forwarded to.
    pub fn child(&self) -> &SharedRoute {
        &self.child
    }

    /// Number of replicas.
    pub fn replicas(&self) -> ReplicaCount {
        self.replicas
    }

    /// Whether sets are delivered to every replica.
    pub fn all_sync(&self) -> bool {
        self.all_sync
    }

    /// Host identity provider.
    pub fn host(&self) -> &Arc<dyn HostId> {
        &self.host
    }

    /// Replica this process is pinned to.
    pub fn replica_id(&self) -> u64 {
        assigned_replica(self.host.host_id(), self.replica_count())
    }

    fn replica_count(&self) -> u64 {
        u64::from(self.replicas.get())
    }

    fn can_split(&self, request: &Request) -> bool {
        can_augment(
            request.key(),
            u64::from(MAX_REPLICA_COUNT),
            MAX_KEY_LENGTH,
        )
    }

    /// Request as replica `replica` receives it.
    fn request_for<'a>(&self, request: &'a Request, replica: u64) -> Cow<'a, Request> {
        if replica > 0 {
            Cow::Owned(request.with_key(augment(request.key(), replica, REPLICA_SEPARATOR)))
        } else {
            Cow::Borrowed(request)
        }
    }

    /// Forwards `request` to replica `replica` and returns its reply.
    #[tracing::instrument(skip(self, request), fields(operation = %request.operation()), level = "trace")]
    pub async fn route_one(&self, request: &Request, replica: u64) -> RouteResult<Reply> {
        let request = self.request_for(request, replica);
        self.child.route(&request).await
    }

    /// Delivers `request` to every replica.
    ///
    /// Replicas other than `replica` are served by background tasks that own
    /// a copy of their request and a handle to the child. Their outcome is
    /// discarded. The reply of `replica` is returned.
    #[tracing::instrument(skip(self, request), fields(operation = %request.operation()), level = "trace")]
    pub async fn route_all(&self, request: &Request, replica: u64) -> RouteResult<Reply> {
        let operation = request.operation();
        for id in (0..self.replica_count()).filter(|id| *id != replica) {
            let replica_request = self.request_for(request, id).into_owned();
            let child = Arc::clone(&self.child);
            self.offload.spawn(FANOUT_TASK, async move {
                match child.route(&replica_request).await {
                    Ok(reply) => {
                        trace!(replica = id, status = ?reply.status(), "Fan-out delivered");
                    }
                    Err(error) => {
                        debug!(
                            replica = id,
                            key = %replica_request.key(),
                            %error,
                            "Fan-out delivery failed"
                        );
                        metrics::record_fanout_error(operation);
                    }
                }
            });
            metrics::record_fanout_spawned(operation);
        }

        self.route_one(request, replica).await
    }
}

#[async_trait]
impl<O> Route for KeySplitRoute<O>
where
    O: Offload + 'static,
{
    async fn route(&self, request: &Request) -> RouteResult<Reply> {
        let operation = request.operation();
        if !self.can_split(request) {
            debug!(
                %operation,
                key_len = request.key().len(),
                "Key too long to split, forwarding unchanged"
            );
            metrics::record_augment_skipped(operation);
            return self.child.route(request).await;
        }

        let replica = self.replica_id();
        let fanout = Dispatch::for_operation(operation).fanout(self.all_sync);
        metrics::record_request(operation, fanout);

        match fanout {
            Fanout::Assigned => self.route_one(request, replica).await,
            Fanout::All => self.route_all(request, replica).await,
        }
    }

    fn route_name(&self) -> SmolStr {
        format_smolstr!(
            "keysplit|replicas={}|all-sync={}|replicaId={}",
            self.replicas.get(),
            self.all_sync,
            self.replica_id()
        )
    }

    /// Reports the assigned replica only, even for operations that fan out
    /// to every replica when routed.
    fn traverse(&self, request: &Request, traverser: &dyn RouteTraverser) {
        if !self.can_split(request) {
            traverser.visit(&*self.child, request);
            return;
        }
        let request = self.request_for(request, self.replica_id());
        traverser.visit(&*self.child, &request);
    }
}

impl<O> fmt::Debug for KeySplitRoute<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeySplitRoute")
            .field("child", &self.child.route_name())
            .field("replicas", &self.replicas.get())
            .field("all_sync", &self.all_sync)
            .field("host_id", &self.host.host_id())
            .finish()
    }
}

/// Builder for [`KeySplitRoute`].
///
/// Use [`KeySplitRoute::builder`] to create a new builder. The replica count
/// is validated by [`build`](Self::build).
///
/// ```
/// use std::sync::Arc;
/// use keysplit::{ConfigError, KeySplitRoute, StaticHostId};
/// # use keysplit::{Reply, Request, Route, RouteResult, SharedRoute};
/// # struct Pool;
/// # #[async_trait::async_trait]
/// # impl Route for Pool {
/// #     async fn route(&self, _req: &Request) -> RouteResult<Reply> { unimplemented!() }
/// # }
/// # let pool: SharedRoute = Arc::new(Pool);
///
/// let err = KeySplitRoute::builder(pool.clone()).replicas(1).build().unwrap_err();
/// assert_eq!(err, ConfigError::InvalidReplicaCount(1));
///
/// let route = KeySplitRoute::builder(pool)
///     .replicas(4)
///     .host_id(StaticHostId(6))
///     .build()
///     .unwrap();
/// assert_eq!(route.replica_id(), 2);
/// ```
pub struct KeySplitRouteBuilder<O = OffloadManager> {
    child: SharedRoute,
    replicas: u64,
    all_sync: bool,
    host: Arc<dyn HostId>,
    offload: O,
}

impl KeySplitRouteBuilder<OffloadManager> {
    /// Creates a builder with two replicas, `all_sync` disabled, the process
    /// host identity and a default [`OffloadManager`].
    pub fn new(child: SharedRoute) -> Self {
        Self {
            child,
            replicas: u64::from(crate::MIN_REPLICA_COUNT),
            all_sync: false,
            host: Arc::new(ProcessHostId),
            offload: OffloadManager::default(),
        }
    }
}

impl<O> KeySplitRouteBuilder<O>
where
    O: Offload,
{
    /// Sets the number of replicas.
    pub fn replicas(self, replicas: u64) -> Self {
        Self { replicas, ..self }
    }

    /// Enables delivery of sets to every replica.
    pub fn all_sync(self, all_sync: bool) -> Self {
        Self { all_sync, ..self }
    }

    /// Sets the host identity provider.
    pub fn host_id(self, host: impl HostId + 'static) -> Self {
        Self {
            host: Arc::new(host),
            ..self
        }
    }

    /// Sets an already shared host identity provider.
    pub fn host(self, host: Arc<dyn HostId>) -> Self {
        Self { host, ..self }
    }

    /// Sets the scheduler used for background fan-out.
    pub fn offload<O2: Offload>(self, offload: O2) -> KeySplitRouteBuilder<O2> {
        KeySplitRouteBuilder {
            child: self.child,
            replicas: self.replicas,
            all_sync: self.all_sync,
            host: self.host,
            offload,
        }
    }

    /// Validates the configuration and builds the route.
    pub fn build(self) -> Result<KeySplitRoute<O>, ConfigError> {
        let replicas = u16::try_from(self.replicas)
            .ok()
            .and_then(ReplicaCount::new)
            .ok_or(ConfigError::InvalidReplicaCount(self.replicas))?;
        Ok(KeySplitRoute::new(
            self.child,
            replicas,
            self.all_sync,
            self.host,
            self.offload,
        ))
    }
}
