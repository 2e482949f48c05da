//! Routing Controller
//!
//! The single owning instance for all shared state: the node registry, the
//! published index snapshot, the rebuild scheduler and the serving listener.
//! Control API operations and closest-node queries all go through methods on
//! this type; nothing is ambient.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::info;

use georoute_common::protocol::{Result, StatusReply};

use crate::geo::GeoResolver;
use crate::kdtree::SpatialIndex;
use crate::prober::{HealthProber, ProbeConfig};
use crate::query::QueryService;
use crate::registry::NodeRegistry;
use crate::scheduler::{RebuildScheduler, SharedIndex};
use crate::serving::{ServingHandle, ServingListener};

/// Controller configuration.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Address the content-serving listener binds when started.
    pub serve_bind: SocketAddr,
    /// Health probe settings.
    pub probe: ProbeConfig,
    /// Period of the rebuild loop.
    pub rebuild_interval: Duration,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            serve_bind: SocketAddr::from(([127, 0, 0, 1], 8080)),
            probe: ProbeConfig::default(),
            rebuild_interval: Duration::from_millis(2000),
        }
    }
}

/// The geo-proximity routing controller.
///
/// Created with an empty registry and an empty index; the background
/// scheduler starts ticking immediately and keeps the index in step with
/// whatever `load_nodes` installs. The serving listener starts stopped.
pub struct Controller {
    registry: Arc<NodeRegistry>,
    query: Arc<QueryService>,
    scheduler: Arc<RebuildScheduler>,
    serving: Mutex<Option<ServingHandle>>,
    serve_bind: SocketAddr,
    /// Kept so the rebuild loop is not dropped.
    _scheduler_handle: JoinHandle<()>,
}

impl Controller {
    /// Creates a controller and spawns its rebuild scheduler.
    pub fn new(resolver: Arc<dyn GeoResolver>, config: ControllerConfig) -> Arc<Self> {
        let registry = Arc::new(NodeRegistry::new(resolver.clone()));
        let index: SharedIndex = Arc::new(RwLock::new(Arc::new(SpatialIndex::empty())));
        let query = Arc::new(QueryService::new(resolver, index.clone()));

        let scheduler = Arc::new(RebuildScheduler::new(
            registry.clone(),
            HealthProber::new(config.probe.clone()),
            index,
            config.rebuild_interval,
        ));
        let scheduler_handle = scheduler.clone().spawn();

        info!(
            interval_ms = config.rebuild_interval.as_millis() as u64,
            probe_port = config.probe.port,
            "controller initialized"
        );

        Arc::new(Self {
            registry,
            query,
            scheduler,
            serving: Mutex::new(None),
            serve_bind: config.serve_bind,
            _scheduler_handle: scheduler_handle,
        })
    }

    /// Activates the serving listener.
    ///
    /// Calling while already running is not an error and does not spawn a
    /// second listener.
    pub async fn start(&self) -> Result<String> {
        let mut serving = self.serving.lock().await;
        if serving.is_some() {
            return Ok("Serving endpoint already running".into());
        }

        let handle = ServingListener::start(self.serve_bind, self.query.clone()).await?;
        info!("serving endpoint started on {}", handle.local_addr);
        *serving = Some(handle);
        Ok("Started serving endpoint".into())
    }

    /// Deactivates the serving listener.
    ///
    /// Stopping while already stopped (or never started) is a well-defined
    /// non-error.
    pub async fn stop(&self) -> Result<String> {
        let mut serving = self.serving.lock().await;
        match serving.take() {
            Some(handle) => {
                handle.shutdown().await;
                info!("serving endpoint stopped");
                Ok("Stopped serving endpoint".into())
            }
            None => Ok("Serving endpoint was not running".into()),
        }
    }

    /// Reports the serving listener state. Pure observer, no transition.
    pub async fn status(&self) -> StatusReply {
        StatusReply {
            running: self.serving.lock().await.is_some(),
        }
    }

    /// Replaces the registry; see [`NodeRegistry::load`].
    ///
    /// Deliberately does not kick a rebuild: the scheduler is the sole
    /// rebuild trigger, so rapid successive loads cannot cause a rebuild
    /// storm.
    pub async fn load_nodes(&self, addresses: &[String]) -> Result<usize> {
        self.registry.load(addresses).await
    }

    /// Answers "closest node" for a client address; see
    /// [`QueryService::closest_node`].
    pub async fn closest_node(&self, client_address: &str) -> Result<String> {
        self.query.closest_node(client_address).await
    }

    /// Runs one rebuild cycle immediately, outside the schedule. Used by
    /// tests and operational tooling; the periodic loop is unaffected.
    pub async fn rebuild_now(&self) -> Result<usize> {
        self.scheduler.rebuild_once().await
    }

    /// Where the serving listener is currently bound, if running.
    pub async fn serving_addr(&self) -> Option<SocketAddr> {
        self.serving.lock().await.as_ref().map(|h| h.local_addr)
    }

    /// The query service, shared with the serving listener.
    pub fn query_service(&self) -> Arc<QueryService> {
        self.query.clone()
    }

    pub async fn registry_len(&self) -> usize {
        self.registry.len().await
    }
}
