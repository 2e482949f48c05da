//! Index Rebuild Scheduler
//!
//! A single background loop drives every rebuild: capture the registry,
//! probe it, build a fresh index, publish it. Because the loop awaits the
//! whole cycle before the next tick, two rebuilds can never overlap, and a
//! slow older cycle can never clobber the result of a newer one. Ticks that
//! fall due while a cycle is still running are skipped.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use georoute_common::protocol::Result;

use crate::kdtree::SpatialIndex;
use crate::prober::HealthProber;
use crate::registry::NodeRegistry;

/// The published snapshot pointer.
///
/// The scheduler is its only writer and takes the write lock just long
/// enough to swap the inner `Arc`; readers clone it and query outside any
/// lock, so they always see either the old or the new complete index.
pub type SharedIndex = Arc<RwLock<Arc<SpatialIndex>>>;

pub struct RebuildScheduler {
    registry: Arc<NodeRegistry>,
    prober: HealthProber,
    index: SharedIndex,
    interval: Duration,
}

impl RebuildScheduler {
    pub fn new(
        registry: Arc<NodeRegistry>,
        prober: HealthProber,
        index: SharedIndex,
        interval: Duration,
    ) -> Self {
        Self {
            registry,
            prober,
            index,
            interval,
        }
    }

    /// Starts the rebuild loop.
    pub fn spawn(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move {
            self.run().await;
        })
    }

    async fn run(&self) {
        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            interval.tick().await;
            // A failed cycle leaves the previous snapshot current.
            if let Err(err) = self.rebuild_once().await {
                warn!("rebuild cycle failed: {}", err);
            }
        }
    }

    /// Runs one full rebuild cycle and publishes the result.
    ///
    /// The online set is derived from the registry as captured at the start
    /// of the cycle; a concurrent `loadNodes` lands in the next cycle.
    /// Returns the size of the published index.
    pub async fn rebuild_once(&self) -> Result<usize> {
        let fleet = self.registry.snapshot().await;
        let online = self.prober.probe_all(&fleet).await;
        let rebuilt = Arc::new(SpatialIndex::build(&online));
        let size = rebuilt.len();

        *self.index.write().await = rebuilt;
        debug!(total = fleet.len(), online = size, "published index snapshot");
        Ok(size)
    }
}
