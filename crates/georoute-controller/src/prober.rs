//! Health Prober
//!
//! Reachability probing for the fleet: a bare TCP connect to each node's
//! service port, bounded by a timeout. Success of the handshake is the
//! entire signal; no payload is exchanged. Refusal, network error and
//! timeout are all classified the same way: offline.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::TcpStream;
use tracing::debug;

use crate::node::EdgeNode;

/// Probe configuration.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Service port probed on every node.
    pub port: u16,
    /// Per-probe connect deadline.
    pub timeout: Duration,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            timeout: Duration::from_millis(1000),
        }
    }
}

/// Probes node reachability via plain TCP connects.
#[derive(Debug, Clone)]
pub struct HealthProber {
    config: ProbeConfig,
}

impl HealthProber {
    pub fn new(config: ProbeConfig) -> Self {
        Self { config }
    }

    /// Probes a single node.
    ///
    /// Exactly one of connect-success, connect-error or deadline expiry
    /// settles the result; `tokio::time::timeout` drops the pending connect
    /// when the deadline wins and the deadline itself is dropped the moment
    /// the connect settles, so nothing dangles either way.
    pub async fn probe(&self, node: &EdgeNode) -> bool {
        let target = SocketAddr::new(node.addr, self.config.port);
        match tokio::time::timeout(self.config.timeout, TcpStream::connect(target)).await {
            Ok(Ok(_stream)) => true,
            Ok(Err(err)) => {
                debug!("probe of {} failed: {}", target, err);
                false
            }
            Err(_elapsed) => {
                debug!("probe of {} timed out", target);
                false
            }
        }
    }

    /// Probes every node concurrently and returns the online subset.
    ///
    /// One probe task per node, unbounded fan-out, joined with an
    /// all-complete barrier: a single slow node delays the round by at most
    /// the probe timeout. Input order is preserved in the result.
    pub async fn probe_all(&self, nodes: &[EdgeNode]) -> Vec<EdgeNode> {
        let checks: Vec<_> = nodes
            .iter()
            .map(|node| async move { (node, self.probe(node).await) })
            .collect();

        let results = futures::future::join_all(checks).await;

        results
            .into_iter()
            .filter_map(|(node, online)| online.then(|| node.clone()))
            .collect()
    }
}
