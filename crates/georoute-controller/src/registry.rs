//! Node Registry
//!
//! Holds the administrator-supplied fleet. `load` is a full swap: the new
//! set replaces the old one atomically, so a second call with a shorter list
//! shrinks the fleet. Readers clone an `Arc` of the current set; in-flight
//! probe rounds keep working off the snapshot they captured even if the
//! registry is replaced underneath them.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};

use georoute_common::protocol::{GeorouteError, Result};

use crate::geo::GeoResolver;
use crate::node::EdgeNode;

pub struct NodeRegistry {
    resolver: Arc<dyn GeoResolver>,
    nodes: RwLock<Arc<Vec<EdgeNode>>>,
}

impl NodeRegistry {
    /// Creates an empty registry backed by the given resolver.
    pub fn new(resolver: Arc<dyn GeoResolver>) -> Self {
        Self {
            resolver,
            nodes: RwLock::new(Arc::new(Vec::new())),
        }
    }

    /// Replaces the registry with the resolved subset of `addresses`.
    ///
    /// Each address is geocoded through the resolver. Addresses that fail to
    /// parse or to resolve are dropped with a warning; the call still
    /// succeeds and reports how many nodes were kept. Only total failure is
    /// an error: a non-empty input from which nothing resolved returns
    /// [`GeorouteError::NoNodesResolved`] and leaves the previous set in
    /// place.
    ///
    /// Loading does not trigger an index rebuild; the next scheduler tick
    /// picks up the new set.
    pub async fn load(&self, addresses: &[String]) -> Result<usize> {
        let mut resolved = Vec::with_capacity(addresses.len());

        for raw in addresses {
            let ip = match raw.parse() {
                Ok(ip) => ip,
                Err(_) => {
                    warn!("dropping unparseable node address {:?}", raw);
                    continue;
                }
            };
            match self.resolver.resolve(ip) {
                Some(location) => resolved.push(EdgeNode::new(ip, location)),
                None => warn!("dropping node {} with no geolocation", ip),
            }
        }

        if resolved.is_empty() && !addresses.is_empty() {
            return Err(GeorouteError::NoNodesResolved);
        }

        let count = resolved.len();
        *self.nodes.write().await = Arc::new(resolved);
        info!(submitted = addresses.len(), loaded = count, "registry replaced");
        Ok(count)
    }

    /// The current node set. Cheap; clones an `Arc`.
    pub async fn snapshot(&self) -> Arc<Vec<EdgeNode>> {
        self.nodes.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.nodes.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.nodes.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{GeoPoint, StaticGeoResolver};

    fn resolver_with(entries: &[(&str, f64, f64)]) -> Arc<StaticGeoResolver> {
        let mut resolver = StaticGeoResolver::default();
        for (ip, lat, lon) in entries {
            resolver.insert(ip.parse().unwrap(), GeoPoint::new(*lat, *lon));
        }
        Arc::new(resolver)
    }

    #[tokio::test]
    async fn test_load_all_resolve() {
        let resolver = resolver_with(&[("1.1.1.1", 10.0, 10.0), ("2.2.2.2", 20.0, 20.0)]);
        let registry = NodeRegistry::new(resolver);

        let count = registry
            .load(&["1.1.1.1".into(), "2.2.2.2".into()])
            .await
            .unwrap();
        assert_eq!(count, 2);
        assert_eq!(registry.len().await, 2);
    }

    #[tokio::test]
    async fn test_load_drops_unresolvable() {
        let resolver = resolver_with(&[("1.1.1.1", 10.0, 10.0)]);
        let registry = NodeRegistry::new(resolver);

        let count = registry
            .load(&["1.1.1.1".into(), "203.0.113.9".into(), "garbage".into()])
            .await
            .unwrap();
        assert_eq!(count, 1);

        let snapshot = registry.snapshot().await;
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].identifier(), "1.1.1.1");
    }

    #[tokio::test]
    async fn test_load_total_failure_is_error_and_keeps_previous_set() {
        let resolver = resolver_with(&[("1.1.1.1", 10.0, 10.0)]);
        let registry = NodeRegistry::new(resolver);

        registry.load(&["1.1.1.1".into()]).await.unwrap();
        let err = registry.load(&["203.0.113.9".into()]).await.unwrap_err();
        assert!(matches!(err, GeorouteError::NoNodesResolved));
        // Previous set survives a failed load.
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_load_empty_input_empties_registry() {
        let resolver = resolver_with(&[("1.1.1.1", 10.0, 10.0)]);
        let registry = NodeRegistry::new(resolver);

        registry.load(&["1.1.1.1".into()]).await.unwrap();
        let count = registry.load(&[]).await.unwrap();
        assert_eq!(count, 0);
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_load_is_full_swap_not_merge() {
        let resolver = resolver_with(&[("1.1.1.1", 10.0, 10.0), ("2.2.2.2", 20.0, 20.0)]);
        let registry = NodeRegistry::new(resolver);

        registry
            .load(&["1.1.1.1".into(), "2.2.2.2".into()])
            .await
            .unwrap();
        registry.load(&["2.2.2.2".into()]).await.unwrap();

        let snapshot = registry.snapshot().await;
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].identifier(), "2.2.2.2");
    }

    #[tokio::test]
    async fn test_snapshot_survives_replacement() {
        let resolver = resolver_with(&[("1.1.1.1", 10.0, 10.0), ("2.2.2.2", 20.0, 20.0)]);
        let registry = NodeRegistry::new(resolver);

        registry.load(&["1.1.1.1".into()]).await.unwrap();
        let old = registry.snapshot().await;
        registry.load(&["2.2.2.2".into()]).await.unwrap();

        // The captured snapshot is unchanged; a probe round holding it sees
        // the set it started with.
        assert_eq!(old.len(), 1);
        assert_eq!(old[0].identifier(), "1.1.1.1");
        assert_eq!(registry.snapshot().await[0].identifier(), "2.2.2.2");
    }
}
