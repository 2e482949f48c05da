//! Query Service
//!
//! Answers "closest node" for a client address against the most recently
//! published index snapshot. The read path never waits on a rebuild: it
//! clones the current `Arc` and queries outside any lock.

use std::net::IpAddr;
use std::sync::Arc;

use georoute_common::protocol::{GeorouteError, Result};

use crate::geo::GeoResolver;
use crate::scheduler::SharedIndex;

pub struct QueryService {
    resolver: Arc<dyn GeoResolver>,
    index: SharedIndex,
}

impl QueryService {
    pub fn new(resolver: Arc<dyn GeoResolver>, index: SharedIndex) -> Self {
        Self { resolver, index }
    }

    /// Returns the identifier of the online node nearest to the client.
    ///
    /// The two failure modes are distinct: an address that does not parse or
    /// geolocate is [`GeorouteError::ResolutionFailed`], while an empty
    /// snapshot is [`GeorouteError::NoNodesOnline`].
    pub async fn closest_node(&self, client_address: &str) -> Result<String> {
        let ip: IpAddr = client_address
            .parse()
            .map_err(|_| GeorouteError::ResolutionFailed(client_address.to_string()))?;
        let location = self
            .resolver
            .resolve(ip)
            .ok_or_else(|| GeorouteError::ResolutionFailed(client_address.to_string()))?;

        let snapshot = self.index.read().await.clone();
        snapshot
            .nearest(location, 1)
            .into_iter()
            .next()
            .map(|node| node.identifier())
            .ok_or(GeorouteError::NoNodesOnline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{GeoPoint, StaticGeoResolver};
    use crate::kdtree::SpatialIndex;
    use crate::node::EdgeNode;
    use tokio::sync::RwLock;

    fn node(ip: &str, lat: f64, lon: f64) -> EdgeNode {
        EdgeNode::new(ip.parse().unwrap(), GeoPoint::new(lat, lon))
    }

    fn service(nodes: &[EdgeNode], clients: &[(&str, f64, f64)]) -> QueryService {
        let mut resolver = StaticGeoResolver::default();
        for (ip, lat, lon) in clients {
            resolver.insert(ip.parse().unwrap(), GeoPoint::new(*lat, *lon));
        }
        let index = Arc::new(RwLock::new(Arc::new(SpatialIndex::build(nodes))));
        QueryService::new(Arc::new(resolver), index)
    }

    #[tokio::test]
    async fn test_closest_node_picks_nearest() {
        let svc = service(
            &[node("1.1.1.1", 10.0, 10.0), node("2.2.2.2", 50.0, 50.0)],
            &[("9.9.9.9", 12.0, 11.0)],
        );
        assert_eq!(svc.closest_node("9.9.9.9").await.unwrap(), "1.1.1.1");
    }

    #[tokio::test]
    async fn test_closest_node_self_coordinates() {
        let svc = service(
            &[node("1.1.1.1", 10.0, 10.0), node("2.2.2.2", 50.0, 50.0)],
            &[("1.1.1.1", 10.0, 10.0)],
        );
        assert_eq!(svc.closest_node("1.1.1.1").await.unwrap(), "1.1.1.1");
    }

    #[tokio::test]
    async fn test_unresolvable_address_is_resolution_failure() {
        let svc = service(&[node("1.1.1.1", 10.0, 10.0)], &[]);
        let err = svc.closest_node("203.0.113.9").await.unwrap_err();
        assert!(matches!(err, GeorouteError::ResolutionFailed(_)));
    }

    #[tokio::test]
    async fn test_unparseable_address_is_resolution_failure() {
        let svc = service(&[node("1.1.1.1", 10.0, 10.0)], &[]);
        let err = svc.closest_node("not-an-ip").await.unwrap_err();
        assert!(matches!(err, GeorouteError::ResolutionFailed(_)));
    }

    #[tokio::test]
    async fn test_empty_index_is_no_nodes_online() {
        let svc = service(&[], &[("9.9.9.9", 12.0, 11.0)]);
        let err = svc.closest_node("9.9.9.9").await.unwrap_err();
        assert!(matches!(err, GeorouteError::NoNodesOnline));
    }
}
