use std::net::IpAddr;

use crate::geo::GeoPoint;

/// An edge node in the fleet: an address with resolved coordinates.
///
/// Nodes are immutable once created; `loadNodes` replaces them wholesale and
/// never mutates them in place. Coordinates are resolved exactly once, at
/// load time.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeNode {
    pub addr: IpAddr,
    pub location: GeoPoint,
}

impl EdgeNode {
    pub fn new(addr: IpAddr, location: GeoPoint) -> Self {
        Self { addr, location }
    }

    /// The identifier handed back to clients.
    pub fn identifier(&self) -> String {
        self.addr.to_string()
    }
}
