//! Geolocation Seam
//!
//! Mapping an IP address to coordinates is an external capability (a GeoIP
//! database in production). The controller only depends on the
//! [`GeoResolver`] trait; [`StaticGeoResolver`] backs it with a JSON table
//! loaded from disk, which is also what the tests use.

use std::collections::HashMap;
use std::net::IpAddr;
use std::path::Path;

use serde::{Deserialize, Serialize};

use georoute_common::protocol::Result;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Squared Euclidean distance on the raw coordinate pair.
    ///
    /// A flat-plane approximation, not geodesic distance. It is good enough
    /// for ranking nearby nodes but degrades near the poles and across very
    /// large spans; that trade-off is intentional.
    pub fn squared_distance(&self, other: &GeoPoint) -> f64 {
        let dlat = self.lat - other.lat;
        let dlon = self.lon - other.lon;
        dlat * dlat + dlon * dlon
    }
}

/// Resolves an IP address to approximate coordinates.
///
/// Returning `None` means the address is unresolvable; callers decide
/// whether that drops a registry entry or fails a query.
pub trait GeoResolver: Send + Sync {
    fn resolve(&self, ip: IpAddr) -> Option<GeoPoint>;
}

/// Table-backed resolver.
///
/// The on-disk format is a JSON object keyed by IP address:
///
/// ```json
/// {
///   "1.1.1.1": {"lat": -33.86, "lon": 151.2},
///   "2.2.2.2": {"lat": 48.85, "lon": 2.35}
/// }
/// ```
#[derive(Debug, Default)]
pub struct StaticGeoResolver {
    table: HashMap<IpAddr, GeoPoint>,
}

impl StaticGeoResolver {
    pub fn new(table: HashMap<IpAddr, GeoPoint>) -> Self {
        Self { table }
    }

    /// Loads the lookup table from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        let table: HashMap<IpAddr, GeoPoint> = serde_json::from_slice(&data)?;
        Ok(Self::new(table))
    }

    pub fn insert(&mut self, ip: IpAddr, location: GeoPoint) {
        self.table.insert(ip, location);
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl GeoResolver for StaticGeoResolver {
    fn resolve(&self, ip: IpAddr) -> Option<GeoPoint> {
        self.table.get(&ip).copied()
    }
}
