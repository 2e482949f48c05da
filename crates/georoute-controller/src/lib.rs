//! Georoute Controller
//!
//! The geo-proximity routing controller: it keeps an administrator-supplied
//! registry of edge nodes, probes their reachability on a fixed period,
//! maintains an immutable k-d tree over the online subset, and answers
//! "closest node" queries against the latest published snapshot. A small
//! JSON-RPC control API drives the registry and the lifecycle of the
//! content-serving listener.

pub mod controller;
pub mod geo;
pub mod http_router;
pub mod http_server;
pub mod kdtree;
pub mod node;
pub mod prober;
pub mod query;
pub mod registry;
pub mod scheduler;
pub mod serving;

pub use controller::{Controller, ControllerConfig};
pub use geo::{GeoPoint, GeoResolver, StaticGeoResolver};
pub use http_router::ControlRouter;
pub use http_server::ControlServer;
pub use kdtree::SpatialIndex;
pub use node::EdgeNode;
pub use prober::{HealthProber, ProbeConfig};
pub use query::QueryService;
pub use registry::NodeRegistry;
pub use scheduler::{RebuildScheduler, SharedIndex};
