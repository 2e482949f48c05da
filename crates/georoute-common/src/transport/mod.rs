//! Transport helpers for moving JSON-RPC messages over HTTP.

pub mod http;

pub use http::{HttpTransport, HyperRequest, HyperResponse};
