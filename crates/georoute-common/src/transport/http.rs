//! HTTP Transport Utilities
//!
//! Conversions between raw HTTP bodies and JSON-RPC protocol messages,
//! shared by the control server and the CLI client.

use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::{Request, Response, StatusCode};
use serde_json::Value;

use crate::protocol::error::GeorouteError;
use crate::protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};

/// Type alias for Hyper incoming requests
pub type HyperRequest = Request<Incoming>;

/// Type alias for Hyper responses with full body
pub type HyperResponse = Response<Full<Bytes>>;

/// HTTP transport utility functions
pub struct HttpTransport;

impl HttpTransport {
    /// Parse a JSON-RPC request from an HTTP body.
    ///
    /// # Example
    ///
    /// ```
    /// use georoute_common::transport::HttpTransport;
    /// use hyper::body::Bytes;
    ///
    /// let body = Bytes::from(r#"{"jsonrpc":"2.0","method":"status","params":{},"id":1}"#);
    /// let request = HttpTransport::parse_jsonrpc(body).unwrap();
    /// assert_eq!(request.method, "status");
    /// ```
    pub fn parse_jsonrpc(body: Bytes) -> Result<JsonRpcRequest, GeorouteError> {
        serde_json::from_slice(&body).map_err(GeorouteError::JsonSerialization)
    }

    /// Create an HTTP response from a JSON-RPC response.
    pub fn to_http_response(jsonrpc: JsonRpcResponse) -> HyperResponse {
        let body = serde_json::to_vec(&jsonrpc).unwrap_or_default();

        Response::builder()
            .status(StatusCode::OK)
            .header("Content-Type", "application/json")
            .body(Full::new(Bytes::from(body)))
            .unwrap_or_default()
    }

    /// Create an HTTP response carrying a JSON-RPC error.
    ///
    /// JSON-RPC errors still travel with HTTP status 200; the error lives in
    /// the response body per the JSON-RPC 2.0 convention.
    pub fn to_http_error(id: Value, error: JsonRpcError) -> HyperResponse {
        Self::to_http_response(JsonRpcResponse::error(id, error))
    }
}
