//! JSON-RPC 2.0 Protocol Types
//!
//! The control API speaks JSON-RPC 2.0 over HTTP POST. This module holds the
//! wire types shared by the server and the CLI client.
//!
//! # Error Codes
//!
//! Standard JSON-RPC 2.0 error codes:
//! - `-32700`: Parse error
//! - `-32600`: Invalid request
//! - `-32601`: Method not found
//! - `-32602`: Invalid params
//! - `-32603`: Internal error
//! - `-32000` to `-32099`: Server error
//!
//! # Example
//!
//! ```
//! use georoute_common::protocol::jsonrpc::{JsonRpcRequest, JsonRpcResponse, JsonRpcError};
//! use serde_json::json;
//!
//! let request = JsonRpcRequest {
//!     jsonrpc: "2.0".into(),
//!     method: "status".into(),
//!     params: json!({}),
//!     id: json!(1),
//! };
//!
//! let response = JsonRpcResponse::success(json!(1), json!({"running": false}));
//! let error_response = JsonRpcResponse::error(json!(1), JsonRpcError::method_not_found());
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON-RPC 2.0 request
///
/// Per the JSON-RPC 2.0 spec, a request must have:
/// - `jsonrpc`: "2.0"
/// - `method`: String containing the method name to invoke
/// - `params`: Structured value (array or object) holding parameter values
/// - `id`: Request identifier (number, string, or null)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    /// JSON-RPC version (must be "2.0")
    pub jsonrpc: String,
    /// Name of the method to invoke
    pub method: String,
    /// Parameter values (array or object, or omitted)
    #[serde(default)]
    pub params: Value,
    /// Request identifier
    pub id: Value,
}

/// JSON-RPC 2.0 response
///
/// Exactly one of `result` and `error` is present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    /// JSON-RPC version (must be "2.0")
    pub jsonrpc: String,
    /// Result value on success (None if error is present)
    pub result: Option<Value>,
    /// Error object on failure (None if result is present)
    pub error: Option<JsonRpcError>,
    /// Request identifier (must match the request id)
    pub id: Value,
}

/// JSON-RPC 2.0 error object
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonRpcError {
    /// Error code (standard codes are negative integers)
    pub code: i32,
    /// Short description of the error
    pub message: String,
    /// Additional data (optional)
    pub data: Option<Value>,
}

// Standard JSON-RPC 2.0 error codes
/// Invalid JSON was received by the server
pub const PARSE_ERROR: i32 = -32700;
/// The JSON sent is not a valid Request object
pub const INVALID_REQUEST: i32 = -32600;
/// The method does not exist / is not available
pub const METHOD_NOT_FOUND: i32 = -32601;
/// Invalid method parameter(s)
pub const INVALID_PARAMS: i32 = -32602;
/// Internal JSON-RPC error
pub const INTERNAL_ERROR: i32 = -32603;

impl JsonRpcError {
    /// Create a parse error (-32700)
    pub fn parse_error() -> Self {
        Self {
            code: PARSE_ERROR,
            message: "Parse error".into(),
            data: None,
        }
    }

    /// Create an invalid request error (-32600)
    pub fn invalid_request(msg: &str) -> Self {
        Self {
            code: INVALID_REQUEST,
            message: msg.into(),
            data: None,
        }
    }

    /// Create a method not found error (-32601)
    ///
    /// Used when the method is not one of the control API operations.
    pub fn method_not_found() -> Self {
        Self {
            code: METHOD_NOT_FOUND,
            message: "Method not found".into(),
            data: None,
        }
    }

    /// Create an invalid params error (-32602)
    pub fn invalid_params(msg: &str) -> Self {
        Self {
            code: INVALID_PARAMS,
            message: msg.into(),
            data: None,
        }
    }

    /// Create an internal error (-32603)
    pub fn internal_error(msg: &str) -> Self {
        Self {
            code: INTERNAL_ERROR,
            message: msg.into(),
            data: None,
        }
    }

    /// Create a server error (-32000)
    ///
    /// Used for application-defined errors such as "no nodes online".
    pub fn server_error(msg: &str) -> Self {
        Self {
            code: -32000,
            message: msg.into(),
            data: None,
        }
    }
}

impl JsonRpcResponse {
    /// Create a success response
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            result: Some(result),
            error: None,
            id,
        }
    }

    /// Create an error response
    pub fn error(id: Value, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            result: None,
            error: Some(error),
            id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_jsonrpc_request_serialization() {
        let req = JsonRpcRequest {
            jsonrpc: "2.0".into(),
            method: "status".into(),
            params: json!({}),
            id: json!(1),
        };
        let serialized = serde_json::to_string(&req).unwrap();
        assert!(serialized.contains("\"jsonrpc\":\"2.0\""));
        assert!(serialized.contains("\"method\":\"status\""));
        assert!(serialized.contains("\"id\":1"));
    }

    #[test]
    fn test_jsonrpc_request_missing_params_defaults_to_null() {
        let json = r#"{"jsonrpc":"2.0","method":"start","id":1}"#;
        let req: JsonRpcRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.params, Value::Null);
    }

    #[test]
    fn test_jsonrpc_response_success() {
        let res = JsonRpcResponse::success(json!(1), json!({"running": true}));
        assert_eq!(res.result, Some(json!({"running": true})));
        assert_eq!(res.error, None);
        assert_eq!(res.jsonrpc, "2.0");
        assert_eq!(res.id, json!(1));
    }

    #[test]
    fn test_jsonrpc_response_error() {
        let err = JsonRpcError::method_not_found();
        let res = JsonRpcResponse::error(json!(1), err);
        assert_eq!(res.result, None);
        assert!(res.error.is_some());
        assert_eq!(res.id, json!(1));
    }

    #[test]
    fn test_jsonrpc_error_codes() {
        assert_eq!(JsonRpcError::parse_error().code, -32700);
        assert_eq!(JsonRpcError::invalid_request("bad").code, -32600);
        assert_eq!(JsonRpcError::method_not_found().code, -32601);
        assert_eq!(JsonRpcError::invalid_params("bad").code, -32602);
        assert_eq!(JsonRpcError::internal_error("oops").code, -32603);
        assert_eq!(JsonRpcError::server_error("no nodes").code, -32000);
    }

    #[test]
    fn test_jsonrpc_response_deserialization() {
        let json = r#"{"jsonrpc":"2.0","result":{"running":false},"error":null,"id":1}"#;
        let res: JsonRpcResponse = serde_json::from_str(json).unwrap();
        assert_eq!(res.result, Some(json!({"running": false})));
        assert_eq!(res.error, None);
    }

    #[test]
    fn test_jsonrpc_response_with_error_deserialization() {
        let json = r#"{"jsonrpc":"2.0","result":null,"error":{"code":-32601,"message":"Method not found","data":null},"id":1}"#;
        let res: JsonRpcResponse = serde_json::from_str(json).unwrap();
        assert_eq!(res.result, None);
        assert_eq!(res.error.unwrap().code, -32601);
    }
}
