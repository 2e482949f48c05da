//! Typed Control Command Schema
//!
//! The control API accepts exactly four operations. Instead of dispatching on
//! raw method strings all over the server, incoming requests are parsed once
//! into a [`ControlCommand`]; unknown methods become a typed
//! `method_not_found` protocol error and malformed arguments become
//! `invalid_params`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::protocol::jsonrpc::JsonRpcError;

/// A parsed control API operation.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlCommand {
    /// Activate the content-serving listener.
    Start,
    /// Deactivate the content-serving listener.
    Stop,
    /// Report whether the serving listener is running.
    Status,
    /// Replace the full registry with the given addresses.
    LoadNodes(Vec<String>),
}

impl ControlCommand {
    /// Parses a JSON-RPC method name and params into a command.
    ///
    /// `start`, `stop` and `status` take no arguments and ignore any params
    /// sent with them. `loadNodes` accepts either a bare JSON array of
    /// address strings or an object of the form `{"ips": [...]}`.
    ///
    /// # Errors
    ///
    /// Returns `method_not_found` for unrecognized methods and
    /// `invalid_params` when `loadNodes` arguments are malformed.
    pub fn parse(method: &str, params: &Value) -> Result<Self, JsonRpcError> {
        match method {
            "start" => Ok(Self::Start),
            "stop" => Ok(Self::Stop),
            "status" => Ok(Self::Status),
            "loadNodes" => Self::parse_load_nodes(params),
            _ => Err(JsonRpcError::method_not_found()),
        }
    }

    fn parse_load_nodes(params: &Value) -> Result<Self, JsonRpcError> {
        let addresses = if params.is_array() {
            params.clone()
        } else if let Some(ips) = params.get("ips") {
            ips.clone()
        } else {
            return Err(JsonRpcError::invalid_params(
                "loadNodes expects an array of addresses or {\"ips\": [...]}",
            ));
        };

        serde_json::from_value::<Vec<String>>(addresses)
            .map(Self::LoadNodes)
            .map_err(|_| JsonRpcError::invalid_params("loadNodes addresses must be strings"))
    }
}

/// Reply to a `status` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReply {
    pub running: bool,
}

/// Reply to a `loadNodes` call: how many addresses geolocated and were kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadNodesReply {
    pub loaded: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_lifecycle_commands() {
        assert_eq!(
            ControlCommand::parse("start", &json!({})).unwrap(),
            ControlCommand::Start
        );
        assert_eq!(
            ControlCommand::parse("stop", &Value::Null).unwrap(),
            ControlCommand::Stop
        );
        assert_eq!(
            ControlCommand::parse("status", &json!({})).unwrap(),
            ControlCommand::Status
        );
    }

    #[test]
    fn test_parse_load_nodes_bare_array() {
        let cmd = ControlCommand::parse("loadNodes", &json!(["1.1.1.1", "2.2.2.2"])).unwrap();
        assert_eq!(
            cmd,
            ControlCommand::LoadNodes(vec!["1.1.1.1".into(), "2.2.2.2".into()])
        );
    }

    #[test]
    fn test_parse_load_nodes_object_form() {
        let cmd = ControlCommand::parse("loadNodes", &json!({"ips": ["1.1.1.1"]})).unwrap();
        assert_eq!(cmd, ControlCommand::LoadNodes(vec!["1.1.1.1".into()]));
    }

    #[test]
    fn test_parse_load_nodes_rejects_non_strings() {
        let err = ControlCommand::parse("loadNodes", &json!([1, 2, 3])).unwrap_err();
        assert_eq!(err.code, crate::protocol::jsonrpc::INVALID_PARAMS);
    }

    #[test]
    fn test_parse_load_nodes_rejects_missing_args() {
        let err = ControlCommand::parse("loadNodes", &json!({"nodes": []})).unwrap_err();
        assert_eq!(err.code, crate::protocol::jsonrpc::INVALID_PARAMS);
    }

    #[test]
    fn test_parse_unknown_method() {
        let err = ControlCommand::parse("restart", &json!({})).unwrap_err();
        assert_eq!(err.code, crate::protocol::jsonrpc::METHOD_NOT_FOUND);
    }

    #[test]
    fn test_status_reply_roundtrip() {
        let reply = StatusReply { running: true };
        let value = serde_json::to_value(reply).unwrap();
        assert_eq!(value, json!({"running": true}));
    }
}
