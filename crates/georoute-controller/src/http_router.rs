//! Control API Router
//!
//! Fixed dispatch of the four control operations. Requests are parsed into
//! the typed [`ControlCommand`] schema first; unknown methods come back as a
//! JSON-RPC `method_not_found`, never a silent drop.

use std::sync::Arc;

use serde_json::json;

use georoute_common::protocol::{
    ControlCommand, GeorouteError, JsonRpcError, JsonRpcRequest, JsonRpcResponse, LoadNodesReply,
};

use crate::controller::Controller;

pub struct ControlRouter {
    controller: Arc<Controller>,
}

impl ControlRouter {
    pub fn new(controller: Arc<Controller>) -> Self {
        Self { controller }
    }

    /// Handles one control API request.
    ///
    /// Control misuse (stop while stopped, start while started) is a
    /// descriptive success, not a fault; only total-failure conditions map
    /// to JSON-RPC errors.
    pub async fn handle_request(&self, req: JsonRpcRequest) -> JsonRpcResponse {
        let id = req.id.clone();

        let command = match ControlCommand::parse(&req.method, &req.params) {
            Ok(command) => command,
            Err(err) => return JsonRpcResponse::error(id, err),
        };

        match command {
            ControlCommand::Start => match self.controller.start().await {
                Ok(msg) => JsonRpcResponse::success(id, json!(msg)),
                Err(err) => JsonRpcResponse::error(id, to_rpc_error(err)),
            },
            ControlCommand::Stop => match self.controller.stop().await {
                Ok(msg) => JsonRpcResponse::success(id, json!(msg)),
                Err(err) => JsonRpcResponse::error(id, to_rpc_error(err)),
            },
            ControlCommand::Status => {
                let status = self.controller.status().await;
                JsonRpcResponse::success(id, json!(status))
            }
            ControlCommand::LoadNodes(addresses) => {
                match self.controller.load_nodes(&addresses).await {
                    Ok(loaded) => JsonRpcResponse::success(id, json!(LoadNodesReply { loaded })),
                    Err(err) => JsonRpcResponse::error(id, to_rpc_error(err)),
                }
            }
        }
    }
}

fn to_rpc_error(err: GeorouteError) -> JsonRpcError {
    match err {
        GeorouteError::InvalidRequest(msg) => JsonRpcError::invalid_params(&msg),
        other => JsonRpcError::server_error(&other.to_string()),
    }
}
