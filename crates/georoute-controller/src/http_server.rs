//! Control API HTTP Server
//!
//! Serves the JSON-RPC control surface over HTTP/1.1 at `POST /rpc`: one
//! accept loop, one tokio task per connection.

use http_body_util::BodyExt;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::StatusCode;
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use georoute_common::protocol::{GeorouteError, JsonRpcError, Result};
use georoute_common::transport::{HttpTransport, HyperRequest, HyperResponse};

use crate::controller::Controller;
use crate::http_router::ControlRouter;

/// HTTP server for the control API.
pub struct ControlServer {
    router: Arc<ControlRouter>,
}

impl ControlServer {
    pub fn new(controller: Arc<Controller>) -> Self {
        Self {
            router: Arc::new(ControlRouter::new(controller)),
        }
    }

    /// Binds `addr` and serves until the task is dropped.
    pub async fn run(self, addr: SocketAddr) -> Result<()> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| GeorouteError::Transport(format!("Failed to bind to {}: {}", addr, e)))?;
        self.serve(listener).await
    }

    /// Serves connections from an already bound listener.
    pub async fn serve(self, listener: TcpListener) -> Result<()> {
        tracing::info!(
            "control API listening on {}",
            listener
                .local_addr()
                .map_err(|e| GeorouteError::Transport(format!("Failed to get local addr: {}", e)))?
        );

        loop {
            let (stream, _) = listener.accept().await.map_err(|e| {
                GeorouteError::Transport(format!("Failed to accept connection: {}", e))
            })?;

            let io = TokioIo::new(stream);
            let router = self.router.clone();

            tokio::task::spawn(async move {
                let service = service_fn(move |req| {
                    let router = router.clone();
                    async move { Self::handle_request(router, req).await }
                });

                if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                    tracing::error!("Error serving connection: {}", err);
                }
            });
        }
    }

    async fn handle_request(
        router: Arc<ControlRouter>,
        req: HyperRequest,
    ) -> Result<HyperResponse> {
        if req.uri().path() != "/rpc" {
            return Ok(hyper::Response::builder()
                .status(StatusCode::NOT_FOUND)
                .body(http_body_util::Full::new(hyper::body::Bytes::from(
                    "not found",
                )))
                .unwrap_or_default());
        }

        if req.method() != hyper::Method::POST {
            return Ok(HttpTransport::to_http_error(
                serde_json::Value::Null,
                JsonRpcError::invalid_request("Only POST requests are supported"),
            ));
        }

        let body = req
            .into_body()
            .collect()
            .await
            .map_err(|e| GeorouteError::Transport(format!("Failed to read request body: {}", e)))?
            .to_bytes();

        let jsonrpc_req = match HttpTransport::parse_jsonrpc(body) {
            Ok(req) => req,
            Err(_) => {
                return Ok(HttpTransport::to_http_error(
                    serde_json::Value::Null,
                    JsonRpcError::parse_error(),
                ));
            }
        };

        let response = router.handle_request(jsonrpc_req).await;
        Ok(HttpTransport::to_http_response(response))
    }
}
