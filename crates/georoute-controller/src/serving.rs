//! Serving Listener
//!
//! The content-serving endpoint whose lifecycle the control API governs.
//! What it serves is a collaborator concern; here it exposes a single
//! `GET /closest` route that tells the caller which edge node to fetch
//! content from. The client IP is taken from `x-forwarded-for` when present
//! (the listener is expected to sit behind a fronting proxy), falling back
//! to the peer address.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{ConnectInfo, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Json;
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use georoute_common::protocol::{GeorouteError, Result};

use crate::query::QueryService;

/// A running serving listener.
///
/// Dropping the handle does not stop the listener; call
/// [`ServingHandle::shutdown`].
pub struct ServingHandle {
    pub local_addr: SocketAddr,
    shutdown_tx: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl ServingHandle {
    /// Shuts the listener down gracefully and waits for the task to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(());
        if let Err(err) = self.task.await {
            warn!("serving listener task ended abnormally: {}", err);
        }
    }
}

pub struct ServingListener;

impl ServingListener {
    /// Binds `addr` and starts serving in a background task.
    pub async fn start(addr: SocketAddr, query: Arc<QueryService>) -> Result<ServingHandle> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| GeorouteError::Transport(format!("Failed to bind to {}: {}", addr, e)))?;
        let local_addr = listener
            .local_addr()
            .map_err(|e| GeorouteError::Transport(format!("Failed to get local addr: {}", e)))?;

        let app = axum::Router::new()
            .route("/closest", get(closest_handler))
            .layer(tower_http::cors::CorsLayer::permissive())
            .with_state(query);

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let task = tokio::spawn(async move {
            let serve = axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            });
            if let Err(err) = serve.await {
                error!("serving listener error: {}", err);
            }
        });

        info!("serving listener on {}", local_addr);
        Ok(ServingHandle {
            local_addr,
            shutdown_tx,
            task,
        })
    }
}

async fn closest_handler(
    State(query): State<Arc<QueryService>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Response {
    let client = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|value| value.trim().to_string())
        .unwrap_or_else(|| peer.ip().to_string());

    match query.closest_node(&client).await {
        Ok(node) => (StatusCode::OK, Json(json!({ "node": node }))).into_response(),
        Err(err @ GeorouteError::NoNodesOnline) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "error": err.to_string() })),
        )
            .into_response(),
        Err(err) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": err.to_string() })),
        )
            .into_response(),
    }
}
