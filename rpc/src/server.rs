//! Axum-based RPC server.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use fichua_reveal::{DisclosureResolver, RevealController};

use crate::error::RpcError;
use crate::handlers;

/// Shared state for all handlers.
#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<RevealController>,
    pub resolver: Arc<DisclosureResolver>,
}

/// Build the API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/reveal/request", post(handlers::request_reveal))
        .route("/reveal/status/:id", get(handlers::get_status))
        .route("/gateway/callback", post(handlers::gateway_callback))
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub struct RpcServer {
    pub listen_addr: String,
}

impl RpcServer {
    pub fn new(listen_addr: impl Into<String>) -> Self {
        Self {
            listen_addr: listen_addr.into(),
        }
    }

    /// Bind and serve until ctrl-c.
    pub async fn serve(&self, state: AppState) -> Result<(), RpcError> {
        let router = build_router(state);
        let listener = tokio::net::TcpListener::bind(&self.listen_addr)
            .await
            .map_err(|e| RpcError::Server(format!("bind {}: {e}", self.listen_addr)))?;
        tracing::info!(addr = %self.listen_addr, "RPC server listening");
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| RpcError::Server(e.to_string()))
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("shutdown signal received");
    }
}
