//! MCP Streamable HTTP service creation
//!
//! This module provides the HTTP transport: rmcp's Streamable HTTP service
//! nested into an Axum router next to a health endpoint.

use std::sync::Arc;

use axum::{Json, Router, routing::get};
use rmcp::transport::streamable_http_server::{
    StreamableHttpServerConfig, StreamableHttpService, session::local::LocalSessionManager,
};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::instrument;

use crate::aviation::FlightSource;

use super::server::McpServer;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Health check endpoint
#[instrument]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Create MCP Streamable HTTP service
///
/// Runs in stateless mode: every request is handled by a fresh
/// [`McpServer`] and no session survives between requests.
///
/// # Arguments
/// * `source` - Flight source shared by every request
/// * `cancellation_token` - Token for graceful shutdown
pub fn create_mcp_service<S: FlightSource>(
    source: Arc<S>,
    cancellation_token: CancellationToken,
) -> StreamableHttpService<McpServer<S>, LocalSessionManager> {
    // Service factory: creates new McpServer instance per request
    // Note: Returns io::Error to match rmcp's expected signature
    let service_factory = move || -> Result<McpServer<S>, std::io::Error> {
        Ok(McpServer::new(Arc::clone(&source)))
    };

    let mut config = StreamableHttpServerConfig::default();
    config.stateful_mode = false;
    config.cancellation_token = cancellation_token;

    StreamableHttpService::new(
        service_factory,
        LocalSessionManager::default().into(),
        config,
    )
}

/// Build the HTTP router: `/mcp` for the protocol, `/health` for probes.
pub fn create_router<S: FlightSource>(
    source: Arc<S>,
    cancellation_token: CancellationToken,
) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest_service("/mcp", create_mcp_service(source, cancellation_token))
        .layer(TraceLayer::new_for_http())
}
