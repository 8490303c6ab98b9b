//! Transport runner.
//!
//! Serves the MCP tools over the transport chosen at startup until the
//! client disconnects (stdio) or Ctrl-C is received.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use miette::Diagnostic;
use rmcp::{ServiceExt, transport::stdio};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::aviation::{AviationStackClient, FlightSource};
use crate::config::{Config, ConfigError, ConnectionType};
use crate::mcp::{McpServer, create_router};

/// Errors that stop the server.
#[derive(Error, Diagnostic, Debug)]
pub enum ServerError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to bind {addr}")]
    #[diagnostic(
        code(aviation_stack_mcp::server::bind),
        help("Is another process using this port? Try --port.")
    )]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("IO error: {0}")]
    #[diagnostic(code(aviation_stack_mcp::server::io))]
    Io(#[from] io::Error),

    #[error("MCP transport error: {message}")]
    #[diagnostic(code(aviation_stack_mcp::server::transport))]
    Transport { message: String },
}

/// Initialize tracing subscriber with env filter
///
/// Logs go to stderr; stdout belongs to the stdio transport.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aviation_stack_mcp=info,rmcp=warn,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

/// Run the MCP server with the given configuration
pub async fn run(config: Config) -> Result<(), ServerError> {
    let client = AviationStackClient::new(&config)?;
    info!(
        connection_type = %config.connection_type,
        base_url = client.base_url(),
        timeout_secs = config.timeout.as_secs_f64(),
        "Starting Aviation Stack MCP server"
    );

    match config.connection_type {
        ConnectionType::Stdio => serve_stdio(client).await,
        ConnectionType::Http => {
            serve_http(client, SocketAddr::new(config.host, config.port)).await
        }
    }
}

async fn serve_stdio(client: AviationStackClient) -> Result<(), ServerError> {
    let (stdin, stdout) = stdio();
    info!("Serving MCP over stdio");
    serve_stream(Arc::new(client), stdin, stdout).await
}

/// Serve MCP over a reader/writer pair until the peer closes it or Ctrl-C.
///
/// One request is read and answered at a time.
pub async fn serve_stream<S, R, W>(
    source: Arc<S>,
    reader: R,
    writer: W,
) -> Result<(), ServerError>
where
    S: FlightSource,
    R: AsyncRead + Send + Unpin + 'static,
    W: AsyncWrite + Send + Unpin + 'static,
{
    let service = McpServer::new(source)
        .serve((reader, writer))
        .await
        .map_err(|e| ServerError::Transport {
            message: e.to_string(),
        })?;

    tokio::select! {
        quit = service.waiting() => {
            let reason = quit.map_err(|e| ServerError::Transport { message: e.to_string() })?;
            info!(?reason, "MCP session ended");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl-C, shutting down");
        }
    }

    Ok(())
}

async fn serve_http(client: AviationStackClient, addr: SocketAddr) -> Result<(), ServerError> {
    let ct = CancellationToken::new();
    let app = create_router(Arc::new(client), ct.child_token());

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;
    info!("MCP server listening on http://{}/mcp", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            info!("Received Ctrl-C, shutting down");
            ct.cancel();
        })
        .await?;

    Ok(())
}
