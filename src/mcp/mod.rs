//! Model Context Protocol (MCP) server implementation
//!
//! - **server**: tool registration and dispatch
//! - **tools**: parameter schemas and result shaping
//! - **service**: Streamable HTTP transport mounted in an Axum router

pub mod server;
mod service;
pub mod tools;

#[cfg(test)]
mod service_test;

pub use server::McpServer;
pub use service::{create_mcp_service, create_router};
