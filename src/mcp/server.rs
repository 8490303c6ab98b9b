//! MCP server implementation
//!
//! Registers the flight tools and dispatches tool calls to them.

use std::sync::Arc;

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, ServerCapabilities, ServerInfo, Tool},
    tool, tool_handler, tool_router,
};
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::aviation::{AviationResult, FlightSource, find_duplicates};

use super::tools::{FindDuplicatesParams, SearchFlightParams, respond};

const INSTRUCTIONS: &str = "Aviation Stack MCP Server - Look up live flight status by IATA flight \
number (search_flight_by_iata) and detect duplicate reports of the same flight \
(find_duplicate_flights). Duplicates share flight number, scheduled departure day and \
departure airport.";

/// Main MCP server coordinator
///
/// Generic over `S: FlightSource` so tools can run against the real
/// provider or a stub.
pub struct McpServer<S: FlightSource> {
    source: Arc<S>,
    tool_router: ToolRouter<Self>,
}

// Manual Clone impl - only the Arc is cloned, S need not be Clone
impl<S: FlightSource> Clone for McpServer<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            tool_router: self.tool_router.clone(),
        }
    }
}

#[tool_router]
impl<S: FlightSource> McpServer<S> {
    /// Create a new MCP server backed by `source`
    pub fn new(source: Arc<S>) -> Self {
        Self {
            source,
            tool_router: Self::tool_router(),
        }
    }

    /// Tools advertised to clients
    pub fn tools(&self) -> Vec<Tool> {
        self.tool_router.list_all()
    }

    /// Search flights by IATA flight number
    #[tool(
        description = "Search for flights by IATA flight number (e.g. DL123 -> Delta Air Lines flight 123). Returns {\"flights\": [...]} with status, departure and arrival details."
    )]
    pub async fn search_flight_by_iata(
        &self,
        params: Parameters<SearchFlightParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(self.search(&params.0).await)
    }

    /// Find duplicate reports of a flight
    #[tool(
        description = "Fetch flights for an IATA flight number and group duplicate reports: records sharing flight number, scheduled departure day and departure airport. Returns {\"duplicates\": [...]}, empty when there are none."
    )]
    pub async fn find_duplicate_flights(
        &self,
        params: Parameters<FindDuplicatesParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(self.duplicates(&params.0).await)
    }
}

impl<S: FlightSource> McpServer<S> {
    async fn search(&self, params: &SearchFlightParams) -> AviationResult<Value> {
        let query = params.query().inspect_err(|e| warn!(error = %e, "Rejected search"))?;

        let flights = self
            .source
            .fetch_by_identifier(&query)
            .await
            .inspect_err(|e| warn!(identifier = %query.identifier, error = %e, "Search failed"))?;

        info!(identifier = %query.identifier, count = flights.len(), "Flight search complete");
        Ok(json!({ "flights": flights }))
    }

    async fn duplicates(&self, params: &FindDuplicatesParams) -> AviationResult<Value> {
        let query = params
            .query()
            .inspect_err(|e| warn!(error = %e, "Rejected duplicate search"))?;

        let flights = self
            .source
            .fetch_by_identifier(&query)
            .await
            .inspect_err(|e| {
                warn!(identifier = %query.identifier, error = %e, "Duplicate search failed")
            })?;

        let duplicates = find_duplicates(&flights);
        info!(
            identifier = %query.identifier,
            scanned = flights.len(),
            groups = duplicates.len(),
            "Duplicate search complete"
        );
        Ok(json!({ "duplicates": duplicates }))
    }
}

#[tool_handler]
impl<S: FlightSource> ServerHandler for McpServer<S> {
    fn get_info(&self) -> ServerInfo {
        let mut info = ServerInfo::default();
        info.capabilities = ServerCapabilities::builder().enable_tools().build();
        info.server_info.name = env!("CARGO_PKG_NAME").to_string();
        info.server_info.version = env!("CARGO_PKG_VERSION").to_string();
        info.instructions = Some(INSTRUCTIONS.to_string());
        info
    }
}
