//! Tool parameter types and result shaping
//!
//! Provider and validation failures become tool-level error results so the
//! calling model can react to them; only serialization bugs surface as
//! protocol errors.

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
    schemars,
    schemars::{JsonSchema, Schema},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::aviation::{
    AviationError, AviationResult, DEFAULT_DUPLICATE_LIMIT, DEFAULT_SEARCH_LIMIT, FlightQuery,
};

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
#[schemars(transform = require_identifier)]
pub struct SearchFlightParams {
    #[serde(default)]
    #[schemars(description = "IATA flight number, e.g. BA249 (British Airways flight 249)")]
    pub identifier: String,
    #[schemars(description = "Only return flights on this date, YYYY-MM-DD (optional)")]
    pub flight_date: Option<String>,
    #[schemars(description = "Maximum number of flights to return (default: 5, max: 100)")]
    pub limit: Option<u32>,
}

impl SearchFlightParams {
    pub fn query(&self) -> AviationResult<FlightQuery> {
        build_query(
            &self.identifier,
            self.flight_date.as_deref(),
            self.limit.unwrap_or(DEFAULT_SEARCH_LIMIT),
        )
    }
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
#[schemars(transform = require_identifier)]
pub struct FindDuplicatesParams {
    #[serde(default)]
    #[schemars(description = "IATA flight number to check for duplicate reports, e.g. BA249")]
    pub identifier: String,
    #[schemars(description = "Only consider flights on this date, YYYY-MM-DD (optional)")]
    pub flight_date: Option<String>,
    #[schemars(
        description = "Maximum number of provider records to scan (default: 20, max: 100)"
    )]
    pub limit: Option<u32>,
}

impl FindDuplicatesParams {
    pub fn query(&self) -> AviationResult<FlightQuery> {
        build_query(
            &self.identifier,
            self.flight_date.as_deref(),
            self.limit.unwrap_or(DEFAULT_DUPLICATE_LIMIT),
        )
    }
}

/// `identifier` falls back to "" so a missing value is reported as a tool
/// error, but clients must still see it as required.
fn require_identifier(schema: &mut Schema) {
    let Some(object) = schema.as_object_mut() else {
        return;
    };
    let required = object.entry("required").or_insert_with(|| json!([]));
    if let Some(list) = required.as_array_mut() {
        if !list.iter().any(|name| *name == "identifier") {
            list.push(json!("identifier"));
        }
    }
}

fn build_query(
    identifier: &str,
    flight_date: Option<&str>,
    limit: u32,
) -> AviationResult<FlightQuery> {
    Ok(FlightQuery::new(identifier)?
        .with_flight_date(flight_date)?
        .with_limit(limit))
}

/// Wrap a tool outcome in an MCP result.
pub(crate) fn respond(result: AviationResult<Value>) -> Result<CallToolResult, McpError> {
    match result {
        Ok(payload) => {
            let content = serde_json::to_string_pretty(&payload).map_err(|e| {
                McpError::internal_error(
                    "serialization_error",
                    Some(json!({"error": e.to_string()})),
                )
            })?;
            Ok(CallToolResult::success(vec![Content::text(content)]))
        }
        Err(err) => Ok(tool_error(&err)),
    }
}

fn tool_error(err: &AviationError) -> CallToolResult {
    let mut payload = json!({
        "error": err.to_string(),
        "kind": err.kind(),
    });
    if let Some(status) = err.status() {
        payload["status"] = json!(status);
    }
    CallToolResult::error(vec![Content::text(payload.to_string())])
}
