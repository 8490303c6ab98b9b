//! Tests for the HTTP transport router

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    body::Body,
    http::{
        Request, StatusCode,
        header::{ACCEPT, CONTENT_TYPE, HOST},
    },
    routing::get,
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use crate::aviation::AviationStackClient;
use crate::test_support::{flight_json, flights_body, spawn_provider, test_config};

fn client() -> Arc<AviationStackClient> {
    crate::install_crypto_provider();
    Arc::new(AviationStackClient::new(&test_config("http://127.0.0.1:9/v1")).unwrap())
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = super::create_router(client(), CancellationToken::new());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = super::create_router(client(), CancellationToken::new());

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    // Root path should return 404 (only /mcp and /health are mounted)
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// The MCP endpoint is mounted; rmcp answers protocol errors for a bare GET.
#[tokio::test]
async fn test_mcp_endpoint_is_mounted() {
    let app = super::create_router(client(), CancellationToken::new());

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/mcp")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_ne!(
        response.status(),
        StatusCode::NOT_FOUND,
        "Service should be mounted and responding"
    );
}

fn rpc_request(message: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/mcp")
        .header(HOST, "localhost")
        .header(CONTENT_TYPE, "application/json")
        .header(ACCEPT, "application/json, text/event-stream")
        .body(Body::from(message.to_string()))
        .unwrap()
}

/// JSON-RPC messages in a response body, plain JSON or SSE `data:` frames.
fn rpc_messages(body: &str) -> Vec<Value> {
    let trimmed = body.trim();
    if trimmed.starts_with('{') {
        return vec![serde_json::from_str(trimmed).unwrap()];
    }
    trimmed
        .lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .map(str::trim)
        .filter(|data| data.starts_with('{'))
        .filter_map(|data| serde_json::from_str(data).ok())
        .collect()
}

async fn call(app: Router, message: Value) -> Value {
    let id = message["id"].clone();
    let response = app.oneshot(rpc_request(message)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = tokio::time::timeout(Duration::from_secs(5), response.into_body().collect())
        .await
        .expect("response body did not complete")
        .unwrap()
        .to_bytes();
    let body = String::from_utf8(body.to_vec()).unwrap();

    rpc_messages(&body)
        .into_iter()
        .find(|m| m["id"] == id)
        .unwrap_or_else(|| panic!("no JSON-RPC response with id {id} in {body}"))
}

#[tokio::test]
async fn test_http_tools_list_and_call() {
    crate::install_crypto_provider();
    let provider = Router::new().route(
        "/v1/flights",
        get(|| async {
            Json(flights_body(vec![
                flight_json("BA249", "scheduled", "LHR", "2025-06-01T13:40:00+00:00"),
                flight_json("BA249", "active", "LHR", "2025-06-01T13:55:00+00:00"),
            ]))
        }),
    );
    let base_url = spawn_provider(provider).await;
    let client = Arc::new(AviationStackClient::new(&test_config(&base_url)).unwrap());
    let app = super::create_router(client, CancellationToken::new());

    // Stateless: no initialize handshake or session header between requests
    let listed = call(
        app.clone(),
        json!({ "jsonrpc": "2.0", "id": 1, "method": "tools/list", "params": {} }),
    )
    .await;
    let mut names: Vec<&str> = listed["result"]["tools"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|tool| tool["name"].as_str())
        .collect();
    names.sort();
    assert_eq!(names, vec!["find_duplicate_flights", "search_flight_by_iata"]);

    let found = call(
        app.clone(),
        json!({
            "jsonrpc": "2.0",
            "id": 2,
            "method": "tools/call",
            "params": {
                "name": "find_duplicate_flights",
                "arguments": { "identifier": "BA249" }
            }
        }),
    )
    .await;
    assert_ne!(found["result"]["isError"], json!(true));
    let text = found["result"]["content"][0]["text"].as_str().unwrap();
    let payload: Value = serde_json::from_str(text).unwrap();
    let groups = payload["duplicates"].as_array().unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0]["flight_iata"], "BA249");
    assert_eq!(groups[0]["flights"].as_array().unwrap().len(), 2);

    let rejected = call(
        app,
        json!({
            "jsonrpc": "2.0",
            "id": 3,
            "method": "tools/call",
            "params": {
                "name": "search_flight_by_iata",
                "arguments": { "identifier": "" }
            }
        }),
    )
    .await;
    assert_eq!(rejected["result"]["isError"], json!(true));
}
