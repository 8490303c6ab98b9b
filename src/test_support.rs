//! Shared helpers for tests: a local stand-in for the provider.

use std::time::Duration;

use axum::Router;
use serde_json::{Value, json};

use crate::config::{ApiKey, Config};

pub const TEST_API_KEY: &str = "test-access-key";

/// Serve `router` on an ephemeral local port and return its `/v1` base URL.
pub async fn spawn_provider(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock provider");
    let addr = listener.local_addr().expect("Mock provider has no address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });
    format!("http://{}/v1", addr)
}

pub fn test_config(base_url: &str) -> Config {
    Config::new(ApiKey::new(TEST_API_KEY).unwrap())
        .with_base_url(base_url)
        .with_timeout(Duration::from_secs(5))
}

/// One provider flight entry.
pub fn flight_json(iata: &str, status: &str, airport: &str, scheduled: &str) -> Value {
    json!({
        "flight_date": &scheduled[..10],
        "flight_status": status,
        "departure": {
            "airport": "Departure Intl",
            "timezone": "Europe/London",
            "iata": airport,
            "icao": null,
            "terminal": "5",
            "gate": null,
            "delay": null,
            "scheduled": scheduled,
            "estimated": scheduled,
            "actual": null
        },
        "arrival": {
            "airport": "Rajiv Gandhi International",
            "iata": "HYD",
            "scheduled": "2025-06-02T04:05:00+00:00",
            "actual": null
        },
        "airline": { "name": "British Airways", "iata": "BA", "icao": "BAW" },
        "flight": {
            "number": &iata[2..],
            "iata": iata,
            "icao": null,
            "codeshared": null
        },
        "aircraft": null,
        "live": null
    })
}

/// A successful `/flights` body wrapping `flights`.
pub fn flights_body(flights: Vec<Value>) -> Value {
    let count = flights.len();
    json!({
        "pagination": { "limit": 100, "offset": 0, "count": count, "total": count },
        "data": flights
    })
}
