//! HTTP client for the aviationstack REST API.

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use super::error::{AviationError, AviationResult};
use super::models::{FlightQuery, FlightRecord};
use super::wire::{error_message_from_body, parse_flights_body};
use crate::config::{ApiKey, Config, ConfigError};

/// Source of flight records. Lets tool handlers run against a stub in tests.
pub trait FlightSource: Send + Sync + 'static {
    /// Fetch the flights reported for one identifier.
    fn fetch_by_identifier(
        &self,
        query: &FlightQuery,
    ) -> impl Future<Output = AviationResult<Vec<FlightRecord>>> + Send;
}

/// aviationstack `/flights` client.
///
/// One GET per call: no retries, no caching.
#[derive(Clone)]
pub struct AviationStackClient {
    base_url: String,
    api_key: ApiKey,
    timeout: Duration,
    client: Client,
}

impl AviationStackClient {
    /// Build a client from the process configuration.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("aviation-stack-mcp/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| ConfigError::HttpClient { source })?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            timeout: config.timeout,
            client,
        })
    }

    /// Get the base URL being used
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn map_send_error(&self, e: reqwest::Error) -> AviationError {
        if e.is_timeout() {
            AviationError::Upstream {
                status: None,
                message: format!("request timed out after {}s", self.timeout.as_secs_f64()),
            }
        } else {
            // The URL carries the access key; it must not reach messages or logs.
            let e = e.without_url();
            let reason = if e.is_connect() {
                "could not connect to provider"
            } else if e.is_body() || e.is_decode() {
                "failed to read provider response"
            } else {
                "request failed"
            };
            AviationError::Upstream {
                status: e.status().map(|s| s.as_u16()),
                message: format!("{reason}: {e}"),
            }
        }
    }
}

impl FlightSource for AviationStackClient {
    async fn fetch_by_identifier(
        &self,
        query: &FlightQuery,
    ) -> AviationResult<Vec<FlightRecord>> {
        let url = format!("{}/flights", self.base_url);
        let limit = query.limit.to_string();
        let flight_date = query.flight_date.map(|d| d.format("%Y-%m-%d").to_string());

        let mut params = vec![
            ("access_key", self.api_key.expose()),
            ("flight_iata", query.identifier.as_str()),
            ("limit", limit.as_str()),
        ];
        if let Some(date) = flight_date.as_deref() {
            params.push(("flight_date", date));
        }

        debug!(
            identifier = %query.identifier,
            flight_date = ?query.flight_date,
            limit = query.limit,
            "Requesting flights from provider"
        );

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.map_send_error(e))?;

        if status != StatusCode::OK {
            let message = error_message_from_body(&body);
            warn!(status = status.as_u16(), %message, "Provider request failed");
            return Err(AviationError::Upstream {
                status: Some(status.as_u16()),
                message,
            });
        }

        parse_flights_body(status.as_u16(), &body)
    }
}
