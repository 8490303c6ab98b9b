//! Provider response schema.
//!
//! The aviationstack `/flights` payload is deserialized into permissive raw
//! structs and then validated into [`FlightRecord`]s. Entries that lack a
//! required field are dropped individually instead of failing the batch.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::error::{AviationError, AviationResult};
use super::models::{Codeshare, FlightEndpoint, FlightRecord};

/// Longest slice of a raw error body carried into an error message.
const MAX_ERROR_BODY: usize = 200;

#[derive(Debug, Deserialize)]
struct FlightsEnvelope {
    data: Option<Vec<Value>>,
    error: Option<ProviderError>,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    code: Option<Value>,
    message: Option<String>,
}

impl ProviderError {
    fn describe(&self) -> String {
        match (&self.message, &self.code) {
            (Some(message), _) => message.clone(),
            (None, Some(Value::String(code))) => code.clone(),
            (None, Some(code)) => code.to_string(),
            (None, None) => "provider reported an error".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawFlight {
    flight_date: Option<String>,
    flight_status: Option<String>,
    departure: Option<RawEndpoint>,
    arrival: Option<RawEndpoint>,
    airline: Option<RawAirline>,
    flight: Option<RawFlightInfo>,
}

#[derive(Debug, Deserialize)]
struct RawEndpoint {
    airport: Option<String>,
    iata: Option<String>,
    scheduled: Option<String>,
    actual: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawAirline {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawFlightInfo {
    iata: Option<String>,
    codeshared: Option<RawCodeshare>,
}

#[derive(Debug, Deserialize)]
struct RawCodeshare {
    airline_name: Option<String>,
    flight_iata: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn timestamp(value: Option<&str>) -> Option<DateTime<FixedOffset>> {
    value.and_then(|v| DateTime::parse_from_rfc3339(v.trim()).ok())
}

impl TryFrom<RawFlight> for FlightRecord {
    /// Name of the first missing required field.
    type Error = &'static str;

    fn try_from(raw: RawFlight) -> Result<Self, Self::Error> {
        let flight = raw.flight.ok_or("flight")?;
        let flight_iata = non_blank(flight.iata)
            .ok_or("flight.iata")?
            .to_ascii_uppercase();

        let status = raw
            .flight_status
            .as_deref()
            .and_then(|s| s.parse().ok())
            .ok_or("flight_status")?;

        let departure = raw.departure.ok_or("departure")?;
        let departure_scheduled =
            timestamp(departure.scheduled.as_deref()).ok_or("departure.scheduled")?;
        let departure = FlightEndpoint {
            airport_iata: non_blank(departure.iata)
                .ok_or("departure.iata")?
                .to_ascii_uppercase(),
            airport_name: non_blank(departure.airport),
            scheduled: Some(departure_scheduled),
            actual: timestamp(departure.actual.as_deref()),
        };

        let arrival = raw.arrival.ok_or("arrival")?;
        let arrival = FlightEndpoint {
            airport_iata: non_blank(arrival.iata)
                .ok_or("arrival.iata")?
                .to_ascii_uppercase(),
            airport_name: non_blank(arrival.airport),
            scheduled: timestamp(arrival.scheduled.as_deref()),
            actual: timestamp(arrival.actual.as_deref()),
        };

        let codeshared = flight.codeshared.and_then(|c| {
            non_blank(c.flight_iata).map(|flight_iata| Codeshare {
                airline_name: non_blank(c.airline_name),
                flight_iata: flight_iata.to_ascii_uppercase(),
            })
        });

        Ok(FlightRecord {
            flight_iata,
            flight_date: raw
                .flight_date
                .as_deref()
                .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()),
            status,
            airline: raw.airline.and_then(|a| non_blank(a.name)),
            departure,
            arrival,
            codeshared,
        })
    }
}

/// Parse a successful (HTTP 200) `/flights` body.
///
/// A provider `error` object wins over `data`: the provider reports key and
/// plan problems with a 200 status.
pub fn parse_flights_body(status: u16, body: &str) -> AviationResult<Vec<FlightRecord>> {
    let envelope: FlightsEnvelope = serde_json::from_str(body)?;

    if let Some(error) = envelope.error {
        return Err(AviationError::Upstream {
            status: Some(status),
            message: error.describe(),
        });
    }

    let data = envelope.data.ok_or_else(|| AviationError::Parse {
        message: "response has no 'data' array".to_string(),
    })?;

    let total = data.len();
    let records: Vec<FlightRecord> = data
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| {
            let raw: RawFlight = match serde_json::from_value(value) {
                Ok(raw) => raw,
                Err(e) => {
                    debug!(index, error = %e, "Dropping flight entry with unexpected shape");
                    return None;
                }
            };
            match FlightRecord::try_from(raw) {
                Ok(record) => Some(record),
                Err(field) => {
                    debug!(index, field, "Dropping flight entry missing required field");
                    None
                }
            }
        })
        .collect();

    debug!(total, kept = records.len(), "Parsed provider flights");
    Ok(records)
}

/// Best-effort message for a non-success response body.
pub fn error_message_from_body(body: &str) -> String {
    if let Ok(FlightsEnvelope {
        error: Some(error), ..
    }) = serde_json::from_str::<FlightsEnvelope>(body)
    {
        return error.describe();
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "no response body".to_string();
    }
    trimmed.chars().take(MAX_ERROR_BODY).collect()
}
