//! Flight domain types.
//!
//! These are the validated shapes handed to the tool layer. Provider JSON
//! never reaches this module directly; see [`super::wire`] for the schema
//! mapping.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::Serialize;

use super::error::{AviationError, AviationResult};

/// Result limit used by flight search when the caller gives none.
pub const DEFAULT_SEARCH_LIMIT: u32 = 5;
/// Result limit used by duplicate detection when the caller gives none.
pub const DEFAULT_DUPLICATE_LIMIT: u32 = 20;
/// Upper bound the provider accepts for `limit`.
pub const MAX_LIMIT: u32 = 100;

/// Reported status of a flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlightStatus {
    Scheduled,
    Active,
    Landed,
    Cancelled,
    Incident,
    Diverted,
}

impl FromStr for FlightStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scheduled" => Ok(Self::Scheduled),
            "active" => Ok(Self::Active),
            "landed" => Ok(Self::Landed),
            "cancelled" => Ok(Self::Cancelled),
            "incident" => Ok(Self::Incident),
            "diverted" => Ok(Self::Diverted),
            other => Err(format!("unknown flight status '{other}'")),
        }
    }
}

/// One end of a flight (departure or arrival).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightEndpoint {
    pub airport_iata: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub airport_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled: Option<DateTime<FixedOffset>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<DateTime<FixedOffset>>,
}

/// Operating flight behind a codeshare listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Codeshare {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub airline_name: Option<String>,
    pub flight_iata: String,
}

/// One reported flight status, as returned to MCP clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightRecord {
    pub flight_iata: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flight_date: Option<NaiveDate>,
    pub status: FlightStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub airline: Option<String>,
    /// `scheduled` is always present on departures.
    pub departure: FlightEndpoint,
    pub arrival: FlightEndpoint,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub codeshared: Option<Codeshare>,
}

impl FlightRecord {
    /// Calendar day of the scheduled departure, in the departure airport's offset.
    pub fn departure_day(&self) -> Option<NaiveDate> {
        self.departure.scheduled.map(|ts| ts.date_naive())
    }
}

/// A validated IATA flight code such as `BA249` or `U21234`.
///
/// Two-character airline designator, 1-4 digit flight number and an
/// optional one-letter operational suffix. Stored upper-cased.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IataFlightCode(String);

impl IataFlightCode {
    pub fn parse(input: &str) -> AviationResult<Self> {
        let code = input.trim().to_ascii_uppercase();
        if code.is_empty() {
            return Err(AviationError::invalid_argument(
                "identifier must be a non-empty IATA flight code (e.g. BA249)",
            ));
        }

        if !is_iata_flight_code(&code) {
            return Err(AviationError::invalid_argument(format!(
                "'{}' is not a valid IATA flight code (expected e.g. BA249)",
                input.trim()
            )));
        }

        Ok(Self(code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IataFlightCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_iata_flight_code(code: &str) -> bool {
    let bytes = code.as_bytes();
    if bytes.len() < 3 || !bytes.iter().all(u8::is_ascii_alphanumeric) {
        return false;
    }

    let (designator, rest) = bytes.split_at(2);
    // A designator can mix letters and digits, but not be all digits.
    if designator.iter().all(u8::is_ascii_digit) {
        return false;
    }

    let rest = match rest.last() {
        Some(last) if last.is_ascii_alphabetic() => &rest[..rest.len() - 1],
        _ => rest,
    };

    (1..=4).contains(&rest.len()) && rest.iter().all(u8::is_ascii_digit)
}

/// Parameters of one provider lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightQuery {
    pub identifier: IataFlightCode,
    pub flight_date: Option<NaiveDate>,
    pub limit: u32,
}

impl FlightQuery {
    pub fn new(identifier: &str) -> AviationResult<Self> {
        Ok(Self {
            identifier: IataFlightCode::parse(identifier)?,
            flight_date: None,
            limit: DEFAULT_SEARCH_LIMIT,
        })
    }

    /// Restrict to one flight date given as `YYYY-MM-DD`. Blank means no filter.
    pub fn with_flight_date(mut self, date: Option<&str>) -> AviationResult<Self> {
        self.flight_date = match date.map(str::trim).filter(|d| !d.is_empty()) {
            Some(d) => Some(NaiveDate::parse_from_str(d, "%Y-%m-%d").map_err(|_| {
                AviationError::invalid_argument(format!(
                    "flight_date '{d}' must be formatted as YYYY-MM-DD"
                ))
            })?),
            None => None,
        };
        Ok(self)
    }

    /// Set the result limit, clamped to `1..=MAX_LIMIT`.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit.clamp(1, MAX_LIMIT);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iata_code_accepts_common_shapes() {
        for code in ["BA249", "DL123", "U21234", "3K1", "AA1004A", " ba249 "] {
            assert!(IataFlightCode::parse(code).is_ok(), "{code} should be valid");
        }
    }

    #[test]
    fn test_iata_code_is_normalised() {
        let code = IataFlightCode::parse("  cx383 ").unwrap();
        assert_eq!(code.as_str(), "CX383");
        assert_eq!(code.to_string(), "CX383");
    }

    #[test]
    fn test_iata_code_rejects_bad_input() {
        for code in ["", "   ", "BA", "BA12345", "12345", "BA-249", "BAW249", "BA249XY"] {
            let err = IataFlightCode::parse(code).unwrap_err();
            assert_eq!(err.kind(), "invalid_argument", "{code:?} should be rejected");
        }
    }

    #[test]
    fn test_flight_status_from_str() {
        assert_eq!("landed".parse::<FlightStatus>(), Ok(FlightStatus::Landed));
        assert_eq!("Cancelled".parse::<FlightStatus>(), Ok(FlightStatus::Cancelled));
        assert!("boarding".parse::<FlightStatus>().is_err());
    }

    #[test]
    fn test_query_limit_is_clamped() {
        let query = FlightQuery::new("BA249").unwrap();
        assert_eq!(query.limit, DEFAULT_SEARCH_LIMIT);
        assert_eq!(query.clone().with_limit(0).limit, 1);
        assert_eq!(query.with_limit(1000).limit, MAX_LIMIT);
    }

    #[test]
    fn test_query_flight_date() {
        let query = FlightQuery::new("BA249")
            .unwrap()
            .with_flight_date(Some("2025-06-01"))
            .unwrap();
        assert_eq!(query.flight_date, NaiveDate::from_ymd_opt(2025, 6, 1));

        let blank = FlightQuery::new("BA249")
            .unwrap()
            .with_flight_date(Some("  "))
            .unwrap();
        assert_eq!(blank.flight_date, None);

        let err = FlightQuery::new("BA249")
            .unwrap()
            .with_flight_date(Some("01/06/2025"))
            .unwrap_err();
        assert_eq!(err.kind(), "invalid_argument");
    }
}
