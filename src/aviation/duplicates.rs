//! Duplicate flight detection.
//!
//! Two records are duplicates when they share the flight identifier, the
//! calendar day of the scheduled departure and the departure airport.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use super::models::FlightRecord;

/// Composite key records are grouped by.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DuplicateKey {
    pub flight_iata: String,
    pub departure_date: Option<NaiveDate>,
    pub departure_airport: String,
}

impl DuplicateKey {
    pub fn of(record: &FlightRecord) -> Self {
        Self {
            flight_iata: record.flight_iata.clone(),
            departure_date: record.departure_day(),
            departure_airport: record.departure.airport_iata.clone(),
        }
    }
}

/// Records judged equivalent, in their original relative order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuplicateGroup {
    #[serde(flatten)]
    pub key: DuplicateKey,
    pub flights: Vec<FlightRecord>,
}

/// Group `records` by [`DuplicateKey`] and keep groups of two or more.
///
/// Groups are ordered by the first appearance of their key.
pub fn find_duplicates(records: &[FlightRecord]) -> Vec<DuplicateGroup> {
    let mut index: HashMap<DuplicateKey, usize> = HashMap::new();
    let mut groups: Vec<DuplicateGroup> = Vec::new();

    for record in records {
        let key = DuplicateKey::of(record);
        match index.get(&key) {
            Some(&slot) => groups[slot].flights.push(record.clone()),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(DuplicateGroup {
                    key,
                    flights: vec![record.clone()],
                });
            }
        }
    }

    groups.retain(|group| group.flights.len() >= 2);
    groups
}
