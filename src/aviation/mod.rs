//! aviationstack access: typed flight records, the HTTP client and
//! duplicate detection over fetched records.

pub mod client;
pub mod duplicates;
pub mod error;
pub mod models;
mod wire;


pub use client::{AviationStackClient, FlightSource};
pub use duplicates::{DuplicateGroup, DuplicateKey, find_duplicates};
pub use error::{AviationError, AviationResult};
pub use models::{
    Codeshare, DEFAULT_DUPLICATE_LIMIT, DEFAULT_SEARCH_LIMIT, FlightEndpoint, FlightQuery,
    FlightRecord, FlightStatus, IataFlightCode, MAX_LIMIT,
};
