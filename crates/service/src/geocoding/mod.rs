//! Address validation against an external geocoder.
//!
//! The geocoder returns a raw JSON payload; interpretation happens here so
//! that any structural problem degrades to "no match" while only transport
//! failures surface as errors.

pub mod census;

use std::sync::Arc;

use async_trait::async_trait;
use models::{AddressQuery, Coordinates, ValidatedAddress};
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::errors::ServiceError;
use crate::metrics;

pub use census::CensusGeocoder;

/// One-line address geocoding. Transport faults are `ServiceError::Validation`;
/// any payload that arrived is returned as-is, however malformed.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, one_line_address: &str, benchmark: &str) -> Result<Value, ServiceError>;
}

pub struct AddressValidator {
    geocoder: Arc<dyn Geocoder>,
    benchmark: String,
}

impl AddressValidator {
    pub fn new(geocoder: Arc<dyn Geocoder>, benchmark: impl Into<String>) -> Self {
        Self { geocoder, benchmark: benchmark.into() }
    }

    /// Validate loose fields; the state code is upper-cased first.
    pub async fn validate_address(
        &self,
        address: &str,
        city: &str,
        state: &str,
        zip_code: &str,
    ) -> Result<ValidatedAddress, ServiceError> {
        let query = AddressQuery::new(address, city, state, zip_code).validate()?;
        self.validate(&query).await
    }

    #[instrument(skip(self, query), fields(zip = %query.zip_code))]
    pub async fn validate(&self, query: &AddressQuery) -> Result<ValidatedAddress, ServiceError> {
        let one_line = query.one_line();
        metrics::GEOCODE_REQUESTS_TOTAL.inc();
        let payload = self.geocoder.geocode(&one_line, &self.benchmark).await.map_err(|e| {
            metrics::GEOCODE_FAILURES_TOTAL.inc();
            e
        })?;

        match first_match(&payload) {
            Some((matched, coordinates)) => {
                info!(matched = %matched, "address matched");
                Ok(ValidatedAddress::matched(matched, coordinates))
            }
            None => {
                warn!(address = %one_line, "no match found for address");
                Ok(ValidatedAddress::unmatched(one_line))
            }
        }
    }
}

#[derive(Deserialize)]
struct CensusPayload {
    result: CensusResult,
}

#[derive(Deserialize)]
struct CensusResult {
    #[serde(rename = "addressMatches")]
    address_matches: Vec<Value>,
}

#[derive(Deserialize)]
struct CensusMatch {
    #[serde(rename = "matchedAddress")]
    matched_address: String,
    coordinates: CensusCoordinates,
}

/// `x` is longitude, `y` latitude.
#[derive(Deserialize)]
struct CensusCoordinates {
    x: f64,
    y: f64,
}

/// First candidate's matched address and coordinates, if the payload has a
/// well-formed one. Later candidates are ignored even when the first is
/// malformed.
pub fn first_match(payload: &Value) -> Option<(String, Coordinates)> {
    let parsed = CensusPayload::deserialize(payload).ok()?;
    let first = parsed.result.address_matches.into_iter().next()?;
    let candidate = match CensusMatch::deserialize(first) {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, "malformed geocoder candidate");
            return None;
        }
    };
    if candidate.matched_address.is_empty() {
        return None;
    }
    let coordinates = Coordinates {
        latitude: candidate.coordinates.y,
        longitude: candidate.coordinates.x,
    };
    Some((candidate.matched_address, coordinates))
}
