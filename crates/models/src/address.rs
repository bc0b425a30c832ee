use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Structured US mailing address submitted for validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressQuery {
    pub address: String,
    pub city: String,
    pub state: String,
    #[serde(rename = "zipCode", alias = "zip_code")]
    pub zip_code: String,
}

impl AddressQuery {
    pub fn new(address: &str, city: &str, state: &str, zip_code: &str) -> Self {
        Self {
            address: address.to_string(),
            city: city.to_string(),
            state: state.to_string(),
            zip_code: zip_code.to_string(),
        }
    }

    /// Check field constraints and upper-case the state code.
    pub fn validate(mut self) -> Result<Self, ModelError> {
        if self.address.is_empty() {
            return Err(ModelError::Validation("address must not be empty".into()));
        }
        if self.city.is_empty() {
            return Err(ModelError::Validation("city must not be empty".into()));
        }
        if self.state.chars().count() != 2 {
            return Err(ModelError::Validation("state must be a 2-letter code".into()));
        }
        self.state = self.state.to_uppercase();
        Ok(self)
    }

    /// Free-text form sent to the geocoder: `"{address}, {city}, {state} {zip}"`.
    pub fn one_line(&self) -> String {
        format!("{}, {}, {} {}", self.address, self.city, self.state, self.zip_code)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Outcome of address validation. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatedAddress {
    #[serde(rename = "matchedAddress")]
    pub matched_address: String,
    pub coordinates: Coordinates,
    #[serde(rename = "isValid")]
    pub is_valid: bool,
}

impl ValidatedAddress {
    pub fn matched(matched_address: String, coordinates: Coordinates) -> Self {
        Self { matched_address, coordinates, is_valid: true }
    }

    /// No candidate: echo the query back with zeroed coordinates.
    pub fn unmatched(query: String) -> Self {
        Self { matched_address: query, coordinates: Coordinates::default(), is_valid: false }
    }
}
