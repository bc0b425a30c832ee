use std::time::Duration;

use async_trait::async_trait;
use configs::GeocodingConfig;
use serde_json::Value;
use tracing::{debug, error, warn};

use super::Geocoder;
use crate::errors::ServiceError;

/// US Census Bureau one-line address geocoder.
#[derive(Clone)]
pub struct CensusGeocoder {
    client: reqwest::Client,
    base_url: String,
}

impl CensusGeocoder {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ServiceError::Validation(format!("cannot build HTTP client: {e}")))?;
        Ok(Self { client, base_url: base_url.into() })
    }

    pub fn from_config(cfg: &GeocodingConfig) -> Result<Self, ServiceError> {
        Self::new(cfg.base_url.clone(), cfg.timeout())
    }

    fn endpoint(&self) -> String {
        format!("{}/locations/onelineaddress", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl Geocoder for CensusGeocoder {
    async fn geocode(&self, one_line_address: &str, benchmark: &str) -> Result<Value, ServiceError> {
        let url = self.endpoint();
        debug!(%url, address = %one_line_address, "calling census geocoder");
        let resp = self
            .client
            .get(&url)
            .query(&[("address", one_line_address), ("benchmark", benchmark), ("format", "json")])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                error!(error = %e, "HTTP error during geocoding");
                ServiceError::Validation(e.to_string())
            })?;

        let body = resp.text().await.map_err(|e| {
            error!(error = %e, "failed reading geocoder response");
            ServiceError::Validation(e.to_string())
        })?;

        Ok(serde_json::from_str(&body).unwrap_or_else(|e| {
            warn!(error = %e, "geocoder response is not JSON");
            Value::Null
        }))
    }
}
