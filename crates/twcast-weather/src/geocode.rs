//! Reverse geocoding: convert coordinates to an administrative area name.
//! Uses Nominatim (OpenStreetMap) - free, no API key required.

use crate::types::Location;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::instrument;

const REQUEST_TIMEOUT_SECS: u64 = 10;
const USER_AGENT: &str = concat!("twcast/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct NominatimResponse {
    address: Option<NominatimAddress>,
}

#[derive(Debug, Deserialize)]
struct NominatimAddress {
    county: Option<String>,
    city: Option<String>,
    town: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Geocoder returned status {0}")]
    Status(u16),
    #[error("Parse error: {0}")]
    Parse(String),
}

#[derive(Debug, Clone)]
pub struct Geocoder {
    client: Client,
    base_url: String,
}

impl Geocoder {
    pub fn new(base_url: &str) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Reverse geocode coordinates to the county, city or town name, in that
    /// order of preference. Yields an empty string when the address has none.
    #[instrument(skip(self), level = "debug")]
    pub async fn reverse(&self, location: &Location) -> Result<String, GeocodeError> {
        let url = format!(
            "{}?lat={}&lon={}&format=json",
            self.base_url, location.latitude, location.longitude
        );

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            tracing::debug!("Reverse geocode returned status {}", response.status());
            return Err(GeocodeError::Status(response.status().as_u16()));
        }

        let body: NominatimResponse = response
            .json()
            .await
            .map_err(|e| GeocodeError::Parse(e.to_string()))?;

        let addr = body
            .address
            .ok_or_else(|| GeocodeError::Parse("response has no address".to_string()))?;

        let area = addr.county.or(addr.city).or(addr.town).unwrap_or_default();

        tracing::info!("Reverse geocoded to: {:?}", area);
        Ok(area)
    }
}
