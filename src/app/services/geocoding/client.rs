//! External geocoding clients

use crate::app::models::{Coordinates, Country};
use crate::config::GeocodingConfig;
use crate::{Error, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

/// What to look up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeocodeQuery {
    pub postal_code: String,
    pub address: String,
    pub country: Country,
}

impl GeocodeQuery {
    pub fn new(postal_code: &str, address: &str, country: Country) -> Self {
        Self {
            postal_code: postal_code.trim().to_string(),
            address: address.trim().to_string(),
            country,
        }
    }

    /// Free-text query with the country appended
    pub fn query_text(&self) -> Option<String> {
        let country = match self.country {
            Country::Singapore => "Singapore",
            Country::Malaysia => "Malaysia",
        };

        if !self.address.is_empty() {
            Some(format!("{}, {}", self.address, country))
        } else if !self.postal_code.is_empty() {
            Some(format!("{} {}", country, self.postal_code))
        } else {
            None
        }
    }
}

/// External geocoding service
///
/// `Ok(None)` means the service answered and found nothing; errors mean it
/// could not answer at all.
#[async_trait]
pub trait GeocodingClient: Send + Sync {
    async fn geocode(&self, query: &GeocodeQuery) -> Result<Option<Coordinates>>;
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResponseResult>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponseResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: Location,
}

#[derive(Debug, Deserialize)]
struct Location {
    lat: f64,
    lng: f64,
}

/// Google Geocoding API client
#[derive(Debug, Clone)]
pub struct GoogleGeocodingClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl GoogleGeocodingClient {
    /// Build a client from configuration; `None` when no API key is set
    pub fn from_config(config: &GeocodingConfig) -> Result<Option<Self>> {
        let Some(api_key) = config.api_key.clone().filter(|_| config.is_enabled()) else {
            return Ok(None);
        };

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| Error::geocode_unavailable(format!("HTTP client setup failed: {}", e)))?;

        Ok(Some(Self {
            http,
            endpoint: config.endpoint.clone(),
            api_key,
        }))
    }
}

#[async_trait]
impl GeocodingClient for GoogleGeocodingClient {
    async fn geocode(&self, query: &GeocodeQuery) -> Result<Option<Coordinates>> {
        let Some(text) = query.query_text() else {
            return Ok(None);
        };

        let response = self
            .http
            .get(&self.endpoint)
            .query(&[("address", text.as_str()), ("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| Error::geocode_unavailable(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::geocode_unavailable(format!(
                "HTTP status {}",
                response.status()
            )));
        }

        let body: GeocodeResponse = response
            .json()
            .await
            .map_err(|e| Error::geocode_unavailable(format!("invalid response: {}", e)))?;

        match body.status.as_str() {
            "OK" => Ok(body
                .results
                .first()
                .map(|r| Coordinates::new(r.geometry.location.lat, r.geometry.location.lng))),
            "ZERO_RESULTS" => {
                debug!("No geocoding results for '{}'", text);
                Ok(None)
            }
            status => Err(Error::geocode_unavailable(format!(
                "service returned {}{}",
                status,
                body.error_message
                    .map(|m| format!(": {}", m))
                    .unwrap_or_default()
            ))),
        }
    }
}
