//! Geocoder adapter for the Open-Meteo geocoding API
//!
//! Resolves free-text city names to coordinates. The adapter is a thin
//! pass-through: transport and parse failures surface upward unmodified,
//! and the orchestrator decides what an empty result set means.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::config::UpstreamConfig;
use crate::error::HostelError;
use crate::models::Coordinate;

/// A geocoding match with coordinates and display metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodedPlace {
    /// Resolved place name
    pub name: String,
    /// Resolved coordinate
    pub coordinate: Coordinate,
    /// Country name, when the upstream reports one
    pub country: Option<String>,
}

/// Port for resolving a free-text place name to candidate coordinates.
#[async_trait]
pub trait GeocodeProvider: Send + Sync {
    /// Look up a place name. An empty vec means no match; callers decide
    /// how to report that.
    async fn geocode(&self, city: &str) -> Result<Vec<GeocodedPlace>, HostelError>;
}

/// Geocoding client for the Open-Meteo geocoding API
pub struct GeocodingClient {
    client: reqwest::Client,
    base_url: String,
}

impl GeocodingClient {
    /// Create a new geocoding client with the configured timeout
    pub fn new(config: &UpstreamConfig) -> Result<Self, HostelError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(concat!("HostelFinder/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| HostelError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.geocoding_base_url.clone(),
        })
    }
}

#[async_trait]
impl GeocodeProvider for GeocodingClient {
    async fn geocode(&self, city: &str) -> Result<Vec<GeocodedPlace>, HostelError> {
        let url = format!(
            "{}/search?name={}&count=1&format=json",
            self.base_url,
            urlencoding::encode(city)
        );

        debug!("Geocoding request URL: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(HostelError::from_transport)?;

        let payload: openmeteo::GeocodingResponse = response
            .json()
            .await
            .map_err(|e| HostelError::query(format!("Failed to parse geocoding response: {e}")))?;

        let places: Vec<GeocodedPlace> = payload
            .results
            .unwrap_or_default()
            .into_iter()
            .map(Into::into)
            .collect();

        debug!("Geocoding returned {} match(es) for {}", places.len(), city);

        Ok(places)
    }
}

/// `OpenMeteo` geocoding response structures
mod openmeteo {
    use serde::Deserialize;

    use super::GeocodedPlace;
    use crate::models::Coordinate;

    /// Geocoding response from `OpenMeteo`
    #[derive(Debug, Deserialize)]
    pub struct GeocodingResponse {
        pub results: Option<Vec<GeocodingResult>>,
    }

    #[derive(Debug, Deserialize)]
    pub struct GeocodingResult {
        pub name: String,
        pub latitude: f64,
        pub longitude: f64,
        pub country: Option<String>,
    }

    impl From<GeocodingResult> for GeocodedPlace {
        fn from(result: GeocodingResult) -> Self {
            Self {
                name: result.name,
                coordinate: Coordinate::new(result.latitude, result.longitude),
                country: result.country,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::openmeteo::GeocodingResponse;
    use super::*;

    #[test]
    fn test_parse_geocoding_response() {
        let payload = r#"{
            "results": [
                {
                    "id": 4250542,
                    "name": "Springfield",
                    "latitude": 39.8,
                    "longitude": -89.6,
                    "country": "United States",
                    "admin1": "Illinois"
                }
            ],
            "generationtime_ms": 0.59
        }"#;

        let response: GeocodingResponse = serde_json::from_str(payload).unwrap();
        let places: Vec<GeocodedPlace> = response
            .results
            .unwrap_or_default()
            .into_iter()
            .map(Into::into)
            .collect();

        assert_eq!(places.len(), 1);
        assert_eq!(places[0].name, "Springfield");
        assert_eq!(places[0].coordinate, Coordinate::new(39.8, -89.6));
        assert_eq!(places[0].country.as_deref(), Some("United States"));
    }

    #[test]
    fn test_parse_empty_geocoding_response() {
        // OpenMeteo omits the results key entirely when nothing matches
        let payload = r#"{"generationtime_ms": 0.2}"#;

        let response: GeocodingResponse = serde_json::from_str(payload).unwrap();
        assert!(response.results.is_none());
    }

    #[test]
    fn test_client_creation() {
        let client = GeocodingClient::new(&crate::config::UpstreamConfig::default());
        assert!(client.is_ok());
    }
}
