//! POI adapter for the Overpass (OpenStreetMap) API
//!
//! Two query shapes only: hostel nodes within a radius of a point, and a
//! single node by id. Results come back in upstream order; no filtering
//! or sorting happens on this side.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::config::UpstreamConfig;
use crate::error::HostelError;
use crate::models::{Coordinate, PointOfInterest};

/// Port for querying point-of-interest nodes from the map data service.
#[async_trait]
pub trait PoiProvider: Send + Sync {
    /// Nodes tagged `tourism=hostel` within `radius` meters of `center`,
    /// in upstream order.
    async fn hostels_around(
        &self,
        center: Coordinate,
        radius: u32,
    ) -> Result<Vec<PointOfInterest>, HostelError>;

    /// Single node lookup by id. The upstream query matches any node,
    /// hostel or not; there is no tag filter on this path.
    async fn node_by_id(&self, id: i64) -> Result<Vec<PointOfInterest>, HostelError>;
}

/// Overpass API client
pub struct OverpassClient {
    client: reqwest::Client,
    base_url: String,
}

impl OverpassClient {
    /// Create a new Overpass client with the configured timeout
    pub fn new(config: &UpstreamConfig) -> Result<Self, HostelError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(concat!("HostelFinder/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| HostelError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.overpass_base_url.clone(),
        })
    }

    async fn run_query(&self, query: &str) -> Result<Vec<PointOfInterest>, HostelError> {
        let url = format!("{}?data={}", self.base_url, urlencoding::encode(query));

        debug!("Overpass request URL: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(HostelError::from_transport)?;

        let payload: response::OverpassResponse = response
            .json()
            .await
            .map_err(|e| HostelError::query(format!("Failed to parse Overpass response: {e}")))?;

        debug!("Overpass returned {} element(s)", payload.elements.len());

        Ok(payload.elements)
    }
}

/// Overpass QL for hostel nodes around a point
fn around_query(radius: u32, center: Coordinate) -> String {
    format!(
        "[out:json];node[\"tourism\"=\"hostel\"](around:{},{},{});out;",
        radius, center.latitude, center.longitude
    )
}

/// Overpass QL for a single node by id
fn node_query(id: i64) -> String {
    format!("[out:json];node({id});out;")
}

#[async_trait]
impl PoiProvider for OverpassClient {
    async fn hostels_around(
        &self,
        center: Coordinate,
        radius: u32,
    ) -> Result<Vec<PointOfInterest>, HostelError> {
        self.run_query(&around_query(radius, center)).await
    }

    async fn node_by_id(&self, id: i64) -> Result<Vec<PointOfInterest>, HostelError> {
        self.run_query(&node_query(id)).await
    }
}

/// Overpass API response structures
mod response {
    use serde::Deserialize;

    use crate::models::PointOfInterest;

    /// Element envelope returned by the Overpass interpreter
    #[derive(Debug, Deserialize)]
    pub struct OverpassResponse {
        #[serde(default)]
        pub elements: Vec<PointOfInterest>,
    }
}
