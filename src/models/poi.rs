//! Point-of-interest records from the map data service

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A point-of-interest node as returned by the map data service.
///
/// The shape mirrors the raw upstream element so that records pass
/// through to clients untouched. `id` is the stable identity key;
/// list rendering keys on it, never on positional index.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PointOfInterest {
    /// Node identifier, unique within the upstream data source
    pub id: i64,
    /// Latitude in decimal degrees
    pub lat: f64,
    /// Longitude in decimal degrees
    pub lon: f64,
    /// Raw tags on the node, absent when it carries none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<HashMap<String, String>>,
}

impl PointOfInterest {
    /// The node's display name, when tagged with one
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.tags
            .as_ref()
            .and_then(|tags| tags.get("name"))
            .map(String::as_str)
    }

    /// Whether the node is tagged `tourism=hostel`
    #[must_use]
    pub fn is_hostel(&self) -> bool {
        self.tags
            .as_ref()
            .and_then(|tags| tags.get("tourism"))
            .is_some_and(|value| value == "hostel")
    }
}
