//! Data models for the hostel finder application
//!
//! This module contains the core domain models organized by concern:
//! - Location: Geographic coordinates
//! - Poi: Point-of-interest records from the map data service
//! - Search: Validated user search input

pub mod location;
pub mod poi;
pub mod search;

// Re-export all public types for convenient access
pub use location::Coordinate;
pub use poi::PointOfInterest;
pub use search::SearchRequest;
