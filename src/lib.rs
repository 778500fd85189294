//! Hostel Finder - hostel search around a city, backed by map data
//!
//! This library provides the backend orchestration (geocoding, nearby
//! hostel queries, detail lookups) and the client-side session gating
//! logic for the hostel search application.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod geocoding;
pub mod models;
pub mod overpass;
pub mod routing;
pub mod search;
pub mod session;
pub mod web;

// Re-export core types for public API
pub use auth::{AuthSession, Authenticator, IdentityClient, IdentityProvider};
pub use config::HostelConfig;
pub use error::{AuthErrorKind, HostelError};
pub use geocoding::{GeocodeProvider, GeocodedPlace, GeocodingClient};
pub use models::{Coordinate, PointOfInterest, SearchRequest};
pub use overpass::{OverpassClient, PoiProvider};
pub use routing::{Disposition, Route, disposition};
pub use search::{HostelSearchService, SearchSequencer, SearchTicket};
pub use session::{AuthStatus, GateState, Principal, SessionGate};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, HostelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
