//! Search orchestration: city name to coordinates to nearby hostels
//!
//! The service composes the geocoder and POI ports and owns the error
//! taxonomy translation; adapters stay pass-through. Dependencies are
//! passed in explicitly, there is no ambient lookup.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, info};

use crate::error::HostelError;
use crate::geocoding::GeocodeProvider;
use crate::models::{Coordinate, PointOfInterest, SearchRequest};
use crate::overpass::PoiProvider;

/// Orchestrates hostel searches and detail lookups.
pub struct HostelSearchService {
    geocoder: Arc<dyn GeocodeProvider>,
    pois: Arc<dyn PoiProvider>,
}

impl HostelSearchService {
    /// Create a service over the given adapter ports
    pub fn new(geocoder: Arc<dyn GeocodeProvider>, pois: Arc<dyn PoiProvider>) -> Self {
        Self { geocoder, pois }
    }

    /// Resolve a city name to its best-match coordinate.
    ///
    /// Validates locally first; an invalid city fails before any network
    /// call. Zero geocoding matches fail with a geocode error.
    pub async fn locate(&self, city: &str) -> Result<Coordinate, HostelError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(HostelError::validation("City name cannot be empty"));
        }

        let places = self.geocoder.geocode(city).await?;
        let place = places
            .into_iter()
            .next()
            .ok_or_else(|| HostelError::geocode(city))?;

        debug!(
            "Resolved {} to {} ({})",
            city,
            place.coordinate.format_coordinates(),
            place.name
        );

        Ok(place.coordinate)
    }

    /// Find hostels within `radius` meters of `city`.
    ///
    /// Returns the raw upstream records unfiltered and unsorted; ordering
    /// is whatever the map data service produced. Identical successive
    /// calls re-query both upstream services.
    pub async fn search(
        &self,
        city: &str,
        radius: u32,
    ) -> Result<Vec<PointOfInterest>, HostelError> {
        let request = SearchRequest::new(city, radius)?;

        let center = self.locate(request.city()).await?;
        let hostels = self.pois.hostels_around(center, request.radius()).await?;

        info!(
            "Found {} hostel(s) within {}m of {}",
            hostels.len(),
            request.radius(),
            request.city()
        );

        Ok(hostels)
    }

    /// Look up a single node by id.
    ///
    /// An empty upstream element set means the id does not exist and
    /// fails with a not-found error; otherwise the first (and expected
    /// only) element is returned.
    pub async fn get_details(&self, id: i64) -> Result<PointOfInterest, HostelError> {
        let mut elements = self.pois.node_by_id(id).await?;

        if elements.is_empty() {
            return Err(HostelError::NotFound);
        }

        Ok(elements.remove(0))
    }
}

/// Hands out monotonically increasing tickets so that search results
/// arriving after a newer request was issued can be discarded.
///
/// In-flight upstream calls are not cancellable; this is the latest-wins
/// guard on the receiving side.
#[derive(Debug, Default)]
pub struct SearchSequencer {
    latest: AtomicU64,
}

/// Ticket identifying one issued search request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchTicket(u64);

impl SearchSequencer {
    /// Create a sequencer with no requests issued yet
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new request, superseding all earlier tickets
    pub fn begin(&self) -> SearchTicket {
        SearchTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether the ticket still belongs to the newest request
    pub fn is_current(&self, ticket: SearchTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Accept a result only if its ticket has not been superseded
    pub fn accept<T>(&self, ticket: SearchTicket, results: T) -> Option<T> {
        if self.is_current(ticket) {
            Some(results)
        } else {
            debug!("Discarding stale search results for superseded request");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::AtomicUsize;

    use async_trait::async_trait;

    use super::*;
    use crate::geocoding::GeocodedPlace;

    /// Geocoder fake returning fixed places and counting calls
    struct FixtureGeocoder {
        places: Vec<GeocodedPlace>,
        calls: AtomicUsize,
    }

    impl FixtureGeocoder {
        fn with_places(places: Vec<GeocodedPlace>) -> Self {
            Self {
                places,
                calls: AtomicUsize::new(0),
            }
        }

        fn empty() -> Self {
            Self::with_places(Vec::new())
        }
    }

    #[async_trait]
    impl GeocodeProvider for FixtureGeocoder {
        async fn geocode(&self, _city: &str) -> Result<Vec<GeocodedPlace>, HostelError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.places.clone())
        }
    }

    /// POI fake returning fixed elements and counting calls
    struct FixturePois {
        elements: Vec<PointOfInterest>,
        calls: AtomicUsize,
    }

    impl FixturePois {
        fn with_elements(elements: Vec<PointOfInterest>) -> Self {
            Self {
                elements,
                calls: AtomicUsize::new(0),
            }
        }

        fn empty() -> Self {
            Self::with_elements(Vec::new())
        }
    }

    #[async_trait]
    impl PoiProvider for FixturePois {
        async fn hostels_around(
            &self,
            _center: Coordinate,
            _radius: u32,
        ) -> Result<Vec<PointOfInterest>, HostelError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.elements.clone())
        }

        async fn node_by_id(&self, _id: i64) -> Result<Vec<PointOfInterest>, HostelError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.elements.clone())
        }
    }

    fn springfield_place() -> GeocodedPlace {
        GeocodedPlace {
            name: "Springfield".to_string(),
            coordinate: Coordinate::new(39.8, -89.6),
            country: Some("United States".to_string()),
        }
    }

    fn hostel(id: i64, name: &str) -> PointOfInterest {
        PointOfInterest {
            id,
            lat: 39.8,
            lon: -89.6,
            tags: Some(HashMap::from([
                ("tourism".to_string(), "hostel".to_string()),
                ("name".to_string(), name.to_string()),
            ])),
        }
    }

    fn service(
        geocoder: FixtureGeocoder,
        pois: FixturePois,
    ) -> (HostelSearchService, Arc<FixtureGeocoder>, Arc<FixturePois>) {
        let geocoder = Arc::new(geocoder);
        let pois = Arc::new(pois);
        let service = HostelSearchService::new(geocoder.clone(), pois.clone());
        (service, geocoder, pois)
    }

    #[tokio::test]
    async fn test_search_empty_city_fails_without_network_calls() {
        let (service, geocoder, pois) =
            service(FixtureGeocoder::empty(), FixturePois::empty());

        let result = service.search("", 500).await;

        assert!(matches!(result, Err(HostelError::Validation { .. })));
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 0);
        assert_eq!(pois.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_search_zero_radius_fails_without_network_calls() {
        let (service, geocoder, pois) =
            service(FixtureGeocoder::empty(), FixturePois::empty());

        let result = service.search("Paris", 0).await;

        assert!(matches!(result, Err(HostelError::Validation { .. })));
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 0);
        assert_eq!(pois.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_search_unresolvable_city_fails_with_geocode_error() {
        let (service, _geocoder, pois) =
            service(FixtureGeocoder::empty(), FixturePois::empty());

        let result = service.search("Atlantis", 1000).await;

        assert!(matches!(result, Err(HostelError::Geocode { .. })));
        assert_eq!(pois.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_search_returns_upstream_records_in_order() {
        let records = vec![hostel(1, "First Hostel"), hostel(2, "Second Hostel")];
        let (service, _, _) = service(
            FixtureGeocoder::with_places(vec![springfield_place()]),
            FixturePois::with_elements(records.clone()),
        );

        let results = service.search("Springfield", 1000).await.unwrap();

        assert_eq!(results, records);
    }

    #[tokio::test]
    async fn test_locate_returns_first_match() {
        let (service, _, _) = service(
            FixtureGeocoder::with_places(vec![springfield_place()]),
            FixturePois::empty(),
        );

        let coordinate = service.locate("Springfield").await.unwrap();

        assert_eq!(coordinate, Coordinate::new(39.8, -89.6));
    }

    #[tokio::test]
    async fn test_get_details_empty_result_is_not_found() {
        let (service, _, _) = service(FixtureGeocoder::empty(), FixturePois::empty());

        let result = service.get_details(12345).await;

        assert!(matches!(result, Err(HostelError::NotFound)));
    }

    #[tokio::test]
    async fn test_get_details_returns_first_element() {
        let (service, _, _) = service(
            FixtureGeocoder::empty(),
            FixturePois::with_elements(vec![hostel(12345, "Lookup Hostel")]),
        );

        let poi = service.get_details(12345).await.unwrap();

        assert_eq!(poi.id, 12345);
        assert_eq!(poi.name(), Some("Lookup Hostel"));
    }

    #[test]
    fn test_sequencer_accepts_current_ticket() {
        let sequencer = SearchSequencer::new();
        let ticket = sequencer.begin();

        assert_eq!(sequencer.accept(ticket, vec![1, 2]), Some(vec![1, 2]));
    }

    #[test]
    fn test_sequencer_discards_superseded_ticket() {
        let sequencer = SearchSequencer::new();
        let stale = sequencer.begin();
        let fresh = sequencer.begin();

        assert_eq!(sequencer.accept(stale, "old"), None);
        assert_eq!(sequencer.accept(fresh, "new"), Some("new"));
    }
}
