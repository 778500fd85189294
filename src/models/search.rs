//! Validated search input

use crate::error::HostelError;

/// A validated hostel search request.
///
/// Construction is the validation boundary: an instance always holds a
/// non-empty city name and a positive radius, so nothing downstream
/// re-checks them before dispatching network calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    city: String,
    radius: u32,
}

impl SearchRequest {
    /// Validate raw user input into a search request.
    ///
    /// Fails with a validation error on an empty (or whitespace-only)
    /// city or a zero radius, before any network call happens.
    pub fn new(city: &str, radius: u32) -> Result<Self, HostelError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(HostelError::validation("City name cannot be empty"));
        }
        if radius == 0 {
            return Err(HostelError::validation(
                "Radius must be a positive number of meters",
            ));
        }
        Ok(Self {
            city: city.to_string(),
            radius,
        })
    }

    /// The city to search around
    #[must_use]
    pub fn city(&self) -> &str {
        &self.city
    }

    /// Search radius in meters
    #[must_use]
    pub fn radius(&self) -> u32 {
        self.radius
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn test_valid_request() {
        let request = SearchRequest::new("Paris", 500).unwrap();
        assert_eq!(request.city(), "Paris");
        assert_eq!(request.radius(), 500);
    }

    #[test]
    fn test_city_is_trimmed() {
        let request = SearchRequest::new("  Paris  ", 500).unwrap();
        assert_eq!(request.city(), "Paris");
    }

    #[rstest]
    #[case("", 500)]
    #[case("   ", 500)]
    #[case("Paris", 0)]
    fn test_invalid_input_rejected(#[case] city: &str, #[case] radius: u32) {
        let result = SearchRequest::new(city, radius);
        assert!(matches!(result, Err(HostelError::Validation { .. })));
    }
}
