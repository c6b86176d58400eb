//! Turn free-text location input into coordinates.
//!
//! Resolution tries three tiers in order and stops at the first that
//! answers:
//!
//! 1. the input itself parsed as `lat,lon`;
//! 2. the host's [`CoordinateLookup`], whose answer must itself be shaped
//!    like `lat,lon`;
//! 3. the [`GeocodingApi`], taking the first result.
//!
//! Only the third tier marks the outcome as geocoded. Unresolvable input is
//! reported as `Ok(None)`; errors are reserved for geocoding transport
//! failures.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{ApiError, Coordinate, GeocodingApi};

/// Host-provided lookup from names or aliases to coordinate text.
pub trait CoordinateLookup: Send + Sync {
    /// Return the `lat,lon` text for `input`, if the host knows it.
    fn find_coordinates(&self, input: &str) -> Option<String>;
}

/// Case-insensitive table of named places.
///
/// Keys are compared after trimming and lowercasing, so `Home`, `home` and
/// ` HOME ` all refer to the same place.
///
/// # Examples
/// ```
/// use travel_time_core::{CoordinateLookup, NamedPlaces};
///
/// let places = NamedPlaces::from_iter([("Home", "51.2,5.3")]);
/// assert_eq!(places.find_coordinates(" home "), Some("51.2,5.3".to_owned()));
/// assert_eq!(places.find_coordinates("work"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NamedPlaces {
    places: HashMap<String, String>,
}

impl NamedPlaces {
    /// Record `coordinates` under `name`, replacing any previous entry.
    pub fn insert(&mut self, name: &str, coordinates: impl Into<String>) {
        self.places.insert(normalise_name(name), coordinates.into());
    }

    /// Remove `name`, returning its coordinate text if it was present.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.places.remove(&normalise_name(name))
    }

    /// Number of known places.
    #[must_use]
    pub fn len(&self) -> usize {
        self.places.len()
    }

    /// Whether no places are known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for NamedPlaces {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut places = Self::default();
        for (name, coordinates) in iter {
            places.insert(name.as_ref(), coordinates);
        }
        places
    }
}

impl CoordinateLookup for NamedPlaces {
    fn find_coordinates(&self, input: &str) -> Option<String> {
        self.places.get(&normalise_name(input)).cloned()
    }
}

impl std::fmt::Debug for dyn CoordinateLookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("<dyn CoordinateLookup>")
    }
}

fn normalise_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// A coordinate together with how it was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLocation {
    /// The resolved position.
    pub location: Coordinate,
    /// Whether the position came from the geocoding service.
    pub geocoded: bool,
}

/// Resolves location input using the three-tier fallback.
#[derive(Debug, Clone)]
pub struct LocationResolver {
    lookup: Arc<dyn CoordinateLookup>,
    geocoder: Arc<dyn GeocodingApi>,
}

impl LocationResolver {
    /// Create a resolver backed by `lookup` and `geocoder`.
    #[must_use]
    pub fn new(lookup: Arc<dyn CoordinateLookup>, geocoder: Arc<dyn GeocodingApi>) -> Self {
        Self { lookup, geocoder }
    }

    /// Resolve `input` to a coordinate.
    ///
    /// Returns `Ok(None)` when no tier recognises the input.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] raised by the geocoding service when the
    /// third tier is reached and the call fails.
    pub async fn resolve(&self, input: &str) -> Result<Option<ResolvedLocation>, ApiError> {
        if let Ok(location) = input.parse::<Coordinate>() {
            return Ok(Some(ResolvedLocation {
                location,
                geocoded: false,
            }));
        }

        if let Some(found) = self.lookup.find_coordinates(input)
            && let Ok(location) = found.parse::<Coordinate>()
        {
            log::debug!("Resolved '{input}' through the host lookup");
            return Ok(Some(ResolvedLocation {
                location,
                geocoded: false,
            }));
        }

        let response = self.geocoder.geocode(input).await?;
        Ok(response.results.first().map(|result| {
            log::info!("Geocoded '{input}' to {}", result.position);
            ResolvedLocation {
                location: result.position,
                geocoded: true,
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::StubGeocodingApi;
    use rstest::{fixture, rstest};

    #[fixture]
    fn places() -> NamedPlaces {
        NamedPlaces::from_iter([("zone.home", "51.2,5.3"), ("garage", "not a coordinate")])
    }

    fn resolver(places: NamedPlaces, geocoder: &StubGeocodingApi) -> LocationResolver {
        LocationResolver::new(Arc::new(places), Arc::new(geocoder.clone()))
    }

    #[rstest]
    #[tokio::test]
    async fn literal_coordinates_skip_lookup_and_geocoder(places: NamedPlaces) {
        let geocoder = StubGeocodingApi::with_position(Coordinate::new(1.0, 1.0));
        let resolved = resolver(places, &geocoder)
            .resolve("52.1,4.2")
            .await
            .expect("resolution should succeed");

        assert_eq!(
            resolved,
            Some(ResolvedLocation {
                location: Coordinate::new(52.1, 4.2),
                geocoded: false,
            })
        );
        assert_eq!(geocoder.call_count(), 0);
    }

    #[rstest]
    #[tokio::test]
    async fn host_lookup_answers_before_geocoding(places: NamedPlaces) {
        let geocoder = StubGeocodingApi::with_position(Coordinate::new(1.0, 1.0));
        let resolved = resolver(places, &geocoder)
            .resolve("zone.home")
            .await
            .expect("resolution should succeed")
            .expect("lookup should answer");

        assert_eq!(resolved.location, Coordinate::new(51.2, 5.3));
        assert!(!resolved.geocoded);
        assert_eq!(geocoder.call_count(), 0);
    }

    #[rstest]
    #[tokio::test]
    async fn malformed_lookup_answer_falls_through_to_geocoder(places: NamedPlaces) {
        let geocoder = StubGeocodingApi::with_position(Coordinate::new(48.8, 2.3));
        let resolved = resolver(places, &geocoder)
            .resolve("garage")
            .await
            .expect("resolution should succeed")
            .expect("geocoder should answer");

        assert!(resolved.geocoded);
        assert_eq!(geocoder.queries(), vec!["garage".to_owned()]);
    }

    #[rstest]
    #[tokio::test]
    async fn geocoding_takes_the_first_result(places: NamedPlaces) {
        let geocoder = StubGeocodingApi::with_positions(vec![
            Coordinate::new(40.0, -3.0),
            Coordinate::new(41.0, -4.0),
        ]);
        let resolved = resolver(places, &geocoder)
            .resolve("Madrid")
            .await
            .expect("resolution should succeed");

        assert_eq!(
            resolved,
            Some(ResolvedLocation {
                location: Coordinate::new(40.0, -3.0),
                geocoded: true,
            })
        );
    }

    #[rstest]
    #[tokio::test]
    async fn no_results_means_unresolvable(places: NamedPlaces) {
        let geocoder = StubGeocodingApi::with_positions(Vec::new());
        let resolved = resolver(places, &geocoder)
            .resolve("Atlantis")
            .await
            .expect("resolution should succeed");

        assert_eq!(resolved, None);
    }

    #[rstest]
    #[tokio::test]
    async fn geocoding_failures_are_errors(places: NamedPlaces) {
        let error = ApiError::Server {
            url: "https://api.tomtom.com/search/2/geocode/Madrid.json".to_owned(),
            status: 503,
            message: "unavailable".to_owned(),
        };
        let geocoder = StubGeocodingApi::with_error(error.clone());
        let err = resolver(places, &geocoder)
            .resolve("Madrid")
            .await
            .expect_err("geocoding should fail");

        assert_eq!(err, error);
    }

    #[rstest]
    fn named_places_ignore_case_and_padding() {
        let mut places = NamedPlaces::default();
        places.insert(" Office ", "52.0,4.0");
        assert_eq!(places.find_coordinates("OFFICE"), Some("52.0,4.0".to_owned()));
        assert_eq!(places.remove("office"), Some("52.0,4.0".to_owned()));
        assert!(places.is_empty());
    }
}
