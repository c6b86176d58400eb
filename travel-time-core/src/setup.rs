//! Validation for new and reconfigured entries.
//!
//! The flow checks the location count, resolves every location, rewrites
//! geocoded inputs to literal coordinates and finally plans one trial route.
//! Failures surface as [`SetupError`], whose [`SetupError::error_key`] is the
//! code shown to the user.

use std::collections::BTreeMap;
use std::sync::Arc;

use thiserror::Error;

use crate::{
    ApiError, CalculateRouteRequest, ConfigEntry, Coordinate, EntryData, LocationResolver,
    RoutingApi,
};

/// Smallest number of locations a route can be planned through.
pub const MIN_LOCATIONS: usize = 2;

/// Reasons the setup flow rejects user input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    /// Fewer than [`MIN_LOCATIONS`] locations were supplied.
    #[error("at least {MIN_LOCATIONS} locations are required")]
    AtLeastTwoLocations,
    /// The location at 1-based position `num` could not be resolved.
    #[error("cannot determine location {num}")]
    CannotDetermineLocation {
        /// 1-based position of the failing location.
        num: usize,
    },
    /// The trial route request returned no routes.
    #[error("no route could be planned between the locations")]
    CannotPlanRoute,
    /// The service rejected a request.
    #[error("the service rejected the request: {0}")]
    Client(#[source] ApiError),
    /// A request timed out.
    #[error("timed out contacting the service: {0}")]
    Timeout(#[source] ApiError),
    /// The service failed.
    #[error("the service failed: {0}")]
    Server(#[source] ApiError),
    /// The service could not be reached.
    #[error("cannot connect to the service: {0}")]
    CannotConnect(#[source] ApiError),
    /// A failure outside the documented taxonomy; aborts the flow.
    #[error("unexpected failure during setup: {0}")]
    Unexpected(#[source] ApiError),
}

impl SetupError {
    /// Return the user-facing error code, or `None` for unexpected failures.
    #[must_use]
    pub const fn error_key(&self) -> Option<&'static str> {
        match self {
            Self::AtLeastTwoLocations => Some("at_least_two_locations"),
            Self::CannotDetermineLocation { .. } => Some("cannot_determine_locations"),
            Self::CannotPlanRoute => Some("cannot_plan_route"),
            Self::Client(_) => Some("client_error"),
            Self::Timeout(_) => Some("timeout_connect"),
            Self::Server(_) => Some("server_error"),
            Self::CannotConnect(_) => Some("cannot_connect"),
            Self::Unexpected(_) => None,
        }
    }

    /// Return the placeholders substituted into the error description.
    #[must_use]
    pub fn placeholders(&self) -> BTreeMap<&'static str, String> {
        match self {
            Self::CannotDetermineLocation { num } => BTreeMap::from([("num", num.to_string())]),
            _ => BTreeMap::new(),
        }
    }
}

impl From<ApiError> for SetupError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::Client { .. } => Self::Client(error),
            ApiError::Timeout { .. } => Self::Timeout(error),
            ApiError::Server { .. } => Self::Server(error),
            ApiError::Connection { .. } => Self::CannotConnect(error),
            ApiError::Decode { .. } | ApiError::Other { .. } => Self::Unexpected(error),
        }
    }
}

/// Validates entry data against the live services.
#[derive(Debug, Clone)]
pub struct SetupFlow {
    resolver: LocationResolver,
    routing: Arc<dyn RoutingApi>,
}

impl SetupFlow {
    /// Create a flow using `resolver` for locations and `routing` for the
    /// trial route.
    #[must_use]
    pub fn new(resolver: LocationResolver, routing: Arc<dyn RoutingApi>) -> Self {
        Self { resolver, routing }
    }

    /// Validate `data`, returning it with geocoded locations rewritten to
    /// literal `lat,lon` text.
    ///
    /// # Errors
    ///
    /// Returns a [`SetupError`] naming the first check that failed.
    pub async fn validate(&self, mut data: EntryData) -> Result<EntryData, SetupError> {
        if data.locations.len() < MIN_LOCATIONS {
            return Err(SetupError::AtLeastTwoLocations);
        }

        let mut coordinates = Vec::with_capacity(data.locations.len());
        for (index, input) in data.locations.iter_mut().enumerate() {
            let resolved = self
                .resolver
                .resolve(input)
                .await?
                .ok_or(SetupError::CannotDetermineLocation { num: index + 1 })?;
            if resolved.geocoded {
                *input = resolved.location.to_comma_separated();
            }
            coordinates.push(resolved.location);
        }

        if !self.is_valid_route(coordinates).await? {
            log::error!("No routes found between the configured locations");
            return Err(SetupError::CannotPlanRoute);
        }
        Ok(data)
    }

    /// Validate `data` and wrap it in a new entry with default options.
    ///
    /// # Errors
    ///
    /// Returns a [`SetupError`] when validation fails.
    pub async fn create_entry(
        &self,
        entry_id: impl Into<String>,
        data: EntryData,
    ) -> Result<ConfigEntry, SetupError> {
        let validated = self.validate(data).await?;
        Ok(ConfigEntry::new(entry_id, validated))
    }

    /// Validate `data` and return `entry` with its data replaced.
    ///
    /// The entry keeps its identifier and options, so reloading it updates
    /// the existing entry rather than adding another. The title follows the
    /// new name.
    ///
    /// # Errors
    ///
    /// Returns a [`SetupError`] when validation fails.
    pub async fn reconfigure(
        &self,
        entry: &ConfigEntry,
        data: EntryData,
    ) -> Result<ConfigEntry, SetupError> {
        let validated = self.validate(data).await?;
        Ok(ConfigEntry {
            title: validated.name.clone(),
            data: validated,
            ..entry.clone()
        })
    }

    /// Plan a trial route with no travel options.
    async fn is_valid_route(&self, locations: Vec<Coordinate>) -> Result<bool, ApiError> {
        let request = CalculateRouteRequest {
            locations,
            ..CalculateRouteRequest::default()
        };
        let response = self.routing.calculate_route(&request).await?;
        Ok(response.first_route().is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{StubGeocodingApi, StubRoutingApi, sample_summary};
    use crate::{NamedPlaces, RoutingOptions};
    use rstest::rstest;

    fn flow(geocoder: StubGeocodingApi, routing: &StubRoutingApi) -> SetupFlow {
        let places = NamedPlaces::from_iter([("zone.home", "51.2,5.3")]);
        SetupFlow::new(
            LocationResolver::new(Arc::new(places), Arc::new(geocoder)),
            Arc::new(routing.clone()),
        )
    }

    fn data(locations: &[&str]) -> EntryData {
        EntryData::new(
            "secret",
            locations.iter().map(|location| (*location).to_owned()).collect(),
        )
    }

    #[rstest]
    #[case(&[])]
    #[case(&["52.1,4.2"])]
    #[tokio::test]
    async fn fewer_than_two_locations_are_rejected(#[case] locations: &[&str]) {
        let routing = StubRoutingApi::with_summary(sample_summary());
        let err = flow(StubGeocodingApi::default(), &routing)
            .validate(data(locations))
            .await
            .expect_err("too few locations");

        assert_eq!(err, SetupError::AtLeastTwoLocations);
        assert_eq!(err.error_key(), Some("at_least_two_locations"));
        assert!(routing.requests().is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn unresolvable_location_reports_its_position() {
        let routing = StubRoutingApi::with_summary(sample_summary());
        let err = flow(StubGeocodingApi::default(), &routing)
            .validate(data(&["52.1,4.2", "zone.home", "Atlantis"]))
            .await
            .expect_err("third location is unknown");

        assert_eq!(err, SetupError::CannotDetermineLocation { num: 3 });
        assert_eq!(err.error_key(), Some("cannot_determine_locations"));
        assert_eq!(err.placeholders().get("num").map(String::as_str), Some("3"));
    }

    #[rstest]
    #[tokio::test]
    async fn geocoded_locations_are_rewritten_as_coordinates() {
        let routing = StubRoutingApi::with_summary(sample_summary());
        let geocoder = StubGeocodingApi::default().with_match("Madrid", Coordinate::new(40.0, -3.0));
        let validated = flow(geocoder, &routing)
            .validate(data(&["zone.home", "Madrid"]))
            .await
            .expect("validation should succeed");

        assert_eq!(validated.locations, vec!["zone.home", "40,-3"]);
    }

    #[rstest]
    #[tokio::test]
    async fn trial_route_carries_no_options() {
        let routing = StubRoutingApi::with_summary(sample_summary());
        flow(StubGeocodingApi::default(), &routing)
            .validate(data(&["52.1,4.2", "51.2,5.3"]))
            .await
            .expect("validation should succeed");

        let requests = routing.requests();
        assert_eq!(requests.len(), 1);
        let request = requests.first().expect("one request");
        assert_eq!(
            request.locations,
            vec![Coordinate::new(52.1, 4.2), Coordinate::new(51.2, 5.3)]
        );
        assert_eq!(request.max_alternatives, None);
        assert_eq!(request.travel_mode, None);
        assert_eq!(request.route_type, None);
        assert!(request.avoid.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn zero_routes_cannot_be_planned() {
        let routing = StubRoutingApi::without_routes();
        let err = flow(StubGeocodingApi::default(), &routing)
            .validate(data(&["52.1,4.2", "51.2,5.3"]))
            .await
            .expect_err("no routes");

        assert_eq!(err.error_key(), Some("cannot_plan_route"));
    }

    #[rstest]
    #[case(ApiError::Client { url: "u".to_owned(), status: 403, message: "forbidden".to_owned() }, Some("client_error"))]
    #[case(ApiError::Timeout { url: "u".to_owned(), timeout_secs: 30 }, Some("timeout_connect"))]
    #[case(ApiError::Server { url: "u".to_owned(), status: 502, message: "bad gateway".to_owned() }, Some("server_error"))]
    #[case(ApiError::Connection { url: "u".to_owned(), message: "refused".to_owned() }, Some("cannot_connect"))]
    #[case(ApiError::Decode { message: "truncated".to_owned() }, None)]
    #[tokio::test]
    async fn api_errors_map_to_error_codes(
        #[case] error: ApiError,
        #[case] expected: Option<&'static str>,
    ) {
        let routing = StubRoutingApi::with_error(error);
        let err = flow(StubGeocodingApi::default(), &routing)
            .validate(data(&["52.1,4.2", "51.2,5.3"]))
            .await
            .expect_err("routing fails");

        assert_eq!(err.error_key(), expected);
    }

    #[rstest]
    #[tokio::test]
    async fn geocoding_errors_use_the_same_codes() {
        let routing = StubRoutingApi::with_summary(sample_summary());
        let geocoder = StubGeocodingApi::with_error(ApiError::Connection {
            url: "u".to_owned(),
            message: "refused".to_owned(),
        });
        let err = flow(geocoder, &routing)
            .validate(data(&["Madrid", "51.2,5.3"]))
            .await
            .expect_err("geocoding fails");

        assert_eq!(err.error_key(), Some("cannot_connect"));
    }

    #[rstest]
    #[tokio::test]
    async fn reconfigure_keeps_identity_and_options() {
        let routing = StubRoutingApi::with_summary(sample_summary());
        let setup = flow(StubGeocodingApi::default(), &routing);
        let mut entry = setup
            .create_entry("entry-1", data(&["52.1,4.2", "51.2,5.3"]).with_name("Commute"))
            .await
            .expect("entry should be created");
        entry.options = RoutingOptions {
            vehicle_type: crate::TravelMode::Bicycle,
            ..RoutingOptions::default()
        };

        let updated = setup
            .reconfigure(
                &entry,
                data(&["51.2,5.3", "zone.home", "52.1,4.2"]).with_name("Commute"),
            )
            .await
            .expect("reconfigure should succeed");

        assert_eq!(updated.entry_id, "entry-1");
        assert_eq!(updated.title, "Commute");
        assert_eq!(updated.options, entry.options);
        assert_eq!(updated.data.locations.len(), 3);
    }

    #[rstest]
    #[tokio::test]
    async fn reconfigure_renames_the_entry_and_its_device() {
        let routing = StubRoutingApi::with_summary(sample_summary());
        let setup = flow(StubGeocodingApi::default(), &routing);
        let entry = setup
            .create_entry("entry-1", data(&["52.1,4.2", "51.2,5.3"]).with_name("Old"))
            .await
            .expect("entry should be created");

        let updated = setup
            .reconfigure(&entry, data(&["52.1,4.2", "51.2,5.3"]).with_name("New"))
            .await
            .expect("reconfigure should succeed");

        assert_eq!(updated.entry_id, "entry-1");
        assert_eq!(updated.data.name, "New");
        assert_eq!(updated.title, "New");
        assert_eq!(crate::DeviceInfo::for_entry(&updated).name, "New");
    }
}
