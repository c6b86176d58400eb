//! TomTom response bodies.
//!
//! Only the fields the integration reads are modelled; everything else in
//! the payloads is ignored.
//!
//! See: <https://developer.tomtom.com/routing-api/documentation/routing/calculate-route>
//! and <https://developer.tomtom.com/search-api/documentation/geocoding-service/geocode>

use serde::Deserialize;
use travel_time_core::{
    CalculateRouteResponse, Coordinate, GeocodeResponse, GeocodeResult, Route, RouteSummary,
};

/// Calculate Route response.
#[derive(Debug, Deserialize)]
pub struct CalculateRouteBody {
    /// Routes, preferred first. Absent when nothing was found.
    #[serde(default)]
    pub routes: Vec<RouteBody>,
}

/// One route of a [`CalculateRouteBody`].
#[derive(Debug, Deserialize)]
pub struct RouteBody {
    /// Whole-route summary.
    pub summary: SummaryBody,
}

/// Summary figures of a [`RouteBody`].
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryBody {
    /// Length in metres.
    pub length_in_meters: u64,
    /// Travel time in seconds including traffic delay.
    pub travel_time_in_seconds: u64,
    /// Traffic delay in seconds; omitted when traffic was not considered.
    #[serde(default)]
    pub traffic_delay_in_seconds: u64,
}

impl From<CalculateRouteBody> for CalculateRouteResponse {
    fn from(body: CalculateRouteBody) -> Self {
        Self {
            routes: body
                .routes
                .into_iter()
                .map(|route| Route {
                    summary: RouteSummary {
                        length_in_meters: route.summary.length_in_meters,
                        travel_time_in_seconds: route.summary.travel_time_in_seconds,
                        traffic_delay_in_seconds: route.summary.traffic_delay_in_seconds,
                    },
                })
                .collect(),
        }
    }
}

/// Geocode response.
#[derive(Debug, Deserialize)]
pub struct GeocodeBody {
    /// Matches, best first.
    #[serde(default)]
    pub results: Vec<GeocodeResultBody>,
}

/// One match of a [`GeocodeBody`].
#[derive(Debug, Deserialize)]
pub struct GeocodeResultBody {
    /// Position of the match.
    pub position: LatLonBody,
}

/// A `{"lat": .., "lon": ..}` object.
#[derive(Debug, Deserialize)]
pub struct LatLonBody {
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lon: f64,
}

impl From<GeocodeBody> for GeocodeResponse {
    fn from(body: GeocodeBody) -> Self {
        Self {
            results: body
                .results
                .into_iter()
                .map(|result| GeocodeResult {
                    position: Coordinate::new(result.position.lat, result.position.lon),
                })
                .collect(),
        }
    }
}

/// Error payloads; routing and search report failures differently.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    /// Routing API error object.
    pub error: Option<ErrorDescription>,
    /// Search API error text.
    pub error_text: Option<String>,
}

/// Routing API `error` object.
#[derive(Debug, Deserialize)]
pub struct ErrorDescription {
    /// Human-readable description.
    pub description: String,
}

impl ErrorBody {
    /// Extract the most specific message available.
    #[must_use]
    pub fn into_message(self) -> Option<String> {
        self.error
            .map(|error| error.description)
            .or(self.error_text)
    }
}
