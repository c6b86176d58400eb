//! Route calculation request and response models.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{AvoidType, Coordinate, RouteType, TravelMode};

use super::error::ApiError;

/// A request for a route through an ordered list of coordinates.
///
/// The first coordinate is the origin, the last the destination and anything
/// in between an ordered waypoint. Unset options leave the choice to the
/// service.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CalculateRouteRequest {
    /// Coordinates in travel order.
    pub locations: Vec<Coordinate>,
    /// Maximum number of alternative routes to compute.
    pub max_alternatives: Option<u8>,
    /// Travel mode, when constrained.
    pub travel_mode: Option<TravelMode>,
    /// Route type, when constrained.
    pub route_type: Option<RouteType>,
    /// Road features to avoid.
    pub avoid: Vec<AvoidType>,
}

/// Headline figures for a computed route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSummary {
    /// Route length in metres.
    pub length_in_meters: u64,
    /// Estimated travel time in seconds, including traffic delay.
    pub travel_time_in_seconds: u64,
    /// Delay caused by traffic in seconds.
    #[serde(default)]
    pub traffic_delay_in_seconds: u64,
}

/// A single computed route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    /// Summary figures for the whole route.
    pub summary: RouteSummary,
}

/// The routes returned for a [`CalculateRouteRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CalculateRouteResponse {
    /// Routes ordered by preference; may be empty.
    #[serde(default)]
    pub routes: Vec<Route>,
}

impl CalculateRouteResponse {
    /// Return the preferred route, if any was found.
    #[must_use]
    pub fn first_route(&self) -> Option<&Route> {
        self.routes.first()
    }
}

/// Plan routes through ordered coordinates.
#[async_trait]
pub trait RoutingApi: Send + Sync {
    /// Calculate routes for `request`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] describing why the service could not answer.
    async fn calculate_route(
        &self,
        request: &CalculateRouteRequest,
    ) -> Result<CalculateRouteResponse, ApiError>;
}

impl std::fmt::Debug for dyn RoutingApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("<dyn RoutingApi>")
    }
}
