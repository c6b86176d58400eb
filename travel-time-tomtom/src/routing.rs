//! Calculate Route endpoint.
//!
//! `GET {base}/routing/1/calculateRoute/{lat,lon:lat,lon...}/json`

use async_trait::async_trait;
use travel_time_core::{
    ApiError, CalculateRouteRequest, CalculateRouteResponse, MIN_LOCATIONS, RoutingApi,
};
use url::Url;

use crate::client::TomTomClient;
use crate::models::CalculateRouteBody;

/// Join coordinates into the colon-separated path segment the API expects.
fn locations_segment(request: &CalculateRouteRequest) -> String {
    request
        .locations
        .iter()
        .map(travel_time_core::Coordinate::to_comma_separated)
        .collect::<Vec<_>>()
        .join(":")
}

impl TomTomClient {
    /// Build the request URL for `request`, without the API key.
    pub(crate) fn calculate_route_url(
        &self,
        request: &CalculateRouteRequest,
    ) -> Result<Url, ApiError> {
        let locations = locations_segment(request);
        let mut url = self.endpoint(["routing", "1", "calculateRoute", locations.as_str(), "json"])?;
        if request.locations.len() < MIN_LOCATIONS {
            return Err(ApiError::Client {
                url: url.to_string(),
                status: 400,
                message: format!(
                    "a route needs at least {MIN_LOCATIONS} locations, got {}",
                    request.locations.len()
                ),
            });
        }

        {
            let mut query = url.query_pairs_mut();
            if let Some(max_alternatives) = request.max_alternatives {
                query.append_pair("maxAlternatives", &max_alternatives.to_string());
            }
            if let Some(travel_mode) = request.travel_mode {
                query.append_pair("travelMode", travel_mode.api_value());
            }
            if let Some(route_type) = request.route_type {
                query.append_pair("routeType", route_type.api_value());
            }
            for avoid in &request.avoid {
                query.append_pair("avoid", avoid.api_value());
            }
        }
        if url.query() == Some("") {
            url.set_query(None);
        }
        Ok(url)
    }
}

#[async_trait]
impl RoutingApi for TomTomClient {
    async fn calculate_route(
        &self,
        request: &CalculateRouteRequest,
    ) -> Result<CalculateRouteResponse, ApiError> {
        let url = self.calculate_route_url(request)?;
        log::debug!(
            "Requesting route through {} locations",
            request.locations.len()
        );
        let body: CalculateRouteBody = self.get_json(&url).await?;
        Ok(body.into())
    }
}
