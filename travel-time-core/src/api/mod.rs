//! Traits and models for the remote routing and geocoding services.
//!
//! The coordinator and setup flow only see these traits; the HTTP adapters
//! live in a separate crate and test doubles in [`crate::test_support`].

mod error;
mod geocoding;
mod routing;

pub use error::ApiError;
pub use geocoding::{GeocodeResponse, GeocodeResult, GeocodingApi};
pub use routing::{
    CalculateRouteRequest, CalculateRouteResponse, Route, RouteSummary, RoutingApi,
};
