//! TomTom HTTP clients for the travel-time integration.
//!
//! [`TomTomClient`] implements the core crate's `RoutingApi` and
//! `GeocodingApi` traits against the TomTom Routing and Search APIs.
//! [`TomTomApiFactory`] hands out clients sharing one connection pool, one
//! per API key.

mod client;
mod geocoding;
pub mod models;
mod routing;

pub use client::{
    ClientBuildError, DEFAULT_BASE_URL, DEFAULT_USER_AGENT, TomTomApiFactory, TomTomClient,
    TomTomClientConfig,
};
