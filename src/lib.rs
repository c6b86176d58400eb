//! Facade crate for TomTom travel-time sensors.
//!
//! This crate re-exports the core domain types and exposes the TomTom HTTP
//! clients and the JSON entry store behind feature flags.

#![forbid(unsafe_code)]

pub use travel_time_core::{
    ApiError, ApiFactory, AvoidType, CalculateRouteRequest, CalculateRouteResponse, ConfigEntry,
    Coordinate, CoordinateLookup, CoordinatorHandle, CoordinatorState, EntryContext, EntryData,
    GeocodingApi, IntegrationHost, LocationResolver, NamedPlaces, RefreshCoordinator, RouteType,
    RoutingApi, RoutingOptions, SetupError, SetupFlow, TravelMode, TravelResult, TravelTimeSensor,
    UpdateFailed, config_entry_diagnostics,
};

#[cfg(feature = "tomtom")]
pub use travel_time_tomtom::{
    ClientBuildError, TomTomApiFactory, TomTomClient, TomTomClientConfig,
};

#[cfg(feature = "store")]
pub use travel_time_store::{EntryStore, StoreError};
