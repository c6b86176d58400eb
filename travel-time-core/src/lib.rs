//! Core domain for TomTom travel-time sensors.
//!
//! An entry names at least two locations. A [`RefreshCoordinator`] resolves
//! them to coordinates with a [`LocationResolver`], asks a [`RoutingApi`] for
//! one route through them and publishes the [`TravelResult`] to three
//! [`TravelTimeSensor`]s. [`SetupFlow`] validates user input before an entry
//! is stored and [`IntegrationHost`] owns the loaded entries.
//!
//! The service clients are traits; HTTP implementations live in the
//! `travel-time-tomtom` crate and deterministic doubles in [`test_support`].

mod api;
mod coordinate;
mod coordinator;
mod diagnostics;
mod entry;
mod host;
mod options;
mod resolver;
mod sensor;
mod setup;
mod travel;

#[doc(hidden)]
pub mod test_support;

pub use api::{
    ApiError, CalculateRouteRequest, CalculateRouteResponse, GeocodeResponse, GeocodeResult,
    GeocodingApi, Route, RouteSummary, RoutingApi,
};
pub use coordinate::{Coordinate, CoordinateParseError};
pub use coordinator::{
    CoordinatorHandle, CoordinatorState, DEFAULT_SCAN_INTERVAL, RefreshCoordinator, UpdateFailed,
};
pub use diagnostics::{REDACTED, TO_REDACT, config_entry_diagnostics, redact};
pub use entry::{ATTRIBUTION, ConfigEntry, DEFAULT_NAME, DOMAIN, EntryData};
pub use host::{ApiFactory, EntryContext, HostError, IntegrationHost};
pub use options::{AvoidType, RouteType, RoutingOptions, TravelMode};
pub use resolver::{CoordinateLookup, LocationResolver, NamedPlaces, ResolvedLocation};
pub use sensor::{
    DeviceInfo, SENSOR_DESCRIPTIONS, STATE_UNAVAILABLE, STATE_UNKNOWN, SensorDescription,
    SensorKind, SensorValue, TravelTimeSensor, sensors_for_entry,
};
pub use setup::{MIN_LOCATIONS, SetupError, SetupFlow};
pub use travel::TravelResult;
