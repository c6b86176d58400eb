//! Read-only sensors mirroring the latest [`TravelResult`].
//!
//! Each entry exposes three sensors, one per field of the result. A sensor
//! holds a `watch::Receiver` on the coordinator's state, so reading it never
//! blocks the refresh task and always sees a complete snapshot.

use std::fmt;

use serde::Serialize;
use tokio::sync::watch;

use crate::{ATTRIBUTION, ConfigEntry, CoordinatorState, DOMAIN, TravelResult};

/// State reported before the first successful refresh.
pub const STATE_UNKNOWN: &str = "unknown";

/// State reported while the latest refresh has failed.
pub const STATE_UNAVAILABLE: &str = "unavailable";

/// The field of [`TravelResult`] a sensor mirrors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorKind {
    /// Travel time in minutes.
    Duration,
    /// Traffic delay in minutes.
    Delay,
    /// Route length in kilometres.
    Distance,
}

/// Static presentation metadata for one sensor kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SensorDescription {
    /// Which result field the sensor mirrors.
    pub kind: SensorKind,
    /// Key appended to the entry id to form the unique id.
    pub key: &'static str,
    /// Unit of measurement.
    pub unit: &'static str,
    /// Icon identifier.
    pub icon: &'static str,
    /// Device class, when one applies.
    pub device_class: Option<&'static str>,
    /// State class used for long-term statistics.
    pub state_class: &'static str,
}

/// Descriptions for the three sensors created per entry.
pub const SENSOR_DESCRIPTIONS: [SensorDescription; 3] = [
    SensorDescription {
        kind: SensorKind::Duration,
        key: "duration",
        unit: "min",
        icon: "mdi:car-clock",
        device_class: None,
        state_class: "measurement",
    },
    SensorDescription {
        kind: SensorKind::Delay,
        key: "delay",
        unit: "min",
        icon: "mdi:car-multiple",
        device_class: None,
        state_class: "measurement",
    },
    SensorDescription {
        kind: SensorKind::Distance,
        key: "distance",
        unit: "km",
        icon: "mdi:map-marker-distance",
        device_class: Some("distance"),
        state_class: "measurement",
    },
];

/// A sensor reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SensorValue {
    /// Whole minutes.
    Minutes(u64),
    /// Kilometres.
    Kilometres(f64),
}

impl fmt::Display for SensorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Minutes(minutes) => write!(f, "{minutes}"),
            Self::Kilometres(kilometres) => write!(f, "{kilometres}"),
        }
    }
}

impl SensorKind {
    /// Extract this kind's field from `result`.
    #[must_use]
    pub const fn value_of(self, result: &TravelResult) -> SensorValue {
        match self {
            Self::Duration => SensorValue::Minutes(result.duration),
            Self::Delay => SensorValue::Minutes(result.delay),
            Self::Distance => SensorValue::Kilometres(result.distance),
        }
    }
}

/// Device grouping the sensors of one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    /// `(domain, entry_id)` identifier pair.
    pub identifiers: (String, String),
    /// Device name; the entry title.
    pub name: String,
    /// Manufacturer shown in the device registry.
    pub manufacturer: &'static str,
    /// Link to the service's account page.
    pub configuration_url: &'static str,
    /// Devices represent a remote service rather than hardware.
    pub entry_type: &'static str,
}

impl DeviceInfo {
    /// Build the device for `entry`.
    #[must_use]
    pub fn for_entry(entry: &ConfigEntry) -> Self {
        Self {
            identifiers: (DOMAIN.to_owned(), entry.entry_id.clone()),
            name: entry.title.clone(),
            manufacturer: "TomTom",
            configuration_url: "https://developer.tomtom.com/user/login",
            entry_type: "service",
        }
    }
}

/// One published value of an entry.
#[derive(Debug, Clone)]
pub struct TravelTimeSensor {
    description: SensorDescription,
    unique_id: String,
    device: DeviceInfo,
    state: watch::Receiver<CoordinatorState>,
}

impl TravelTimeSensor {
    /// Create a sensor for `description` reading from `state`.
    #[must_use]
    pub fn new(
        entry: &ConfigEntry,
        description: SensorDescription,
        state: watch::Receiver<CoordinatorState>,
    ) -> Self {
        Self {
            unique_id: format!("{}_{}", entry.entry_id, description.key),
            device: DeviceInfo::for_entry(entry),
            description,
            state,
        }
    }

    /// Stable identifier, `<entry_id>_<key>`.
    #[must_use]
    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    /// Presentation metadata.
    #[must_use]
    pub const fn description(&self) -> &SensorDescription {
        &self.description
    }

    /// Device the sensor belongs to.
    #[must_use]
    pub const fn device(&self) -> &DeviceInfo {
        &self.device
    }

    /// Attribution text for the data source.
    #[must_use]
    pub const fn attribution(&self) -> &'static str {
        ATTRIBUTION
    }

    /// Current value, or `None` before the first successful refresh.
    #[must_use]
    pub fn native_value(&self) -> Option<SensorValue> {
        self.state
            .borrow()
            .data
            .as_ref()
            .map(|result| self.description.kind.value_of(result))
    }

    /// Whether the latest refresh succeeded.
    #[must_use]
    pub fn available(&self) -> bool {
        self.state.borrow().last_update_success
    }

    /// Render the state as text.
    ///
    /// [`STATE_UNKNOWN`] until a result has been published, then
    /// [`STATE_UNAVAILABLE`] while the latest refresh has failed.
    #[must_use]
    pub fn state(&self) -> String {
        match self.native_value() {
            None => STATE_UNKNOWN.to_owned(),
            Some(_) if !self.available() => STATE_UNAVAILABLE.to_owned(),
            Some(value) => value.to_string(),
        }
    }

    /// Wait until the coordinator publishes a new snapshot.
    ///
    /// Returns `false` once the coordinator has gone away.
    pub async fn changed(&mut self) -> bool {
        self.state.changed().await.is_ok()
    }
}

/// Create the three sensors for `entry`.
#[must_use]
pub fn sensors_for_entry(
    entry: &ConfigEntry,
    state: &watch::Receiver<CoordinatorState>,
) -> Vec<TravelTimeSensor> {
    SENSOR_DESCRIPTIONS
        .into_iter()
        .map(|description| TravelTimeSensor::new(entry, description, state.clone()))
        .collect()
}
