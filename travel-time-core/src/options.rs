//! Routing options chosen by the user for an entry.
//!
//! Each selector is a closed enum whose stored token is the lowercase
//! `snake_case` name. Parsing is case-insensitive so tokens written by older
//! tooling (`CAR`, `Fastest`) still load.
//!
//! # Examples
//! ```
//! use travel_time_core::{AvoidType, RouteType, RoutingOptions, TravelMode};
//!
//! let options = RoutingOptions::default();
//! assert_eq!(options.vehicle_type, TravelMode::Car);
//! assert_eq!(options.route_type, RouteType::Fastest);
//! assert!(options.avoid_type.is_empty());
//! assert_eq!(AvoidType::TollRoads.api_value(), "tollRoads");
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Vehicle or travel mode used to plan a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TravelMode {
    /// Private car.
    #[default]
    Car,
    /// Goods vehicle.
    Truck,
    /// Taxi, allowed in taxi lanes.
    Taxi,
    /// Bus, allowed in bus lanes.
    Bus,
    /// Van.
    Van,
    /// Motorcycle.
    Motorcycle,
    /// Bicycle.
    Bicycle,
    /// Walking.
    Pedestrian,
}

impl TravelMode {
    /// Every travel mode, in the order offered to users.
    pub const ALL: [Self; 8] = [
        Self::Car,
        Self::Truck,
        Self::Taxi,
        Self::Bus,
        Self::Van,
        Self::Motorcycle,
        Self::Bicycle,
        Self::Pedestrian,
    ];

    /// Return the stored token.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Car => "car",
            Self::Truck => "truck",
            Self::Taxi => "taxi",
            Self::Bus => "bus",
            Self::Van => "van",
            Self::Motorcycle => "motorcycle",
            Self::Bicycle => "bicycle",
            Self::Pedestrian => "pedestrian",
        }
    }

    /// Return the value sent as the `travelMode` query parameter.
    #[must_use]
    pub const fn api_value(&self) -> &'static str {
        self.as_str()
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TravelMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s.to_lowercase())
            .ok_or_else(|| format!("unknown travel mode '{s}'"))
    }
}

/// Optimisation goal for the planned route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RouteType {
    /// Minimise travel time.
    #[default]
    Fastest,
    /// Minimise distance.
    Shortest,
    /// Balance time and distance.
    Short,
    /// Minimise fuel use.
    Eco,
    /// Prefer winding, hilly roads.
    Thrilling,
}

impl RouteType {
    /// Every route type, in the order offered to users.
    pub const ALL: [Self; 5] = [
        Self::Fastest,
        Self::Shortest,
        Self::Short,
        Self::Eco,
        Self::Thrilling,
    ];

    /// Return the stored token.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Fastest => "fastest",
            Self::Shortest => "shortest",
            Self::Short => "short",
            Self::Eco => "eco",
            Self::Thrilling => "thrilling",
        }
    }

    /// Return the value sent as the `routeType` query parameter.
    #[must_use]
    pub const fn api_value(&self) -> &'static str {
        self.as_str()
    }
}

impl fmt::Display for RouteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RouteType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|route| route.as_str() == s.to_lowercase())
            .ok_or_else(|| format!("unknown route type '{s}'"))
    }
}

/// Road features the route should avoid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AvoidType {
    /// Toll roads.
    TollRoads,
    /// Motorways.
    Motorways,
    /// Ferries.
    Ferries,
    /// Unpaved roads.
    UnpavedRoads,
    /// Carpool lanes.
    Carpools,
    /// Road segments already used earlier in the route.
    AlreadyUsedRoads,
    /// Border crossings.
    BorderCrossings,
    /// Tunnels.
    Tunnels,
    /// Car trains.
    CarTrains,
    /// Low emission zones.
    LowEmissionZones,
}

impl AvoidType {
    /// Every avoidance flag, in the order offered to users.
    pub const ALL: [Self; 10] = [
        Self::TollRoads,
        Self::Motorways,
        Self::Ferries,
        Self::UnpavedRoads,
        Self::Carpools,
        Self::AlreadyUsedRoads,
        Self::BorderCrossings,
        Self::Tunnels,
        Self::CarTrains,
        Self::LowEmissionZones,
    ];

    /// Return the stored token.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::TollRoads => "toll_roads",
            Self::Motorways => "motorways",
            Self::Ferries => "ferries",
            Self::UnpavedRoads => "unpaved_roads",
            Self::Carpools => "carpools",
            Self::AlreadyUsedRoads => "already_used_roads",
            Self::BorderCrossings => "border_crossings",
            Self::Tunnels => "tunnels",
            Self::CarTrains => "car_trains",
            Self::LowEmissionZones => "low_emission_zones",
        }
    }

    /// Return the value sent as an `avoid` query parameter.
    #[must_use]
    pub const fn api_value(&self) -> &'static str {
        match self {
            Self::TollRoads => "tollRoads",
            Self::Motorways => "motorways",
            Self::Ferries => "ferries",
            Self::UnpavedRoads => "unpavedRoads",
            Self::Carpools => "carpools",
            Self::AlreadyUsedRoads => "alreadyUsedRoads",
            Self::BorderCrossings => "borderCrossings",
            Self::Tunnels => "tunnels",
            Self::CarTrains => "carTrains",
            Self::LowEmissionZones => "lowEmissionZones",
        }
    }
}

impl fmt::Display for AvoidType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AvoidType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|avoid| avoid.as_str() == s.to_lowercase())
            .ok_or_else(|| format!("unknown avoid type '{s}'"))
    }
}

macro_rules! string_conversions {
    ($($ty:ty),+) => {
        $(
            impl TryFrom<String> for $ty {
                type Error = String;

                fn try_from(value: String) -> Result<Self, Self::Error> {
                    value.parse()
                }
            }

            impl From<$ty> for String {
                fn from(value: $ty) -> Self {
                    value.as_str().to_owned()
                }
            }
        )+
    };
}

string_conversions!(TravelMode, RouteType, AvoidType);

/// The user-editable routing options stored alongside a config entry.
///
/// Missing fields deserialise to their defaults so entries created before
/// any option was set still load.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingOptions {
    /// Travel mode; defaults to [`TravelMode::Car`].
    pub vehicle_type: TravelMode,
    /// Route type; defaults to [`RouteType::Fastest`].
    pub route_type: RouteType,
    /// Road features to avoid; defaults to none.
    pub avoid_type: Vec<AvoidType>,
}

impl RoutingOptions {
    /// Return the avoidance flags with duplicates removed, preserving order.
    #[must_use]
    pub fn distinct_avoid_types(&self) -> Vec<AvoidType> {
        let mut seen = Vec::with_capacity(self.avoid_type.len());
        for avoid in &self.avoid_type {
            if !seen.contains(avoid) {
                seen.push(*avoid);
            }
        }
        seen
    }
}
