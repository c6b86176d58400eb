//! Latitude/longitude pairs and their `lat,lon` text form.
//!
//! Coordinates travel through the system as plain text in two places: the
//! stored location list and the host's named-place lookup. Both use the same
//! shape, two signed decimals separated by a comma with optional whitespace.
//!
//! # Examples
//! ```
//! use travel_time_core::Coordinate;
//!
//! let coordinate: Coordinate = " 52.1 , -4.25 ".parse()?;
//! assert_eq!(coordinate, Coordinate::new(52.1, -4.25));
//! assert_eq!(coordinate.to_comma_separated(), "52.1,-4.25");
//! # Ok::<(), travel_time_core::CoordinateParseError>(())
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An immutable latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
}

impl Coordinate {
    /// Construct a coordinate from latitude and longitude.
    #[must_use]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Render the coordinate as the `lat,lon` text stored in config entries.
    #[must_use]
    pub fn to_comma_separated(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lon)
    }
}

/// Errors returned when text is not shaped like `lat,lon`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordinateParseError {
    /// The input contained no comma separator.
    #[error("expected `lat,lon` but found no comma in '{input}'")]
    MissingSeparator {
        /// The rejected input.
        input: String,
    },
    /// One side of the comma was not a plain signed decimal.
    #[error("'{component}' is not a decimal number")]
    InvalidNumber {
        /// The offending component, trimmed.
        component: String,
    },
}

impl FromStr for Coordinate {
    type Err = CoordinateParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lon) = s
            .split_once(',')
            .ok_or_else(|| CoordinateParseError::MissingSeparator {
                input: s.to_owned(),
            })?;
        Ok(Self::new(parse_decimal(lat)?, parse_decimal(lon)?))
    }
}

/// Parse an optionally signed decimal with optional fraction digits.
///
/// Exponents, `inf`, `NaN` and bare fractions such as `.5` are rejected even
/// though `f64::from_str` would accept them.
fn parse_decimal(raw: &str) -> Result<f64, CoordinateParseError> {
    let component = raw.trim();
    let invalid = || CoordinateParseError::InvalidNumber {
        component: component.to_owned(),
    };
    let unsigned = component
        .strip_prefix(['-', '+'])
        .unwrap_or(component);
    let (whole, fraction) = match unsigned.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (unsigned, None),
    };
    let all_digits = |part: &str| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit());
    if !all_digits(whole) || fraction.is_some_and(|part| !all_digits(part)) {
        return Err(invalid());
    }
    component.parse().map_err(|_| invalid())
}
