//! The figures published after each successful refresh.

use serde::{Deserialize, Serialize};

use crate::RouteSummary;

const SECONDS_PER_MINUTE: u64 = 60;
const METRES_PER_KILOMETRE: f64 = 1000.0;

/// Duration, delay and distance of the planned route.
///
/// # Examples
/// ```
/// use travel_time_core::{RouteSummary, TravelResult};
///
/// let summary = RouteSummary {
///     length_in_meters: 1146,
///     travel_time_in_seconds: 360,
///     traffic_delay_in_seconds: 95,
/// };
/// let result = TravelResult::from_summary(&summary);
/// assert_eq!(result.duration, 6);
/// assert_eq!(result.delay, 2);
/// assert_eq!(result.distance, 1.146);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TravelResult {
    /// Travel time in whole minutes, rounded up.
    pub duration: u64,
    /// Traffic delay in whole minutes, rounded up.
    pub delay: u64,
    /// Route length in kilometres.
    pub distance: f64,
}

impl TravelResult {
    /// Derive the published figures from a route summary.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "kilometres are a fractional unit"
    )]
    #[expect(
        clippy::cast_precision_loss,
        reason = "route lengths stay far below 2^52 metres"
    )]
    pub fn from_summary(summary: &RouteSummary) -> Self {
        Self {
            duration: summary.travel_time_in_seconds.div_ceil(SECONDS_PER_MINUTE),
            delay: summary.traffic_delay_in_seconds.div_ceil(SECONDS_PER_MINUTE),
            distance: summary.length_in_meters as f64 / METRES_PER_KILOMETRE,
        }
    }
}
