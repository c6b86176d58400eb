//! Free-text geocoding models.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Coordinate;

use super::error::ApiError;

/// One candidate match for a geocoding query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResult {
    /// Position of the match.
    pub position: Coordinate,
}

/// Candidates returned for a geocoding query, best match first.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GeocodeResponse {
    /// Matches; empty when nothing was found.
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
}

/// Turn free-text place names into coordinates.
#[async_trait]
pub trait GeocodingApi: Send + Sync {
    /// Geocode `query`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] describing why the service could not answer.
    async fn geocode(&self, query: &str) -> Result<GeocodeResponse, ApiError>;
}

impl std::fmt::Debug for dyn GeocodingApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("<dyn GeocodingApi>")
    }
}
