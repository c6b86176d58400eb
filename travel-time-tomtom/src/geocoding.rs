//! Geocode endpoint.
//!
//! `GET {base}/search/2/geocode/{query}.json`

use async_trait::async_trait;
use travel_time_core::{ApiError, GeocodeResponse, GeocodingApi};
use url::Url;

use crate::client::TomTomClient;
use crate::models::GeocodeBody;

impl TomTomClient {
    /// Build the geocode URL for `query`, without the API key.
    pub(crate) fn geocode_url(&self, query: &str) -> Result<Url, ApiError> {
        let segment = format!("{query}.json");
        self.endpoint(["search", "2", "geocode", segment.as_str()])
    }
}

#[async_trait]
impl GeocodingApi for TomTomClient {
    async fn geocode(&self, query: &str) -> Result<GeocodeResponse, ApiError> {
        let url = self.geocode_url(query)?;
        log::debug!("Geocoding '{query}'");
        let body: GeocodeBody = self.get_json(&url).await?;
        Ok(body.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Madrid", "https://api.tomtom.com/search/2/geocode/Madrid.json")]
    #[case(
        "10 Downing St, London",
        "https://api.tomtom.com/search/2/geocode/10%20Downing%20St,%20London.json"
    )]
    #[case("a/b#c", "https://api.tomtom.com/search/2/geocode/a%2Fb%23c.json")]
    fn geocode_url_encodes_the_query(#[case] query: &str, #[case] expected: &str) {
        let client = TomTomClient::new("secret").expect("client should build");
        let url = client.geocode_url(query).expect("url");
        assert_eq!(url.as_str(), expected);
    }
}
