//! Shared HTTP plumbing for the TomTom endpoints.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use travel_time_core::{ApiError, ApiFactory, GeocodingApi, RoutingApi};
use url::Url;

use crate::models::ErrorBody;

/// Default base URL of the TomTom APIs.
pub const DEFAULT_BASE_URL: &str = "https://api.tomtom.com";

/// Default user agent for TomTom requests.
pub const DEFAULT_USER_AGENT: &str = "tomtom-travel-time/0.1";

/// Seconds to wait for a connection and response before giving up.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Error type for [`TomTomClient`] construction failures.
#[derive(Debug, Error)]
pub enum ClientBuildError {
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// The configured base URL is not a valid absolute URL.
    #[error("invalid base URL '{base_url}': {source}")]
    BaseUrl {
        /// The rejected URL.
        base_url: String,
        /// Parser error.
        #[source]
        source: url::ParseError,
    },
}

/// Connection settings shared by every [`TomTomClient`] a factory builds.
///
/// The defaults target the public TomTom host. The API key is not part of
/// the settings; each entry supplies its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TomTomClientConfig {
    /// Host serving the Routing and Search APIs, optionally with a path
    /// prefix when reached through a proxy.
    pub base_url: String,
    /// Limit on connecting and on the whole request.
    pub timeout: Duration,
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
}

impl Default for TomTomClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl TomTomClientConfig {
    /// Send requests to `base_url` instead of [`DEFAULT_BASE_URL`].
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Abandon requests that take longer than `timeout`.
    ///
    /// Timeouts surface as [`ApiError::Timeout`], which setup reports as
    /// `timeout_connect`.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Replace [`DEFAULT_USER_AGENT`].
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    fn build_http_client(&self) -> Result<Client, ClientBuildError> {
        Client::builder()
            .user_agent(&self.user_agent)
            .connect_timeout(self.timeout)
            .timeout(self.timeout)
            .build()
            .map_err(ClientBuildError::HttpClient)
    }

    fn parse_base_url(&self) -> Result<Url, ClientBuildError> {
        Url::parse(&self.base_url).map_err(|source| ClientBuildError::BaseUrl {
            base_url: self.base_url.clone(),
            source,
        })
    }
}

/// Authenticated client for the TomTom Routing and Search APIs.
///
/// The client implements both [`RoutingApi`] and [`GeocodingApi`]. The API
/// key is appended to each request URL and never appears in returned errors.
#[derive(Clone)]
pub struct TomTomClient {
    http: Client,
    base_url: Url,
    timeout: Duration,
    api_key: String,
}

impl std::fmt::Debug for TomTomClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TomTomClient")
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .field("api_key", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl TomTomClient {
    /// Create a client for the public TomTom endpoints.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ClientBuildError> {
        Self::with_config(&TomTomClientConfig::default(), api_key)
    }

    /// Create a client with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build or the base URL is
    /// invalid.
    pub fn with_config(
        config: &TomTomClientConfig,
        api_key: impl Into<String>,
    ) -> Result<Self, ClientBuildError> {
        Ok(Self {
            http: config.build_http_client()?,
            base_url: config.parse_base_url()?,
            timeout: config.timeout,
            api_key: api_key.into(),
        })
    }

    /// Build an endpoint URL from `segments` below the base URL.
    ///
    /// Each segment is percent-encoded, so free text may contain `/` or `?`.
    pub(crate) fn endpoint<'a>(
        &self,
        segments: impl IntoIterator<Item = &'a str>,
    ) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::Other {
                message: format!("base URL {} cannot take a path", self.base_url),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GET `endpoint` with the API key and decode the JSON body as `T`.
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, endpoint: &Url) -> Result<T, ApiError> {
        let mut request_url = endpoint.clone();
        request_url
            .query_pairs_mut()
            .append_pair("key", &self.api_key);

        let response = self
            .http
            .get(request_url)
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(err, endpoint))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, endpoint, &body));
        }

        response
            .json()
            .await
            .map_err(|err| self.convert_reqwest_error(err, endpoint))
    }

    /// Convert a reqwest error to an [`ApiError`].
    ///
    /// The request URL, which carries the key, is stripped from the message.
    fn convert_reqwest_error(&self, error: reqwest::Error, endpoint: &Url) -> ApiError {
        let url = endpoint.to_string();
        if error.is_timeout() {
            return ApiError::Timeout {
                url,
                timeout_secs: self.timeout.as_secs(),
            };
        }

        if error.is_decode() {
            return ApiError::Decode {
                message: error.without_url().to_string(),
            };
        }

        ApiError::Connection {
            url,
            message: error.without_url().to_string(),
        }
    }
}

/// Map a non-success HTTP status to an [`ApiError`].
pub(crate) fn status_error(status: StatusCode, endpoint: &Url, body: &str) -> ApiError {
    let url = endpoint.to_string();
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(ErrorBody::into_message)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown status").to_owned());

    if status == StatusCode::REQUEST_TIMEOUT {
        return ApiError::Timeout {
            url,
            timeout_secs: 0,
        };
    }
    if status.is_client_error() {
        return ApiError::Client {
            url,
            status: status.as_u16(),
            message,
        };
    }
    if status.is_server_error() {
        return ApiError::Server {
            url,
            status: status.as_u16(),
            message,
        };
    }
    ApiError::Other {
        message: format!("unexpected status {status} from {url}: {message}"),
    }
}

/// Builds [`TomTomClient`]s sharing one connection pool.
#[derive(Debug, Clone)]
pub struct TomTomApiFactory {
    http: Client,
    base_url: Url,
    timeout: Duration,
}

impl TomTomApiFactory {
    /// Create a factory from `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build or the base URL is
    /// invalid.
    pub fn with_config(config: &TomTomClientConfig) -> Result<Self, ClientBuildError> {
        Ok(Self {
            http: config.build_http_client()?,
            base_url: config.parse_base_url()?,
            timeout: config.timeout,
        })
    }

    /// Create a client authenticated with `api_key`.
    #[must_use]
    pub fn client(&self, api_key: &str) -> TomTomClient {
        TomTomClient {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            timeout: self.timeout,
            api_key: api_key.to_owned(),
        }
    }
}

impl ApiFactory for TomTomApiFactory {
    fn routing(&self, api_key: &str) -> Result<Arc<dyn RoutingApi>, ApiError> {
        Ok(Arc::new(self.client(api_key)))
    }

    fn geocoding(&self, api_key: &str) -> Result<Arc<dyn GeocodingApi>, ApiError> {
        Ok(Arc::new(self.client(api_key)))
    }
}
