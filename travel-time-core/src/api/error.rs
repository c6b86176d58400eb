use thiserror::Error;

/// Errors returned by [`crate::RoutingApi`] and [`crate::GeocodingApi`].
///
/// The first four variants are the documented failure taxonomy and each maps
/// to its own setup error code. `Decode` and `Other` cover everything else and
/// abort setup as unexpected failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The service rejected the request (HTTP 4xx other than 408).
    #[error("request to {url} was rejected with status {status}: {message}")]
    Client {
        /// The request URL with credentials removed.
        url: String,
        /// The HTTP status code returned.
        status: u16,
        /// Description of the failure.
        message: String,
    },
    /// The request did not complete in time.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// The request URL with credentials removed.
        url: String,
        /// The configured timeout in seconds.
        timeout_secs: u64,
    },
    /// The service failed while handling the request (HTTP 5xx).
    #[error("service at {url} failed with status {status}: {message}")]
    Server {
        /// The request URL with credentials removed.
        url: String,
        /// The HTTP status code returned.
        status: u16,
        /// Description of the failure.
        message: String,
    },
    /// The service could not be reached.
    #[error("could not connect to {url}: {message}")]
    Connection {
        /// The request URL with credentials removed.
        url: String,
        /// Description of the transport failure.
        message: String,
    },
    /// The response body did not match the expected shape.
    #[error("failed to decode response: {message}")]
    Decode {
        /// Description of the decoding failure.
        message: String,
    },
    /// Any other failure raised by an API implementation.
    #[error("{message}")]
    Other {
        /// Description of the failure.
        message: String,
    },
}
