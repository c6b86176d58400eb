//! Deterministic service doubles shared by unit and behaviour tests.

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::{
    ApiError, ApiFactory, CalculateRouteRequest, CalculateRouteResponse, Coordinate,
    GeocodeResponse, GeocodeResult, GeocodingApi, Route, RouteSummary, RoutingApi,
};

/// Summary used across tests: 360 s travel, 95 s delay, 1146 m.
#[must_use]
pub const fn sample_summary() -> RouteSummary {
    RouteSummary {
        length_in_meters: 1146,
        travel_time_in_seconds: 360,
        traffic_delay_in_seconds: 95,
    }
}

/// Drive `future` to completion on a fresh current-thread runtime.
///
/// # Panics
///
/// Panics if the runtime cannot be built.
pub fn block_on_for_tests<F: Future>(future: F) -> F::Output {
    match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime.block_on(future),
        Err(err) => panic!("failed to build test runtime: {err}"),
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

type RouteReply = Result<CalculateRouteResponse, ApiError>;

/// Stub [`RoutingApi`] replaying scripted replies and recording requests.
///
/// Replies are consumed in order; the last one repeats forever.
#[derive(Debug, Clone)]
pub struct StubRoutingApi {
    replies: Arc<Mutex<VecDeque<RouteReply>>>,
    requests: Arc<Mutex<Vec<CalculateRouteRequest>>>,
}

impl StubRoutingApi {
    fn with_reply(reply: RouteReply) -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::from([reply]))),
            requests: Arc::default(),
        }
    }

    /// Answer every request with one route summarised by `summary`.
    #[must_use]
    pub fn with_summary(summary: RouteSummary) -> Self {
        Self::with_reply(Ok(route_response(summary)))
    }

    /// Answer every request with an empty route list.
    #[must_use]
    pub fn without_routes() -> Self {
        Self::with_reply(Ok(CalculateRouteResponse::default()))
    }

    /// Fail every request with `error`.
    #[must_use]
    pub fn with_error(error: ApiError) -> Self {
        Self::with_reply(Err(error))
    }

    /// Queue `summary` after the replies scripted so far.
    #[must_use]
    pub fn then_summary(self, summary: RouteSummary) -> Self {
        lock(&self.replies).push_back(Ok(route_response(summary)));
        self
    }

    /// Queue `error` after the replies scripted so far.
    #[must_use]
    pub fn then_error(self, error: ApiError) -> Self {
        lock(&self.replies).push_back(Err(error));
        self
    }

    /// Requests received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<CalculateRouteRequest> {
        lock(&self.requests).clone()
    }
}

fn route_response(summary: RouteSummary) -> CalculateRouteResponse {
    CalculateRouteResponse {
        routes: vec![Route { summary }],
    }
}

#[async_trait]
impl RoutingApi for StubRoutingApi {
    async fn calculate_route(
        &self,
        request: &CalculateRouteRequest,
    ) -> Result<CalculateRouteResponse, ApiError> {
        lock(&self.requests).push(request.clone());
        let mut replies = lock(&self.replies);
        let reply = if replies.len() > 1 {
            replies.pop_front()
        } else {
            replies.front().cloned()
        };
        reply.unwrap_or_else(|| Ok(CalculateRouteResponse::default()))
    }
}

/// Stub [`GeocodingApi`] answering from exact-match queries or a fallback.
///
/// The default stub finds nothing for any query.
#[derive(Debug, Clone)]
pub struct StubGeocodingApi {
    matches: HashMap<String, Coordinate>,
    fallback: Result<Vec<Coordinate>, ApiError>,
    queries: Arc<Mutex<Vec<String>>>,
}

impl Default for StubGeocodingApi {
    fn default() -> Self {
        Self::with_positions(Vec::new())
    }
}

impl StubGeocodingApi {
    /// Answer every query with `positions`, best first.
    #[must_use]
    pub fn with_positions(positions: Vec<Coordinate>) -> Self {
        Self {
            matches: HashMap::new(),
            fallback: Ok(positions),
            queries: Arc::default(),
        }
    }

    /// Answer every query with a single `position`.
    #[must_use]
    pub fn with_position(position: Coordinate) -> Self {
        Self::with_positions(vec![position])
    }

    /// Fail every query without an exact match with `error`.
    #[must_use]
    pub fn with_error(error: ApiError) -> Self {
        Self {
            fallback: Err(error),
            ..Self::default()
        }
    }

    /// Answer `query` with `position`, ahead of the fallback.
    #[must_use]
    pub fn with_match(mut self, query: impl Into<String>, position: Coordinate) -> Self {
        self.matches.insert(query.into(), position);
        self
    }

    /// Queries received so far, oldest first.
    #[must_use]
    pub fn queries(&self) -> Vec<String> {
        lock(&self.queries).clone()
    }

    /// Number of queries received so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        lock(&self.queries).len()
    }
}

#[async_trait]
impl GeocodingApi for StubGeocodingApi {
    async fn geocode(&self, query: &str) -> Result<GeocodeResponse, ApiError> {
        lock(&self.queries).push(query.to_owned());
        let positions = match self.matches.get(query) {
            Some(position) => vec![*position],
            None => self.fallback.clone()?,
        };
        Ok(GeocodeResponse {
            results: positions
                .into_iter()
                .map(|position| GeocodeResult { position })
                .collect(),
        })
    }
}

/// Stub [`ApiFactory`] handing out shared stubs and recording the keys used.
#[derive(Debug, Clone)]
pub struct StubApiFactory {
    routing: StubRoutingApi,
    geocoding: StubGeocodingApi,
    api_keys: Arc<Mutex<Vec<String>>>,
}

impl StubApiFactory {
    /// Hand out clones of `routing` and `geocoding`.
    #[must_use]
    pub fn new(routing: StubRoutingApi, geocoding: StubGeocodingApi) -> Self {
        Self {
            routing,
            geocoding,
            api_keys: Arc::default(),
        }
    }

    /// Keys passed to the factory so far, oldest first.
    #[must_use]
    pub fn api_keys(&self) -> Vec<String> {
        lock(&self.api_keys).clone()
    }
}

impl ApiFactory for StubApiFactory {
    fn routing(&self, api_key: &str) -> Result<Arc<dyn RoutingApi>, ApiError> {
        lock(&self.api_keys).push(api_key.to_owned());
        Ok(Arc::new(self.routing.clone()))
    }

    fn geocoding(&self, api_key: &str) -> Result<Arc<dyn GeocodingApi>, ApiError> {
        lock(&self.api_keys).push(api_key.to_owned());
        Ok(Arc::new(self.geocoding.clone()))
    }
}
