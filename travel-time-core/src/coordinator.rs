//! Periodic route refresh for one config entry.
//!
//! A [`RefreshCoordinator`] resolves the entry's locations, plans a single
//! route with the entry's options and publishes the resulting
//! [`TravelResult`] through a `tokio::sync::watch` channel. Readers always see
//! a complete [`CoordinatorState`] snapshot. A failed refresh keeps the last
//! good result and flips `last_update_success` to `false`.
//!
//! [`RefreshCoordinator::spawn`] moves the coordinator onto a Tokio task that
//! refreshes on a fixed interval or when asked through its
//! [`CoordinatorHandle`]. Refreshes run one at a time on that task.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::{
    ApiError, CalculateRouteRequest, ConfigEntry, EntryData, LocationResolver, RoutingApi,
    RoutingOptions, TravelResult,
};

/// Interval between scheduled refreshes.
pub const DEFAULT_SCAN_INTERVAL: Duration = Duration::from_secs(600);

/// Reasons a refresh did not produce a result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpdateFailed {
    /// A routing or geocoding call failed.
    #[error("error communicating with the routing service: {0}")]
    Api(#[from] ApiError),
    /// The routing service answered without any route.
    #[error("no route found between the configured locations")]
    NoRoute,
}

/// The latest published snapshot for an entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinatorState {
    /// The last successful result, if any refresh has succeeded.
    pub data: Option<TravelResult>,
    /// Whether the most recent refresh succeeded.
    pub last_update_success: bool,
    /// Description of the most recent failure, cleared on success.
    pub last_error: Option<String>,
}

impl Default for CoordinatorState {
    fn default() -> Self {
        Self {
            data: None,
            last_update_success: true,
            last_error: None,
        }
    }
}

/// Refreshes travel figures for one entry.
#[derive(Debug)]
pub struct RefreshCoordinator {
    name: String,
    data: EntryData,
    options: RoutingOptions,
    resolver: LocationResolver,
    routing: Arc<dyn RoutingApi>,
    state: watch::Sender<CoordinatorState>,
}

impl RefreshCoordinator {
    /// Create a coordinator for `entry` with no published result.
    #[must_use]
    pub fn new(
        entry: &ConfigEntry,
        resolver: LocationResolver,
        routing: Arc<dyn RoutingApi>,
    ) -> Self {
        let (state, _) = watch::channel(CoordinatorState::default());
        Self {
            name: entry.title.clone(),
            data: entry.data.clone(),
            options: entry.options.clone(),
            resolver,
            routing,
            state,
        }
    }

    /// Subscribe to published snapshots.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CoordinatorState> {
        self.state.subscribe()
    }

    /// Return the current snapshot.
    #[must_use]
    pub fn state(&self) -> CoordinatorState {
        self.state.borrow().clone()
    }

    /// Compute fresh travel figures without publishing them.
    ///
    /// Locations that cannot be resolved are logged and left out of the
    /// request.
    ///
    /// # Errors
    ///
    /// Returns [`UpdateFailed::Api`] when geocoding or routing fails and
    /// [`UpdateFailed::NoRoute`] when no route comes back.
    pub async fn refresh(&self) -> Result<TravelResult, UpdateFailed> {
        log::debug!("Refreshing travel time for '{}'", self.name);
        let mut locations = Vec::with_capacity(self.data.locations.len());
        for input in &self.data.locations {
            match self.resolver.resolve(input).await? {
                Some(resolved) => locations.push(resolved.location),
                None => log::error!("Cannot determine location: {input}"),
            }
        }

        let request = CalculateRouteRequest {
            locations,
            max_alternatives: Some(0),
            travel_mode: Some(self.options.vehicle_type),
            route_type: Some(self.options.route_type),
            avoid: self.options.distinct_avoid_types(),
        };
        log::debug!(
            "Planning {} route ({}) through {} locations",
            self.options.vehicle_type,
            self.options.route_type,
            request.locations.len()
        );
        let response = self.routing.calculate_route(&request).await?;
        let route = response.first_route().ok_or(UpdateFailed::NoRoute)?;
        Ok(TravelResult::from_summary(&route.summary))
    }

    /// Refresh and publish the outcome to subscribers.
    ///
    /// # Errors
    ///
    /// Returns the [`UpdateFailed`] reason after recording it in the
    /// published state.
    pub async fn refresh_and_publish(&self) -> Result<TravelResult, UpdateFailed> {
        let outcome = self.refresh().await;
        match &outcome {
            Ok(result) => self.state.send_modify(|state| {
                state.data = Some(*result);
                state.last_update_success = true;
                state.last_error = None;
            }),
            Err(err) => {
                log::warn!("Error fetching travel time for '{}': {err}", self.name);
                self.state.send_modify(|state| {
                    state.last_update_success = false;
                    state.last_error = Some(err.to_string());
                });
            }
        }
        outcome
    }

    /// Move the coordinator onto a task refreshing every `interval`.
    ///
    /// The first scheduled refresh happens one `interval` from now; callers
    /// wanting an eager refresh run [`Self::refresh_and_publish`] first.
    #[must_use]
    pub fn spawn(self, interval: Duration) -> CoordinatorHandle {
        let state = self.subscribe();
        let (requests_tx, requests_rx) = mpsc::channel(1);
        let cancel = CancellationToken::new();
        let task = tokio::spawn(self.run(interval, requests_rx, cancel.clone()));
        CoordinatorHandle {
            state,
            requests: requests_tx,
            cancel: cancel.drop_guard(),
            task,
        }
    }

    async fn run(
        self,
        interval: Duration,
        mut requests: mpsc::Receiver<()>,
        cancel: CancellationToken,
    ) {
        let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                _ = ticker.tick() => {}
                Some(()) = requests.recv() => {}
            }
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                _ = self.refresh_and_publish() => {}
            }
        }
        log::debug!("Stopped refreshing travel time for '{}'", self.name);
    }
}

/// Owner-side handle of a spawned [`RefreshCoordinator`].
///
/// Dropping the handle stops the task; [`CoordinatorHandle::unload`] also
/// waits for it to finish.
#[derive(Debug)]
pub struct CoordinatorHandle {
    state: watch::Receiver<CoordinatorState>,
    requests: mpsc::Sender<()>,
    cancel: DropGuard,
    task: JoinHandle<()>,
}

impl CoordinatorHandle {
    /// Subscribe to published snapshots.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CoordinatorState> {
        self.state.clone()
    }

    /// Return the current snapshot.
    #[must_use]
    pub fn state(&self) -> CoordinatorState {
        self.state.borrow().clone()
    }

    /// Ask for a refresh outside the schedule.
    ///
    /// Requests made while one is already pending are merged into it.
    pub fn request_refresh(&self) {
        if self.requests.try_send(()).is_err() {
            log::debug!("Refresh already pending");
        }
    }

    /// Stop the refresh task, abandoning any refresh in flight.
    pub async fn unload(self) {
        let Self { cancel, task, .. } = self;
        cancel.disarm().cancel();
        if let Err(err) = task.await {
            log::warn!("Refresh task ended abnormally: {err}");
        }
    }
}
