//! Lifecycle of loaded entries.
//!
//! [`IntegrationHost`] owns one [`EntryContext`] per loaded entry. A context
//! bundles the entry, the handle of its refresh task and its sensors, and is
//! handed out by reference rather than through any global registry.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::{
    ApiError, ConfigEntry, CoordinateLookup, CoordinatorHandle, CoordinatorState,
    DEFAULT_SCAN_INTERVAL, GeocodingApi, LocationResolver, RefreshCoordinator, RoutingApi,
    SetupFlow, TravelTimeSensor, sensors_for_entry,
};

/// Builds API clients for an entry's key.
pub trait ApiFactory: Send + Sync {
    /// Build a routing client authenticated with `api_key`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] when the client cannot be constructed.
    fn routing(&self, api_key: &str) -> Result<Arc<dyn RoutingApi>, ApiError>;

    /// Build a geocoding client authenticated with `api_key`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] when the client cannot be constructed.
    fn geocoding(&self, api_key: &str) -> Result<Arc<dyn GeocodingApi>, ApiError>;
}

/// Errors raised while loading entries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// An entry with the same id is already loaded.
    #[error("entry {entry_id} is already loaded")]
    AlreadyLoaded {
        /// The duplicate id.
        entry_id: String,
    },
    /// The entry's API clients could not be built.
    #[error("failed to build API clients: {0}")]
    Api(#[from] ApiError),
}

/// Runtime state of one loaded entry.
#[derive(Debug)]
pub struct EntryContext {
    entry: ConfigEntry,
    coordinator: CoordinatorHandle,
    sensors: Vec<TravelTimeSensor>,
}

impl EntryContext {
    /// The loaded entry.
    #[must_use]
    pub const fn entry(&self) -> &ConfigEntry {
        &self.entry
    }

    /// The entry's sensors.
    #[must_use]
    pub fn sensors(&self) -> &[TravelTimeSensor] {
        &self.sensors
    }

    /// The latest published snapshot.
    #[must_use]
    pub fn state(&self) -> CoordinatorState {
        self.coordinator.state()
    }

    /// Ask the refresh task for an immediate refresh.
    pub fn request_refresh(&self) {
        self.coordinator.request_refresh();
    }

    /// Diagnostics document for this entry.
    ///
    /// # Errors
    ///
    /// Returns a `serde_json` error if the entry cannot be serialised.
    pub fn diagnostics(&self) -> Result<serde_json::Value, serde_json::Error> {
        crate::config_entry_diagnostics(&self.entry, &self.state())
    }
}

/// Loads, reloads and unloads entries.
#[derive(Debug)]
pub struct IntegrationHost {
    apis: Arc<dyn ApiFactory>,
    lookup: Arc<dyn CoordinateLookup>,
    scan_interval: Duration,
    loaded: HashMap<String, EntryContext>,
}

impl std::fmt::Debug for dyn ApiFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("<dyn ApiFactory>")
    }
}

impl IntegrationHost {
    /// Create a host using `apis` for clients and `lookup` for named places.
    #[must_use]
    pub fn new(apis: Arc<dyn ApiFactory>, lookup: Arc<dyn CoordinateLookup>) -> Self {
        Self {
            apis,
            lookup,
            scan_interval: DEFAULT_SCAN_INTERVAL,
            loaded: HashMap::new(),
        }
    }

    /// Override the refresh interval for entries loaded afterwards.
    #[must_use]
    pub const fn with_scan_interval(mut self, scan_interval: Duration) -> Self {
        self.scan_interval = scan_interval;
        self
    }

    /// Build a setup flow authenticated with `api_key`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] when the API clients cannot be built.
    pub fn setup_flow(&self, api_key: &str) -> Result<SetupFlow, ApiError> {
        Ok(SetupFlow::new(
            self.resolver(api_key)?,
            self.apis.routing(api_key)?,
        ))
    }

    /// Load `entry`: refresh once, then keep refreshing on the schedule.
    ///
    /// A failed first refresh is logged and leaves the sensors unknown
    /// until a later refresh succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::AlreadyLoaded`] for a duplicate id and
    /// [`HostError::Api`] when the API clients cannot be built.
    pub async fn setup_entry(&mut self, entry: ConfigEntry) -> Result<&EntryContext, HostError> {
        if self.loaded.contains_key(&entry.entry_id) {
            return Err(HostError::AlreadyLoaded {
                entry_id: entry.entry_id,
            });
        }
        let coordinator = RefreshCoordinator::new(
            &entry,
            self.resolver(&entry.data.api_key)?,
            self.apis.routing(&entry.data.api_key)?,
        );
        if let Err(err) = coordinator.refresh_and_publish().await {
            log::warn!("First refresh of '{}' failed: {err}", entry.title);
        }
        let sensors = sensors_for_entry(&entry, &coordinator.subscribe());
        let context = EntryContext {
            coordinator: coordinator.spawn(self.scan_interval),
            sensors,
            entry,
        };
        let entry_id = context.entry.entry_id.clone();
        Ok(&*self.loaded.entry(entry_id).or_insert(context))
    }

    /// Stop the refresh task of `entry_id`.
    ///
    /// Returns `false` when the entry was not loaded.
    pub async fn unload_entry(&mut self, entry_id: &str) -> bool {
        match self.loaded.remove(entry_id) {
            Some(context) => {
                context.coordinator.unload().await;
                true
            }
            None => false,
        }
    }

    /// Replace a loaded entry with `entry`, keeping the same id.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Api`] when the API clients cannot be built.
    pub async fn reload_entry(&mut self, entry: ConfigEntry) -> Result<&EntryContext, HostError> {
        self.unload_entry(&entry.entry_id).await;
        self.setup_entry(entry).await
    }

    /// Stop every refresh task.
    pub async fn unload_all(&mut self) {
        for (_, context) in self.loaded.drain() {
            context.coordinator.unload().await;
        }
    }

    /// Look up a loaded entry.
    #[must_use]
    pub fn entry(&self, entry_id: &str) -> Option<&EntryContext> {
        self.loaded.get(entry_id)
    }

    /// Iterate over loaded entries in no particular order.
    pub fn entries(&self) -> impl Iterator<Item = &EntryContext> {
        self.loaded.values()
    }

    /// Number of loaded entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.loaded.len()
    }

    /// Whether no entry is loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.loaded.is_empty()
    }

    fn resolver(&self, api_key: &str) -> Result<LocationResolver, ApiError> {
        Ok(LocationResolver::new(
            Arc::clone(&self.lookup),
            self.apis.geocoding(api_key)?,
        ))
    }
}
