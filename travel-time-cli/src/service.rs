//! Settings and wiring shared by the commands.

use std::sync::Arc;
use std::time::Duration;

use camino::Utf8PathBuf;
use travel_time_core::{ApiFactory, LocationResolver, NamedPlaces, SetupFlow};
use travel_time_store::{DEFAULT_STORE_FILE, EntryStore};
use travel_time_tomtom::{TomTomApiFactory, TomTomClientConfig};

use crate::CliError;

/// Where entries live and how to reach TomTom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ServiceConfig {
    /// Path to the JSON entry store.
    pub(crate) store: Utf8PathBuf,
    /// TomTom client settings.
    pub(crate) client: TomTomClientConfig,
}

impl ServiceConfig {
    /// Fill unset values with defaults.
    pub(crate) fn from_layers(
        store: Option<Utf8PathBuf>,
        base_url: Option<String>,
        timeout_secs: Option<u64>,
    ) -> Self {
        let mut client = TomTomClientConfig::default();
        if let Some(base_url) = base_url {
            client = client.with_base_url(base_url);
        }
        if let Some(secs) = timeout_secs {
            client = client.with_timeout(Duration::from_secs(secs));
        }
        Self {
            store: store.unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_STORE_FILE)),
            client,
        }
    }

    pub(crate) fn open_store(&self) -> Result<EntryStore, CliError> {
        Ok(EntryStore::open(self.store.clone())?)
    }

    pub(crate) fn api_factory(&self) -> Result<Arc<dyn ApiFactory>, CliError> {
        Ok(Arc::new(TomTomApiFactory::with_config(&self.client)?))
    }
}

/// Build a setup flow resolving names against `places`.
pub(crate) fn setup_flow(
    apis: &dyn ApiFactory,
    places: &NamedPlaces,
    api_key: &str,
) -> Result<SetupFlow, CliError> {
    let resolver = LocationResolver::new(Arc::new(places.clone()), apis.geocoding(api_key)?);
    Ok(SetupFlow::new(resolver, apis.routing(api_key)?))
}
