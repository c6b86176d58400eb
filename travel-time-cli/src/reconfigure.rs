//! `reconfigure` command: revalidate and replace an entry's data.

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use travel_time_core::{ApiFactory, ConfigEntry};

use crate::service::{ServiceConfig, setup_flow};
use crate::setup::{rejected, write_created};
use crate::{
    ARG_API_KEY, ARG_BASE_URL, ARG_ENTRY, ARG_NAME, ARG_STORE, ARG_TIMEOUT_SECS, CliError,
    ENV_RECONFIGURE_ENTRY,
};

/// CLI arguments for the `reconfigure` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Replace the API key, name or locations of a stored entry. \
                 Omitted values keep their stored contents; the result is \
                 validated exactly like `setup` before it replaces the entry. \
                 A running host picks the change up on SIGHUP.",
    about = "Revalidate and replace a stored entry"
)]
#[ortho_config(prefix = "TRAVEL_TIME")]
pub(crate) struct ReconfigureArgs {
    /// New locations in travel order; keeps the stored list when empty.
    #[arg(value_name = "location")]
    #[serde(default)]
    pub(crate) locations: Vec<String>,
    /// Id of the entry to change.
    #[arg(long = ARG_ENTRY, value_name = "id")]
    #[serde(default)]
    pub(crate) entry: Option<String>,
    /// Replacement TomTom API key.
    #[arg(long = ARG_API_KEY, value_name = "key")]
    #[serde(default)]
    pub(crate) api_key: Option<String>,
    /// Replacement display name.
    #[arg(long = ARG_NAME, value_name = "name")]
    #[serde(default)]
    pub(crate) name: Option<String>,
    /// Path to the entry store.
    #[arg(long = ARG_STORE, value_name = "path")]
    #[serde(default)]
    pub(crate) store: Option<Utf8PathBuf>,
    /// Base URL of the TomTom APIs.
    #[arg(long = ARG_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) base_url: Option<String>,
    /// Request timeout in seconds.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
}

impl ReconfigureArgs {
    pub(crate) fn into_config(self) -> Result<ReconfigureConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ReconfigureConfig::try_from(merged)
    }
}

/// Resolved `reconfigure` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ReconfigureConfig {
    pub(crate) service: ServiceConfig,
    pub(crate) entry_id: String,
    pub(crate) api_key: Option<String>,
    pub(crate) name: Option<String>,
    pub(crate) locations: Vec<String>,
}

impl TryFrom<ReconfigureArgs> for ReconfigureConfig {
    type Error = CliError;

    fn try_from(args: ReconfigureArgs) -> Result<Self, Self::Error> {
        let entry_id = args.entry.ok_or(CliError::MissingArgument {
            field: ARG_ENTRY,
            env: ENV_RECONFIGURE_ENTRY,
        })?;
        Ok(Self {
            service: ServiceConfig::from_layers(args.store, args.base_url, args.timeout_secs),
            entry_id,
            api_key: args.api_key,
            name: args.name,
            locations: args.locations,
        })
    }
}

pub(crate) async fn run_reconfigure(args: ReconfigureArgs) -> Result<(), CliError> {
    let config = args.into_config()?;
    let apis = config.service.api_factory()?;
    let entry = run_reconfigure_with(config, apis.as_ref()).await?;
    write_created(&mut std::io::stdout().lock(), &entry)
}

/// Validate the merged data and replace the stored entry's data with it.
///
/// The entry keeps its id and options, so the store never gains a second
/// copy. A new name also renames the entry.
pub(crate) async fn run_reconfigure_with(
    config: ReconfigureConfig,
    apis: &dyn ApiFactory,
) -> Result<ConfigEntry, CliError> {
    let mut store = config.service.open_store()?;
    let current = store
        .entry(&config.entry_id)
        .cloned()
        .ok_or_else(|| CliError::UnknownEntry {
            entry_id: config.entry_id.clone(),
        })?;

    let mut data = current.data.clone();
    if let Some(api_key) = config.api_key {
        data.api_key = api_key;
    }
    if let Some(name) = config.name {
        data.name = name;
    }
    if !config.locations.is_empty() {
        data.locations = config.locations;
    }

    let flow = setup_flow(apis, store.places(), &data.api_key)?;
    let updated = flow.reconfigure(&current, data).await.map_err(rejected)?;
    let entry = store.replace_data(&config.entry_id, updated.data)?.clone();
    store.save()?;
    log::info!("Reconfigured entry '{}' ({})", entry.title, entry.entry_id);
    Ok(entry)
}
