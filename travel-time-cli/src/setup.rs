//! `setup` command: validate and store a new entry.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use travel_time_core::{ApiFactory, ConfigEntry, EntryData, SetupError};
use uuid::Uuid;

use crate::service::{ServiceConfig, setup_flow};
use crate::{
    ARG_API_KEY, ARG_BASE_URL, ARG_NAME, ARG_STORE, ARG_TIMEOUT_SECS, CliError, ENV_SETUP_API_KEY,
};

/// CLI arguments for the `setup` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Validate a list of locations against TomTom and store them \
                 as a new entry. Each location is a literal `lat,lon` pair, \
                 a named place or free text to geocode; geocoded locations \
                 are stored as the coordinates they resolved to.",
    about = "Validate and store a new entry"
)]
#[ortho_config(prefix = "TRAVEL_TIME")]
pub(crate) struct SetupArgs {
    /// Locations in travel order: origin, waypoints, destination.
    #[arg(value_name = "location")]
    #[serde(default)]
    pub(crate) locations: Vec<String>,
    /// TomTom API key.
    #[arg(long = ARG_API_KEY, value_name = "key")]
    #[serde(default)]
    pub(crate) api_key: Option<String>,
    /// Display name for the entry.
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

impl SetupArgs {
    pub(crate) fn into_config(self) -> Result<SetupConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        SetupConfig::try_from(merged)
    }
}

/// Resolved `setup` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SetupConfig {
    pub(crate) service: ServiceConfig,
    pub(crate) data: EntryData,
}

impl TryFrom<SetupArgs> for SetupConfig {
    type Error = CliError;

    fn try_from(args: SetupArgs) -> Result<Self, Self::Error> {
        let api_key = args.api_key.ok_or(CliError::MissingArgument {
            field: ARG_API_KEY,
            env: ENV_SETUP_API_KEY,
        })?;
        let mut data = EntryData::new(api_key, args.locations);
        if let Some(name) = args.name {
            data = data.with_name(name);
        }
        Ok(Self {
            service: ServiceConfig::from_layers(args.store, args.base_url, args.timeout_secs),
            data,
        })
    }
}

pub(crate) async fn run_setup(args: SetupArgs) -> Result<(), CliError> {
    let config = args.into_config()?;
    let apis = config.service.api_factory()?;
    let entry = run_setup_with(config, apis.as_ref()).await?;
    write_created(&mut std::io::stdout().lock(), &entry)
}

/// Validate the configured data and persist it as a new entry.
pub(crate) async fn run_setup_with(
    config: SetupConfig,
    apis: &dyn ApiFactory,
) -> Result<ConfigEntry, CliError> {
    let mut store = config.service.open_store()?;
    let flow = setup_flow(apis, store.places(), &config.data.api_key)?;
    let entry_id = Uuid::new_v4().simple().to_string();
    let entry = flow
        .create_entry(entry_id, config.data)
        .await
        .map_err(rejected)?;
    store.add_entry(entry.clone())?;
    store.save()?;
    log::info!("Created entry '{}' ({})", entry.title, entry.entry_id);
    Ok(entry)
}

/// Print the id of `entry` on its own line.
pub(crate) fn write_created(writer: &mut dyn Write, entry: &ConfigEntry) -> Result<(), CliError> {
    writeln!(writer, "{}", entry.entry_id).map_err(CliError::WriteOutput)
}

/// Log a setup rejection with its code before surfacing it.
pub(crate) fn rejected(error: SetupError) -> CliError {
    match error.error_key() {
        Some(key) => {
            let placeholders = error.placeholders();
            if placeholders.is_empty() {
                log::error!("Setup rejected with {key}: {error}");
            } else {
                log::error!("Setup rejected with {key} {placeholders:?}: {error}");
            }
        }
        None => log::error!("Unexpected exception during setup: {error}"),
    }
    CliError::Setup(error)
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<SetupConfig, CliError> {
    let merged = SetupArgs::merge_from_layers(layers).map_err(CliError::from)?;
    SetupConfig::try_from(merged)
}
