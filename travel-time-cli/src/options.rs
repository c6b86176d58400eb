//! `options` command: edit an entry's routing options.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use travel_time_core::{AvoidType, ConfigEntry, RouteType, RoutingOptions, TravelMode};

use crate::service::ServiceConfig;
use crate::{
    ARG_AVOID, ARG_CLEAR_AVOID, ARG_ENTRY, ARG_ROUTE_TYPE, ARG_STORE, ARG_TRAVEL_MODE, CliError,
    ENV_OPTIONS_ENTRY,
};

/// CLI arguments for the `options` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Change how an entry's routes are planned. Options left \
                 out keep their stored values; `--avoid` replaces the whole \
                 avoid list and `--clear-avoid` empties it.",
    about = "Change an entry's routing options"
)]
#[ortho_config(prefix = "TRAVEL_TIME")]
pub(crate) struct OptionsArgs {
    /// Id of the entry to change.
    #[arg(long = ARG_ENTRY, value_name = "id")]
    #[serde(default)]
    pub(crate) entry: Option<String>,
    /// Travel mode (car, truck, taxi, bus, van, motorcycle, bicycle, pedestrian).
    #[arg(long = ARG_TRAVEL_MODE, value_name = "mode")]
    #[serde(default)]
    pub(crate) travel_mode: Option<TravelMode>,
    /// Route type (fastest, shortest, short, eco, thrilling).
    #[arg(long = ARG_ROUTE_TYPE, value_name = "type")]
    #[serde(default)]
    pub(crate) route_type: Option<RouteType>,
    /// Road feature to avoid; repeat for several.
    #[arg(long = ARG_AVOID, value_name = "feature")]
    #[serde(default)]
    pub(crate) avoid: Vec<AvoidType>,
    /// Remove every avoided road feature.
    #[arg(long = ARG_CLEAR_AVOID)]
    #[serde(default)]
    pub(crate) clear_avoid: bool,
    /// Path to the entry store.
    #[arg(long = ARG_STORE, value_name = "path")]
    #[serde(default)]
    pub(crate) store: Option<Utf8PathBuf>,
}

impl OptionsArgs {
    pub(crate) fn into_config(self) -> Result<OptionsConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        OptionsConfig::try_from(merged)
    }
}

/// Resolved `options` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OptionsConfig {
    pub(crate) service: ServiceConfig,
    pub(crate) entry_id: String,
    pub(crate) travel_mode: Option<TravelMode>,
    pub(crate) route_type: Option<RouteType>,
    pub(crate) avoid: Vec<AvoidType>,
    pub(crate) clear_avoid: bool,
}

impl OptionsConfig {
    /// Apply the requested changes on top of `current`.
    pub(crate) fn apply(&self, current: &RoutingOptions) -> RoutingOptions {
        let mut options = current.clone();
        if let Some(travel_mode) = self.travel_mode {
            options.vehicle_type = travel_mode;
        }
        if let Some(route_type) = self.route_type {
            options.route_type = route_type;
        }
        if self.clear_avoid {
            options.avoid_type.clear();
        }
        if !self.avoid.is_empty() {
            options.avoid_type.clone_from(&self.avoid);
        }
        options
    }
}

impl TryFrom<OptionsArgs> for OptionsConfig {
    type Error = CliError;

    fn try_from(args: OptionsArgs) -> Result<Self, Self::Error> {
        let entry_id = args.entry.ok_or(CliError::MissingArgument {
            field: ARG_ENTRY,
            env: ENV_OPTIONS_ENTRY,
        })?;
        Ok(Self {
            service: ServiceConfig::from_layers(args.store, None, None),
            entry_id,
            travel_mode: args.travel_mode,
            route_type: args.route_type,
            avoid: args.avoid,
            clear_avoid: args.clear_avoid,
        })
    }
}

pub(crate) fn run_options(args: OptionsArgs) -> Result<(), CliError> {
    let config = args.into_config()?;
    let entry = run_options_with(&config)?;
    write_options(&mut std::io::stdout().lock(), &entry)
}

/// Store the updated options for the configured entry.
pub(crate) fn run_options_with(config: &OptionsConfig) -> Result<ConfigEntry, CliError> {
    let mut store = config.service.open_store()?;
    let current = store
        .entry(&config.entry_id)
        .ok_or_else(|| CliError::UnknownEntry {
            entry_id: config.entry_id.clone(),
        })?;
    let options = config.apply(&current.options);
    let entry = store.update_options(&config.entry_id, options)?.clone();
    store.save()?;
    log::info!("Updated options of '{}' ({})", entry.title, entry.entry_id);
    Ok(entry)
}

pub(crate) fn write_options(writer: &mut dyn Write, entry: &ConfigEntry) -> Result<(), CliError> {
    let avoid = entry
        .options
        .avoid_type
        .iter()
        .map(AvoidType::as_str)
        .collect::<Vec<_>>()
        .join(",");
    writeln!(
        writer,
        "vehicle_type={} route_type={} avoid_type=[{avoid}]",
        entry.options.vehicle_type, entry.options.route_type
    )
    .map_err(CliError::WriteOutput)
}
