//! `place` command: manage named places.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use travel_time_core::Coordinate;

use crate::service::ServiceConfig;
use crate::{
    ARG_COORDINATES, ARG_NAME, ARG_REMOVE, ARG_STORE, CliError, ENV_PLACE_COORDINATES,
    ENV_PLACE_NAME,
};

/// CLI arguments for the `place` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Give a `lat,lon` pair a name that entries can use as a \
                 location. Names are case-insensitive. Entries read the \
                 place on every refresh, so moving a place moves the route.",
    about = "Name a coordinate"
)]
#[ortho_config(prefix = "TRAVEL_TIME")]
pub(crate) struct PlaceArgs {
    /// Name of the place.
    #[arg(value_name = "name")]
    #[serde(default)]
    pub(crate) name: Option<String>,
    /// Coordinates as `lat,lon`.
    #[arg(value_name = "lat,lon")]
    #[serde(default)]
    pub(crate) coordinates: Option<String>,
    /// Forget the place instead of setting it.
    #[arg(long = ARG_REMOVE)]
    #[serde(default)]
    pub(crate) remove: bool,
    /// Path to the entry store.
    #[arg(long = ARG_STORE, value_name = "path")]
    #[serde(default)]
    pub(crate) store: Option<Utf8PathBuf>,
}

impl PlaceArgs {
    pub(crate) fn into_config(self) -> Result<PlaceConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        PlaceConfig::try_from(merged)
    }
}

/// What to do with a place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum PlaceChange {
    Set(Coordinate),
    Remove,
}

/// Resolved `place` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PlaceConfig {
    pub(crate) service: ServiceConfig,
    pub(crate) name: String,
    pub(crate) change: PlaceChange,
}

impl TryFrom<PlaceArgs> for PlaceConfig {
    type Error = CliError;

    fn try_from(args: PlaceArgs) -> Result<Self, Self::Error> {
        let name = args.name.ok_or(CliError::MissingArgument {
            field: ARG_NAME,
            env: ENV_PLACE_NAME,
        })?;
        let change = if args.remove {
            PlaceChange::Remove
        } else {
            let text = args.coordinates.ok_or(CliError::MissingArgument {
                field: ARG_COORDINATES,
                env: ENV_PLACE_COORDINATES,
            })?;
            let coordinate = text
                .parse()
                .map_err(|source| CliError::InvalidCoordinates {
                    name: name.clone(),
                    source,
                })?;
            PlaceChange::Set(coordinate)
        };
        Ok(Self {
            service: ServiceConfig::from_layers(args.store, None, None),
            name,
            change,
        })
    }
}

pub(crate) fn run_place(args: PlaceArgs) -> Result<(), CliError> {
    let config = args.into_config()?;
    run_place_with(&config, &mut std::io::stdout().lock())
}

/// Apply the place change and persist the store.
pub(crate) fn run_place_with(config: &PlaceConfig, writer: &mut dyn Write) -> Result<(), CliError> {
    let mut store = config.service.open_store()?;
    match config.change {
        PlaceChange::Set(coordinate) => {
            store.set_place(&config.name, coordinate.to_comma_separated());
            store.save()?;
            log::info!("Named {coordinate} as '{}'", config.name);
            writeln!(writer, "{} = {coordinate}", config.name).map_err(CliError::WriteOutput)
        }
        PlaceChange::Remove => {
            if store.remove_place(&config.name).is_none() {
                log::warn!("No place named '{}'", config.name);
                return Ok(());
            }
            store.save()?;
            writeln!(writer, "{} removed", config.name).map_err(CliError::WriteOutput)
        }
    }
}
