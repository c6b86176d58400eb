//! Command-line host for TomTom travel-time entries.
//!
//! Entries are created and edited with `setup`, `reconfigure`, `options` and
//! `place`, persisted in a JSON store, and served by `run`, which keeps one
//! refresh task per entry alive until interrupted.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod diagnostics;
mod error;
mod logging;
mod options;
mod place;
mod reconfigure;
mod run;
mod service;
mod setup;

pub use error::CliError;
pub use logging::init_logging;

use diagnostics::DiagnosticsArgs;
use options::OptionsArgs;
use place::PlaceArgs;
use reconfigure::ReconfigureArgs;
use run::RunArgs;
use setup::SetupArgs;

const ARG_STORE: &str = "store";
const ARG_BASE_URL: &str = "base-url";
const ARG_TIMEOUT_SECS: &str = "timeout-secs";
const ARG_API_KEY: &str = "api-key";
const ARG_NAME: &str = "name";
const ARG_ENTRY: &str = "entry";
const ARG_TRAVEL_MODE: &str = "travel-mode";
const ARG_ROUTE_TYPE: &str = "route-type";
const ARG_AVOID: &str = "avoid";
const ARG_CLEAR_AVOID: &str = "clear-avoid";
const ARG_REMOVE: &str = "remove";
const ARG_COORDINATES: &str = "coordinates";
const ARG_SCAN_INTERVAL_SECS: &str = "scan-interval-secs";
const ENV_SETUP_API_KEY: &str = "TRAVEL_TIME_CMDS_SETUP_API_KEY";
const ENV_RECONFIGURE_ENTRY: &str = "TRAVEL_TIME_CMDS_RECONFIGURE_ENTRY";
const ENV_OPTIONS_ENTRY: &str = "TRAVEL_TIME_CMDS_OPTIONS_ENTRY";
const ENV_PLACE_NAME: &str = "TRAVEL_TIME_CMDS_PLACE_NAME";
const ENV_PLACE_COORDINATES: &str = "TRAVEL_TIME_CMDS_PLACE_COORDINATES";
const ENV_DIAGNOSTICS_ENTRY: &str = "TRAVEL_TIME_CMDS_DIAGNOSTICS_ENTRY";

/// Run the CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns a [`CliError`] describing the first failure of the selected
/// command.
pub async fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Setup(args) => setup::run_setup(args).await,
        Command::Reconfigure(args) => reconfigure::run_reconfigure(args).await,
        Command::Options(args) => options::run_options(args),
        Command::Place(args) => place::run_place(args),
        Command::Run(args) => run::run_host(args).await,
        Command::Diagnostics(args) => diagnostics::run_diagnostics(args).await,
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "travel-time",
    about = "Travel-time sensors backed by the TomTom Routing API",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate locations and store a new entry.
    Setup(SetupArgs),
    /// Replace the key, name or locations of a stored entry.
    Reconfigure(ReconfigureArgs),
    /// Change the routing options of a stored entry.
    Options(OptionsArgs),
    /// Name a coordinate so locations can refer to it.
    Place(PlaceArgs),
    /// Refresh every stored entry until interrupted.
    Run(RunArgs),
    /// Refresh one entry and print its diagnostics.
    Diagnostics(DiagnosticsArgs),
}

#[cfg(test)]
mod tests;
