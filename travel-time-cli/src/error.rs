//! Error types emitted by the travel-time CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use thiserror::Error;
use travel_time_core::{ApiError, CoordinateParseError, HostError, SetupError};
use travel_time_store::StoreError;
use travel_time_tomtom::ClientBuildError;

/// Errors emitted by the travel-time CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Argument name.
        field: &'static str,
        /// Environment variable that can supply it.
        env: &'static str,
    },
    /// A place was given coordinates that are not `lat,lon`.
    #[error("invalid coordinates for place {name:?}: {source}")]
    InvalidCoordinates {
        /// Place alias.
        name: String,
        /// Parser error.
        #[source]
        source: CoordinateParseError,
    },
    /// The entry store could not be read or written.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// No stored entry has the requested id.
    #[error("no entry with id {entry_id}")]
    UnknownEntry {
        /// The requested id.
        entry_id: String,
    },
    /// The TomTom client could not be built.
    #[error("failed to build TomTom client: {0}")]
    BuildClient(#[from] ClientBuildError),
    /// An API client could not be created for an entry.
    #[error(transparent)]
    Api(#[from] ApiError),
    /// The setup flow rejected the input.
    #[error("setup rejected: {0}")]
    Setup(#[from] SetupError),
    /// An entry could not be loaded.
    #[error("failed to load entry: {0}")]
    Host(#[from] HostError),
    /// Serialising the diagnostics document failed.
    #[error("failed to serialise diagnostics: {0}")]
    SerialiseDiagnostics(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
