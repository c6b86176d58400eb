//! `diagnostics` command: refresh one entry and print its diagnostics.

use std::io::Write;
use std::sync::Arc;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use travel_time_core::{ApiFactory, IntegrationHost};

use crate::service::ServiceConfig;
use crate::{
    ARG_BASE_URL, ARG_ENTRY, ARG_STORE, ARG_TIMEOUT_SECS, CliError, ENV_DIAGNOSTICS_ENTRY,
};

/// CLI arguments for the `diagnostics` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Load one entry, refresh it once and print a JSON document \
                 holding the entry with its API key redacted and the latest \
                 travel-time result.",
    about = "Print diagnostics for an entry"
)]
#[ortho_config(prefix = "TRAVEL_TIME")]
pub(crate) struct DiagnosticsArgs {
    /// Id of the entry to inspect.
    #[arg(long = ARG_ENTRY, value_name = "id")]
    #[serde(default)]
    pub(crate) entry: Option<String>,
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

impl DiagnosticsArgs {
    pub(crate) fn into_config(self) -> Result<DiagnosticsConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        DiagnosticsConfig::try_from(merged)
    }
}

/// Resolved `diagnostics` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DiagnosticsConfig {
    pub(crate) service: ServiceConfig,
    pub(crate) entry_id: String,
}

impl TryFrom<DiagnosticsArgs> for DiagnosticsConfig {
    type Error = CliError;

    fn try_from(args: DiagnosticsArgs) -> Result<Self, Self::Error> {
        let entry_id = args.entry.ok_or(CliError::MissingArgument {
            field: ARG_ENTRY,
            env: ENV_DIAGNOSTICS_ENTRY,
        })?;
        Ok(Self {
            service: ServiceConfig::from_layers(args.store, args.base_url, args.timeout_secs),
            entry_id,
        })
    }
}

pub(crate) async fn run_diagnostics(args: DiagnosticsArgs) -> Result<(), CliError> {
    let config = args.into_config()?;
    let apis = config.service.api_factory()?;
    let document = collect_diagnostics(&config, apis).await?;
    write_diagnostics(&mut std::io::stdout().lock(), &document)
}

/// Load the entry, let its first refresh run and capture diagnostics.
pub(crate) async fn collect_diagnostics(
    config: &DiagnosticsConfig,
    apis: Arc<dyn ApiFactory>,
) -> Result<Value, CliError> {
    let store = config.service.open_store()?;
    let entry = store
        .entry(&config.entry_id)
        .cloned()
        .ok_or_else(|| CliError::UnknownEntry {
            entry_id: config.entry_id.clone(),
        })?;

    let mut host = IntegrationHost::new(apis, Arc::new(store.places().clone()));
    let document = host
        .setup_entry(entry)
        .await?
        .diagnostics()
        .map_err(CliError::SerialiseDiagnostics);
    host.unload_all().await;
    document
}

pub(crate) fn write_diagnostics(writer: &mut dyn Write, document: &Value) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(document).map_err(CliError::SerialiseDiagnostics)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}
