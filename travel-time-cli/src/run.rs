//! `run` command: keep every stored entry refreshing until interrupted.

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use travel_time_core::{
    ApiFactory, CoordinateLookup, DEFAULT_SCAN_INTERVAL, EntryContext, IntegrationHost,
    NamedPlaces, TravelTimeSensor,
};
use travel_time_store::EntryStore;

use crate::service::ServiceConfig;
use crate::{ARG_BASE_URL, ARG_SCAN_INTERVAL_SECS, ARG_STORE, ARG_TIMEOUT_SECS, CliError};

/// CLI arguments for the `run` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Load every stored entry, refresh each once straight away \
                 and then on a fixed interval, logging sensor states as they \
                 change. SIGHUP rereads the store and reloads changed \
                 entries; Ctrl-C stops.",
    about = "Refresh stored entries until interrupted"
)]
#[ortho_config(prefix = "TRAVEL_TIME")]
pub(crate) struct RunArgs {
    /// Seconds between scheduled refreshes.
    #[arg(long = ARG_SCAN_INTERVAL_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) scan_interval_secs: Option<u64>,
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

impl RunArgs {
    pub(crate) fn into_config(self) -> Result<RunConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        Ok(RunConfig::from(merged))
    }
}

/// Resolved `run` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RunConfig {
    pub(crate) service: ServiceConfig,
    pub(crate) scan_interval: Duration,
}

impl From<RunArgs> for RunConfig {
    fn from(args: RunArgs) -> Self {
        Self {
            service: ServiceConfig::from_layers(args.store, args.base_url, args.timeout_secs),
            scan_interval: args
                .scan_interval_secs
                .map_or(DEFAULT_SCAN_INTERVAL, Duration::from_secs),
        }
    }
}

/// Process-level requests delivered to the host loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HostSignal {
    /// Reread the store and reload changed entries.
    Reload,
    /// Unload everything and return.
    Shutdown,
}

/// Named places that can be swapped while entries keep running.
#[derive(Debug, Default)]
struct SharedPlaces(RwLock<NamedPlaces>);

impl SharedPlaces {
    fn replace(&self, places: NamedPlaces) {
        *self.0.write().unwrap_or_else(PoisonError::into_inner) = places;
    }
}

impl CoordinateLookup for SharedPlaces {
    fn find_coordinates(&self, input: &str) -> Option<String> {
        self.0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .find_coordinates(input)
    }
}

pub(crate) async fn run_host(args: RunArgs) -> Result<(), CliError> {
    let config = args.into_config()?;
    let apis = config.service.api_factory()?;
    let (sender, signals) = mpsc::channel(4);
    let listener = tokio::spawn(forward_signals(sender));
    let outcome = run_host_with(config, apis, signals).await;
    listener.abort();
    outcome
}

/// Serve stored entries until a [`HostSignal::Shutdown`] arrives or the
/// signal channel closes.
pub(crate) async fn run_host_with(
    config: RunConfig,
    apis: Arc<dyn ApiFactory>,
    mut signals: mpsc::Receiver<HostSignal>,
) -> Result<(), CliError> {
    let places = Arc::new(SharedPlaces::default());
    let mut host = IntegrationHost::new(apis, Arc::clone(&places) as Arc<dyn CoordinateLookup>)
        .with_scan_interval(config.scan_interval);
    let mut watchers = JoinSet::new();

    let mut store = config.service.open_store()?;
    let outcome: Result<(), CliError> = async {
        sync_entries(&mut host, &store, &places, &mut watchers).await?;
        log::info!("Serving {} entries", host.len());
        while let Some(HostSignal::Reload) = signals.recv().await {
            log::info!("Reloading {}", store.path());
            store.load()?;
            sync_entries(&mut host, &store, &places, &mut watchers).await?;
        }
        Ok(())
    }
    .await;

    host.unload_all().await;
    watchers.shutdown().await;
    log::info!("Stopped");
    outcome
}

/// Bring the loaded entries in line with `store`.
///
/// Unchanged entries keep running; changed ones are reloaded in place.
async fn sync_entries(
    host: &mut IntegrationHost,
    store: &EntryStore,
    places: &SharedPlaces,
    watchers: &mut JoinSet<()>,
) -> Result<(), CliError> {
    places.replace(store.places().clone());

    let removed: Vec<String> = host
        .entries()
        .map(|context| context.entry().entry_id.clone())
        .filter(|entry_id| store.entry(entry_id).is_none())
        .collect();
    for entry_id in removed {
        log::info!("Unloading removed entry {entry_id}");
        host.unload_entry(&entry_id).await;
    }

    for entry in store.entries() {
        let unchanged = host
            .entry(&entry.entry_id)
            .map(|context| context.entry() == entry);
        let context = match unchanged {
            Some(true) => continue,
            Some(false) => host.reload_entry(entry.clone()).await?,
            None => host.setup_entry(entry.clone()).await?,
        };
        watch_entry(context, watchers);
    }
    Ok(())
}

fn watch_entry(context: &EntryContext, watchers: &mut JoinSet<()>) {
    let title = context.entry().title.clone();
    for sensor in context.sensors() {
        log_state(&title, sensor);
        watchers.spawn(watch_sensor(title.clone(), sensor.clone()));
    }
}

async fn watch_sensor(title: String, mut sensor: TravelTimeSensor) {
    while sensor.changed().await {
        log_state(&title, &sensor);
    }
}

fn log_state(title: &str, sensor: &TravelTimeSensor) {
    log::info!(
        "{title} {}: {} {}",
        sensor.description().key,
        sensor.state(),
        sensor.description().unit
    );
}

/// Translate Ctrl-C and SIGHUP into [`HostSignal`]s.
///
/// Dropping the sender on failure closes the channel, which stops the host.
async fn forward_signals(sender: mpsc::Sender<HostSignal>) {
    loop {
        let signal = match next_signal().await {
            Ok(signal) => signal,
            Err(err) => {
                log::error!("Failed to listen for signals: {err}");
                return;
            }
        };
        if sender.send(signal).await.is_err() || signal == HostSignal::Shutdown {
            return;
        }
    }
}

#[cfg(unix)]
async fn next_signal() -> std::io::Result<HostSignal> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut hangup = signal(SignalKind::hangup())?;
    tokio::select! {
        result = tokio::signal::ctrl_c() => result.map(|()| HostSignal::Shutdown),
        _ = hangup.recv() => Ok(HostSignal::Reload),
    }
}

#[cfg(not(unix))]
async fn next_signal() -> std::io::Result<HostSignal> {
    tokio::signal::ctrl_c().await.map(|()| HostSignal::Shutdown)
}
