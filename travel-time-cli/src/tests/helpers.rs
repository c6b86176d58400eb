//! Test helpers for temporary stores and stubbed TomTom services.

use camino::Utf8PathBuf;
use tempfile::TempDir;
use travel_time_core::test_support::{
    StubApiFactory, StubGeocodingApi, StubRoutingApi, sample_summary,
};
use travel_time_core::{ConfigEntry, EntryData};
use travel_time_store::{DEFAULT_STORE_FILE, EntryStore};

use crate::service::ServiceConfig;

/// A store path inside a temporary directory that lives as long as this value.
pub(super) struct TempStore {
    _dir: TempDir,
    path: Utf8PathBuf,
}

impl TempStore {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let path = Utf8PathBuf::from_path_buf(dir.path().join(DEFAULT_STORE_FILE))
            .expect("utf-8 temp path");
        Self { _dir: dir, path }
    }

    pub(super) fn path(&self) -> &Utf8PathBuf {
        &self.path
    }

    pub(super) fn service(&self) -> ServiceConfig {
        ServiceConfig::from_layers(Some(self.path.clone()), None, None)
    }

    pub(super) fn open(&self) -> EntryStore {
        EntryStore::open(self.path.clone()).expect("open store")
    }

    /// Store `entry` directly, bypassing validation.
    pub(super) fn seed(&self, entry: ConfigEntry) {
        let mut store = self.open();
        store.add_entry(entry).expect("seed entry");
        store.save().expect("save seeded store");
    }
}

pub(super) fn entry(entry_id: &str) -> ConfigEntry {
    ConfigEntry::new(
        entry_id,
        EntryData::new("secret", vec!["52.1,4.2".to_owned(), "51.2,5.3".to_owned()])
            .with_name("Commute"),
    )
}

pub(super) fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_owned()).collect()
}

/// Services that find a route for any request and geocode nothing.
pub(super) fn routable() -> (StubApiFactory, StubRoutingApi) {
    let routing = StubRoutingApi::with_summary(sample_summary());
    let apis = StubApiFactory::new(routing.clone(), StubGeocodingApi::default());
    (apis, routing)
}
