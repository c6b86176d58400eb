//! The entry store file.

use std::io::{self, BufReader};

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use travel_time_core::{ConfigEntry, EntryData, NamedPlaces, RoutingOptions};

use crate::StoreError;
use crate::fs::{open_utf8_file, replace_file};

/// File name used when no store path is configured.
pub const DEFAULT_STORE_FILE: &str = "travel_time_entries.json";

/// Serialised layout of the store file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct StoreContents {
    #[serde(default)]
    places: NamedPlaces,
    #[serde(default)]
    entries: Vec<ConfigEntry>,
}

/// Config entries and named places backed by one JSON file.
///
/// Mutations only change the in-memory copy; call [`EntryStore::save`] to
/// persist them.
#[derive(Debug, Clone)]
pub struct EntryStore {
    path: Utf8PathBuf,
    contents: StoreContents,
}

impl EntryStore {
    /// Open the store at `path`, starting empty when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Read`] or [`StoreError::Parse`] when an existing
    /// file cannot be loaded.
    pub fn open(path: impl Into<Utf8PathBuf>) -> Result<Self, StoreError> {
        let mut store = Self {
            path: path.into(),
            contents: StoreContents::default(),
        };
        store.load()?;
        Ok(store)
    }

    /// Reload the file, discarding unsaved changes.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Read`] or [`StoreError::Parse`] when an existing
    /// file cannot be loaded.
    pub fn load(&mut self) -> Result<(), StoreError> {
        let file = match open_utf8_file(&self.path) {
            Ok(file) => file,
            Err(source) if source.kind() == io::ErrorKind::NotFound => {
                log::debug!("No store at {}; starting empty", self.path);
                self.contents = StoreContents::default();
                return Ok(());
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        self.contents =
            serde_json::from_reader(BufReader::new(file)).map_err(|source| StoreError::Parse {
                path: self.path.clone(),
                source,
            })?;
        Ok(())
    }

    /// Persist the in-memory contents, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Serialise`] or [`StoreError::Write`].
    pub fn save(&self) -> Result<(), StoreError> {
        let mut json =
            serde_json::to_vec_pretty(&self.contents).map_err(StoreError::Serialise)?;
        json.push(b'\n');
        replace_file(&self.path, &json).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })?;
        log::debug!("Saved {} entries to {}", self.contents.entries.len(), self.path);
        Ok(())
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// All entries in creation order.
    #[must_use]
    pub fn entries(&self) -> &[ConfigEntry] {
        &self.contents.entries
    }

    /// Look up an entry by id.
    #[must_use]
    pub fn entry(&self, entry_id: &str) -> Option<&ConfigEntry> {
        self.contents
            .entries
            .iter()
            .find(|entry| entry.entry_id == entry_id)
    }

    fn entry_mut(&mut self, entry_id: &str) -> Result<&mut ConfigEntry, StoreError> {
        self.contents
            .entries
            .iter_mut()
            .find(|entry| entry.entry_id == entry_id)
            .ok_or_else(|| StoreError::UnknownEntry {
                entry_id: entry_id.to_owned(),
            })
    }

    /// Append a new entry.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateEntry`] when the id is taken.
    pub fn add_entry(&mut self, entry: ConfigEntry) -> Result<(), StoreError> {
        if self.entry(&entry.entry_id).is_some() {
            return Err(StoreError::DuplicateEntry {
                entry_id: entry.entry_id,
            });
        }
        self.contents.entries.push(entry);
        Ok(())
    }

    /// Replace an entry's data in place, keeping its id and options.
    ///
    /// The title is renamed to match the new data.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownEntry`] when no entry has the id.
    pub fn replace_data(&mut self, entry_id: &str, data: EntryData) -> Result<&ConfigEntry, StoreError> {
        let entry = self.entry_mut(entry_id)?;
        entry.title.clone_from(&data.name);
        entry.data = data;
        Ok(&*entry)
    }

    /// Replace an entry's routing options.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownEntry`] when no entry has the id.
    pub fn update_options(
        &mut self,
        entry_id: &str,
        options: RoutingOptions,
    ) -> Result<&ConfigEntry, StoreError> {
        let entry = self.entry_mut(entry_id)?;
        entry.options = options;
        Ok(&*entry)
    }

    /// Remove and return an entry.
    pub fn remove_entry(&mut self, entry_id: &str) -> Option<ConfigEntry> {
        let index = self
            .contents
            .entries
            .iter()
            .position(|entry| entry.entry_id == entry_id)?;
        Some(self.contents.entries.remove(index))
    }

    /// Named places used by the lookup tier of location resolution.
    #[must_use]
    pub const fn places(&self) -> &NamedPlaces {
        &self.contents.places
    }

    /// Record `coordinates` under the alias `name`.
    pub fn set_place(&mut self, name: &str, coordinates: impl Into<String>) {
        self.contents.places.insert(name, coordinates);
    }

    /// Forget the alias `name`, returning its coordinates if it existed.
    pub fn remove_place(&mut self, name: &str) -> Option<String> {
        self.contents.places.remove(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;
    use travel_time_core::{CoordinateLookup, TravelMode};

    #[fixture]
    fn temp_dir() -> TempDir {
        TempDir::new().expect("create temp dir")
    }

    fn store_path(dir: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(dir.path().join("nested").join(DEFAULT_STORE_FILE))
            .expect("utf-8 temp path")
    }

    fn entry(id: &str) -> ConfigEntry {
        ConfigEntry::new(
            id,
            EntryData::new("secret", vec!["52.1,4.2".to_owned(), "51.2,5.3".to_owned()]),
        )
    }

    #[rstest]
    fn missing_file_opens_empty(temp_dir: TempDir) {
        let store = EntryStore::open(store_path(&temp_dir)).expect("open");
        assert!(store.entries().is_empty());
        assert!(store.places().is_empty());
    }

    #[rstest]
    fn saved_entries_and_places_reload(temp_dir: TempDir) {
        let path = store_path(&temp_dir);
        let mut store = EntryStore::open(path.clone()).expect("open");
        store.add_entry(entry("a")).expect("add");
        store.set_place("Home", "51.2,5.3");
        store.save().expect("save");

        let reopened = EntryStore::open(path).expect("reopen");
        assert_eq!(reopened.entries(), store.entries());
        assert_eq!(
            reopened.places().find_coordinates("home"),
            Some("51.2,5.3".to_owned())
        );
    }

    #[rstest]
    fn duplicate_ids_are_rejected(temp_dir: TempDir) {
        let mut store = EntryStore::open(store_path(&temp_dir)).expect("open");
        store.add_entry(entry("a")).expect("add");
        let err = store.add_entry(entry("a")).expect_err("duplicate");
        assert!(matches!(err, StoreError::DuplicateEntry { .. }));
    }

    #[rstest]
    fn replace_data_keeps_identity_and_options(temp_dir: TempDir) {
        let mut store = EntryStore::open(store_path(&temp_dir)).expect("open");
        store.add_entry(entry("a")).expect("add");
        store
            .update_options(
                "a",
                RoutingOptions {
                    vehicle_type: TravelMode::Bicycle,
                    ..RoutingOptions::default()
                },
            )
            .expect("options");

        let data = EntryData::new("new-key", vec!["1,2".to_owned(), "3,4".to_owned()]);
        let updated = store.replace_data("a", data.clone()).expect("replace").clone();

        assert_eq!(store.entries().len(), 1);
        assert_eq!(updated.data, data);
        assert_eq!(updated.title, "TomTom Travel Time");
        assert_eq!(updated.options.vehicle_type, TravelMode::Bicycle);
    }

    #[rstest]
    fn replace_data_renames_the_title(temp_dir: TempDir) {
        let mut store = EntryStore::open(store_path(&temp_dir)).expect("open");
        store.add_entry(entry("a")).expect("add");

        let data = EntryData::new("key", vec!["1,2".to_owned(), "3,4".to_owned()])
            .with_name("School run");
        store.replace_data("a", data).expect("replace");
        store.save().expect("save");

        let reopened = EntryStore::open(store_path(&temp_dir)).expect("reopen");
        let stored = reopened.entry("a").expect("entry kept");
        assert_eq!(stored.title, "School run");
        assert_eq!(stored.data.name, "School run");
    }

    #[rstest]
    fn unknown_ids_are_reported(temp_dir: TempDir) {
        let mut store = EntryStore::open(store_path(&temp_dir)).expect("open");
        let err = store
            .update_options("missing", RoutingOptions::default())
            .expect_err("unknown");
        assert!(matches!(err, StoreError::UnknownEntry { .. }));
        assert!(store.remove_entry("missing").is_none());
    }

    #[rstest]
    fn malformed_files_fail_to_parse(temp_dir: TempDir) {
        let path = Utf8PathBuf::from_path_buf(temp_dir.path().join("broken.json"))
            .expect("utf-8 temp path");
        std::fs::write(&path, b"{ not json").expect("write broken file");
        let err = EntryStore::open(path).expect_err("parse failure");
        assert!(matches!(err, StoreError::Parse { .. }));
    }
}
