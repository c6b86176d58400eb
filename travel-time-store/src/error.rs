use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors raised by [`crate::EntryStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store file exists but could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// Store file.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// The store file is not valid JSON for the expected layout.
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// Store file.
        path: Utf8PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
    /// The store could not be serialised.
    #[error("failed to serialise store contents: {0}")]
    Serialise(#[source] serde_json::Error),
    /// The store file could not be written.
    #[error("failed to write {path}: {source}")]
    Write {
        /// Store file.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// An entry with the same id already exists.
    #[error("entry {entry_id} already exists")]
    DuplicateEntry {
        /// The clashing id.
        entry_id: String,
    },
    /// No entry has the given id.
    #[error("no entry with id {entry_id}")]
    UnknownEntry {
        /// The missing id.
        entry_id: String,
    },
}
