//! Persistence for travel-time config entries and named places.
//!
//! Everything lives in a single JSON file written through a `cap-std`
//! directory handle and renamed into place on save.
#![forbid(unsafe_code)]

mod error;
mod fs;
mod store;

pub use error::StoreError;
pub use store::{DEFAULT_STORE_FILE, EntryStore};
