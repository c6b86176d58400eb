//! Logger installation for the binary.

use env_logger::{Builder, Env};

/// Filter applied when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "info";

/// Install `env_logger`, honouring `RUST_LOG` and defaulting to `info`.
///
/// Calling this more than once is harmless; later calls are ignored.
pub fn init_logging() {
    let _ = Builder::from_env(Env::default().default_filter_or(DEFAULT_FILTER))
        .format_timestamp_secs()
        .format_module_path(false)
        .try_init();
}
