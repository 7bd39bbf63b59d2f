//! Storage layer for Hygge data.
//!
//! Widget state lives in a flat key/value store modelled on the browser's
//! `localStorage`. The shared task list sits under [`TASKS_KEY`]; other
//! widgets keep their own keys next to it.
//!
//! ## Storage Backends
//!
//! - **File backend** (default): `<data dir>/<key>.json`, where the data dir
//!   is `$HYGGE_DATA_DIR` or `~/.local/share/hygge/`
//! - **Memory backend**: process-local, for tests

pub mod backend;
pub mod file;
pub mod memory;

pub use backend::{BackendType, StorageBackend};
pub use file::FileBackend;
pub use memory::MemoryBackend;

use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Key holding the JSON array of shared tasks.
pub const TASKS_KEY: &str = "hygge-todos";

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "HYGGE_DATA_DIR";

/// Get the data directory.
///
/// Precedence: explicit path > `HYGGE_DATA_DIR` > platform data dir.
pub fn get_data_dir(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        if !dir.is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }

    let data_dir = dirs::data_dir()
        .ok_or_else(|| Error::Other("Could not determine data directory".to_string()))?;
    Ok(data_dir.join("hygge"))
}

/// Open the default file backend for `explicit` (or the resolved data dir).
pub fn open_backend(explicit: Option<&Path>) -> Result<FileBackend> {
    let dir = get_data_dir(explicit)?;
    tracing::debug!(dir = %dir.display(), "opening file backend");
    FileBackend::new(&dir)
}
