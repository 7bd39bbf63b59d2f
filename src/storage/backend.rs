//! Storage backend trait and backend kinds.
//!
//! Backends play the role of the browser's `localStorage`: a flat map from
//! string keys to string values, read and written synchronously.

use crate::Result;

/// Trait for key/value backends that hold widget state.
///
/// Values are opaque strings (JSON in practice). A key that was never
/// written reads back as `None`.
pub trait StorageBackend {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Get the storage location description (for display purposes).
    fn location(&self) -> String;

    /// Get the backend type name.
    fn backend_type(&self) -> BackendType;
}

/// Available storage backend types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
    /// One JSON file per key in the data directory (default)
    File,
    /// Process-local map, used by tests and dry runs
    Memory,
}

impl BackendType {
    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Memory => "memory",
        }
    }
}

impl std::fmt::Display for BackendType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Check that a key is usable as a file name on every platform.
pub fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.');

    if valid {
        Ok(())
    } else {
        Err(crate::Error::InvalidInput(format!(
            "Invalid storage key '{}': use letters, digits, '-', '_' or '.'",
            key
        )))
    }
}
