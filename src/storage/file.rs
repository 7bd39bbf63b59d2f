//! File backend: one `<key>.json` file per key.

use std::fs;
use std::path::{Path, PathBuf};

use super::backend::{BackendType, StorageBackend, validate_key};
use crate::Result;

/// Stores each key as a file in a data directory.
pub struct FileBackend {
    root: PathBuf,
}

impl FileBackend {
    /// Open (and create if needed) a backend rooted at `root`.
    pub fn new(root: &Path) -> Result<Self> {
        fs::create_dir_all(root)?;
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    fn key_path(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.root.join(format!("{}.json", key)))
    }
}

impl StorageBackend for FileBackend {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(key)?;
        // Write next to the target and rename so readers never see a torn file
        let tmp = self.root.join(format!(".{}.json.tmp", key));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn location(&self) -> String {
        self.root.display().to_string()
    }

    fn backend_type(&self) -> BackendType {
        BackendType::File
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_key_reads_none() {
        let temp = TempDir::new().unwrap();
        let backend = FileBackend::new(temp.path()).unwrap();
        assert_eq!(backend.get("hygge-todos").unwrap(), None);
    }

    #[test]
    fn test_set_overwrites() {
        let temp = TempDir::new().unwrap();
        let mut backend = FileBackend::new(temp.path()).unwrap();
        backend.set("notes", "[1]").unwrap();
        backend.set("notes", "[2]").unwrap();
        assert_eq!(backend.get("notes").unwrap().as_deref(), Some("[2]"));
        assert!(temp.path().join("notes.json").exists());
        assert!(!temp.path().join(".notes.json.tmp").exists());
    }

    #[test]
    fn test_creates_missing_root() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("a").join("b");
        let backend = FileBackend::new(&nested).unwrap();
        assert!(nested.is_dir());
        assert_eq!(backend.backend_type(), BackendType::File);
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let temp = TempDir::new().unwrap();
        let mut backend = FileBackend::new(temp.path()).unwrap();
        assert!(backend.set("../escape", "x").is_err());
    }
}
