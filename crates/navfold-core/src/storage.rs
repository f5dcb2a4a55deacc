//! Session-scoped key/value backends
//!
//! Mirrors the browser `Storage` API so the open-state store can run against
//! `sessionStorage`, an in-process map, or a session file for the CLI.

use crate::error::CoreError;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// String key/value storage that lives as long as the browsing session
pub trait SessionStorage {
    fn get_item(&self, key: &str) -> Option<String>;

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), CoreError>;

    fn remove_item(&mut self, key: &str) -> Result<(), CoreError>;
}

impl<S: SessionStorage + ?Sized> SessionStorage for &mut S {
    fn get_item(&self, key: &str) -> Option<String> {
        (**self).get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&mut self, key: &str) -> Result<(), CoreError> {
        (**self).remove_item(key)
    }
}

/// In-process storage; the session ends when the value is dropped
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SessionStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), CoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Session file holding a JSON object of key → string.
///
/// Used by the CLI so consecutive invocations share one "session" until the
/// file is cleared. The file is created lazily on the first write.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonFileStorage {
    /// Open the session file; a missing or unreadable file starts an empty session
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "Malformed session file, starting empty");
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No session file yet");
                BTreeMap::new()
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read session file");
                BTreeMap::new()
            }
        };
        Self { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the session file; a file that does not exist is not an error
    pub fn clear(&mut self) -> Result<(), CoreError> {
        self.entries.clear();
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CoreError::StorageIo {
                path: self.path.clone(),
                source: e,
            }),
        }
    }

    fn flush(&self) -> Result<(), CoreError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|e| CoreError::StorageIo {
                path: dir.to_path_buf(),
                source: e,
            })?;
        }
        let content = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&self.path, content).map_err(|e| CoreError::StorageIo {
            path: self.path.clone(),
            source: e,
        })
    }
}

impl SessionStorage for JsonFileStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove_item(&mut self, key: &str) -> Result<(), CoreError> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_memory_storage_roundtrip() {
        let mut storage = MemoryStorage::new();
        assert!(storage.get_item("k").is_none());
        storage.set_item("k", "v").unwrap();
        assert_eq!(storage.get_item("k").as_deref(), Some("v"));
        storage.remove_item("k").unwrap();
        assert!(storage.is_empty());
    }

    #[test]
    fn test_file_storage_lazy_create_and_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let mut storage = JsonFileStorage::open(&path);
        assert!(!path.exists());

        storage.set_item("navfold:open", "[\"/a\"]").unwrap();
        assert!(path.exists());

        let reopened = JsonFileStorage::open(&path);
        assert_eq!(
            reopened.get_item("navfold:open").as_deref(),
            Some("[\"/a\"]")
        );
    }

    #[test]
    fn test_file_storage_malformed_starts_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();

        let storage = JsonFileStorage::open(&path);
        assert!(storage.get_item("navfold:open").is_none());
    }

    #[test]
    fn test_file_storage_clear() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        let mut storage = JsonFileStorage::open(&path);
        storage.set_item("k", "v").unwrap();

        storage.clear().unwrap();
        assert!(!path.exists());
        assert!(storage.get_item("k").is_none());
        storage.clear().unwrap();
    }
}
