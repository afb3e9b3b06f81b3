/// JSON-file backed storage
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use super::DeviceStorage;

/// On-disk layout: a single JSON object of string entries.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(flatten)]
    entries: BTreeMap<String, String>,
}

/// Internal failure causes; collapsed to the best-effort [`DeviceStorage`]
/// contract at the trait boundary.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage io: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage format: {0}")]
    Format(#[from] serde_json::Error),
}

/// Key-value storage persisted as a single JSON object file.
///
/// Every operation re-reads the file, so external edits between calls are
/// picked up. A corrupt or unreadable file reads as empty and write/remove
/// report `false` rather than erroring.
pub struct FileStorage {
    path: PathBuf,
    // Guards the read-modify-write cycle on the backing file
    lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    fn guard(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn load(&self) -> Result<StoreFile, StorageError> {
        if !self.path.exists() {
            return Ok(StoreFile::default());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(StoreFile::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn store(&self, store: &StoreFile) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, serde_json::to_string_pretty(store)?)?;
        Ok(())
    }

    fn update(
        &self,
        apply: impl FnOnce(&mut BTreeMap<String, String>),
    ) -> Result<(), StorageError> {
        let _guard = self.guard();
        let mut store = self.load()?;
        apply(&mut store.entries);
        self.store(&store)
    }
}

impl DeviceStorage for FileStorage {
    fn read(&self, key: &str) -> Option<String> {
        let _guard = self.guard();
        match self.load() {
            Ok(store) => store.entries.get(key).cloned(),
            Err(err) => {
                warn!(%err, path = %self.path.display(), "storage read failed, treating as absent");
                None
            }
        }
    }

    fn write(&self, key: &str, value: &str) -> bool {
        let result = self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        });
        match result {
            Ok(()) => true,
            Err(err) => {
                warn!(%err, path = %self.path.display(), "storage write failed");
                false
            }
        }
    }

    fn remove(&self, key: &str) -> bool {
        let result = self.update(|entries| {
            entries.remove(key);
        });
        match result {
            Ok(()) => true,
            Err(err) => {
                warn!(%err, path = %self.path.display(), "storage remove failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("device.json"));

        assert_eq!(storage.read("screen.deviceId"), None);
        assert!(storage.write("screen.deviceId", "fp-0123456789abcdef-00112233"));
        assert_eq!(
            storage.read("screen.deviceId").as_deref(),
            Some("fp-0123456789abcdef-00112233")
        );

        assert!(storage.remove("screen.deviceId"));
        assert_eq!(storage.read("screen.deviceId"), None);
    }

    #[test]
    fn test_survives_process_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("device.json");

        FileStorage::new(&path).write("screen.deviceId", "fp-0123456789abcdef-00112233");

        // A fresh instance sees the previously written value
        let reopened = FileStorage::new(&path);
        assert_eq!(
            reopened.read("screen.deviceId").as_deref(),
            Some("fp-0123456789abcdef-00112233")
        );
    }

    #[test]
    fn test_corrupt_file_reads_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("device.json");
        fs::write(&path, "{ not json }").unwrap();

        let storage = FileStorage::new(&path);
        assert_eq!(storage.read("screen.deviceId"), None);
        assert!(!storage.write("screen.deviceId", "x"));
    }

    #[test]
    fn test_missing_parent_directory_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("device.json");

        let storage = FileStorage::new(&path);
        assert!(storage.write("k", "v"));
        assert_eq!(storage.read("k").as_deref(), Some("v"));
    }
}
