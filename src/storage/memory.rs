/// In-memory storage for tests and embedded use
use std::collections::HashMap;
use std::sync::Mutex;

use super::DeviceStorage;

/// Process-local map implementation of [`DeviceStorage`].
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|p| p.into_inner())
    }
}

impl DeviceStorage for MemoryStorage {
    fn read(&self, key: &str) -> Option<String> {
        self.entries().get(key).cloned()
    }

    fn write(&self, key: &str, value: &str) -> bool {
        self.entries().insert(key.to_string(), value.to_string());
        true
    }

    fn remove(&self, key: &str) -> bool {
        self.entries().remove(key);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_write_remove() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.read("k"), None);

        assert!(storage.write("k", "v"));
        assert_eq!(storage.read("k").as_deref(), Some("v"));

        assert!(storage.remove("k"));
        assert_eq!(storage.read("k"), None);
    }
}
