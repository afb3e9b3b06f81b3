/// Storage module - durable key-value persistence for the device identifier
pub mod file;
pub mod memory;

pub use file::{FileStorage, StorageError};
pub use memory::MemoryStorage;

use tracing::debug;

/// Storage key holding the resolved device identifier.
pub const CURRENT_KEY: &str = "screen.deviceId";

/// Deprecated key migrated into [`CURRENT_KEY`] on first resolution.
pub const LEGACY_KEY: &str = "tv.deviceId";

/// Best-effort key-value storage.
///
/// Access failures surface as `None` on read and `false` on write and
/// remove, never as errors.
pub trait DeviceStorage: Send + Sync {
    fn read(&self, key: &str) -> Option<String>;
    fn write(&self, key: &str, value: &str) -> bool;
    fn remove(&self, key: &str) -> bool;
}

/// Move the identifier from the legacy key to the current key.
///
/// Copies legacy -> current only when the legacy key holds a value and the
/// current key does not, then deletes the legacy entry. Idempotent: a
/// second run is a no-op. Must run before the current key is read during
/// resolution.
pub fn migrate_legacy(storage: &dyn DeviceStorage) {
    if storage.read(CURRENT_KEY).is_some() {
        return;
    }
    let Some(legacy) = storage.read(LEGACY_KEY) else {
        return;
    };
    // Keep the legacy entry if the copy did not land
    if storage.write(CURRENT_KEY, &legacy) {
        storage.remove(LEGACY_KEY);
        debug!("migrated device id from legacy storage key");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrate_moves_legacy_value() {
        let storage = MemoryStorage::new();
        storage.write(LEGACY_KEY, "fp-0123456789abcdef-00112233");

        migrate_legacy(&storage);

        assert_eq!(
            storage.read(CURRENT_KEY).as_deref(),
            Some("fp-0123456789abcdef-00112233")
        );
        assert_eq!(storage.read(LEGACY_KEY), None);
    }

    #[test]
    fn test_migrate_is_idempotent() {
        let storage = MemoryStorage::new();
        storage.write(LEGACY_KEY, "fp-0123456789abcdef-00112233");

        migrate_legacy(&storage);
        migrate_legacy(&storage);

        assert_eq!(
            storage.read(CURRENT_KEY).as_deref(),
            Some("fp-0123456789abcdef-00112233")
        );
        assert_eq!(storage.read(LEGACY_KEY), None);
    }

    #[test]
    fn test_migrate_never_overwrites_current_value() {
        let storage = MemoryStorage::new();
        storage.write(CURRENT_KEY, "fp-aaaaaaaaaaaaaaaa-aaaaaaaa");
        storage.write(LEGACY_KEY, "fp-bbbbbbbbbbbbbbbb-bbbbbbbb");

        migrate_legacy(&storage);

        assert_eq!(
            storage.read(CURRENT_KEY).as_deref(),
            Some("fp-aaaaaaaaaaaaaaaa-aaaaaaaa")
        );
    }

    #[test]
    fn test_migrate_without_legacy_is_a_noop() {
        let storage = MemoryStorage::new();
        migrate_legacy(&storage);
        assert_eq!(storage.read(CURRENT_KEY), None);
        assert_eq!(storage.read(LEGACY_KEY), None);
    }
}
