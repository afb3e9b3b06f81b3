/// Device identity resolution
///
/// Derives a stable per-device identifier from a fingerprint of environment
/// signals, persists it in durable local storage (migrating a deprecated
/// legacy key) and caches it for the lifetime of the process. Resolution
/// never fails: unavailable cryptographic or storage facilities degrade to
/// deterministic or random fallbacks instead of errors.
pub mod identity;
pub mod resolver;
pub mod storage;

pub use resolver::{DeviceIdResolver, ResolveOptions};
pub use storage::{CURRENT_KEY, DeviceStorage, FileStorage, LEGACY_KEY, MemoryStorage};
