/// Device identity demo binary
///
/// Resolves the stable device identifier (persisting it on first run) and
/// prints it to stdout. An optional argument overrides the storage file
/// path.
use std::env;

use device_identity::{DeviceIdResolver, ResolveOptions};
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_STORAGE_FILE: &str = "device-identity.json";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let storage_path = env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_STORAGE_FILE.to_string());
    info!(path = %storage_path, "resolving device identity");

    let resolver = DeviceIdResolver::with_system_defaults(&storage_path);
    let id = resolver.resolve(ResolveOptions { persist: true }).await;
    println!("{id}");
}
