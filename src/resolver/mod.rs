/// Resolver module - cache, storage and computation orchestration
///
/// `resolve` consults the in-memory cache, then durable storage (after
/// legacy-key migration), then computes a fresh identifier from the
/// fingerprint digest plus a random suffix. Concurrent callers share a
/// single in-flight computation and all observe the same result.
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use tracing::{debug, warn};

use crate::identity::{
    DigestProvider, OsRandom, RandomSource, Sha256Digest, SignalProvider, SystemSignals, collect,
    mix_digest, suffix_hex,
};
use crate::storage::{CURRENT_KEY, DeviceStorage, FileStorage, migrate_legacy};

/// Hex chars taken from the fingerprint digest.
const DIGEST_PREFIX_LEN: usize = 16;

/// Random suffix size in bytes, rendered as 8 hex chars.
const SUFFIX_BYTES: usize = 4;

const ID_PREFIX: &str = "fp";

/// Options for [`DeviceIdResolver::resolve`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolveOptions {
    /// Write a freshly computed identifier to storage.
    pub persist: bool,
}

type PendingId = Shared<BoxFuture<'static, String>>;

#[derive(Default)]
struct ResolverState {
    cache: Option<String>,
    pending: Option<PendingId>,
}

/// Resolves and caches a stable device identifier.
///
/// Construct once per application lifetime; cheap to clone, and clones
/// share the cache and any pending computation.
#[derive(Clone)]
pub struct DeviceIdResolver {
    inner: Arc<Inner>,
}

struct Inner {
    signals: Arc<dyn SignalProvider>,
    digest: Arc<dyn DigestProvider>,
    random: Arc<dyn RandomSource>,
    storage: Arc<dyn DeviceStorage>,
    state: Mutex<ResolverState>,
}

impl DeviceIdResolver {
    pub fn new(
        signals: Arc<dyn SignalProvider>,
        digest: Arc<dyn DigestProvider>,
        random: Arc<dyn RandomSource>,
        storage: Arc<dyn DeviceStorage>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                signals,
                digest,
                random,
                storage,
                state: Mutex::new(ResolverState::default()),
            }),
        }
    }

    /// Resolver wired to the host system: real signals, SHA-256, OS
    /// randomness and a JSON storage file at `path`.
    pub fn with_system_defaults(path: impl Into<PathBuf>) -> Self {
        Self::new(
            Arc::new(SystemSignals),
            Arc::new(Sha256Digest),
            Arc::new(OsRandom),
            Arc::new(FileStorage::new(path)),
        )
    }

    /// Resolve the device identifier.
    ///
    /// A cached value returns without suspension. An in-flight computation
    /// is joined, so any number of concurrent callers trigger at most one
    /// underlying computation and receive the identical identifier. Never
    /// fails: a degraded environment yields a fully random identifier
    /// instead of an error.
    pub async fn resolve(&self, options: ResolveOptions) -> String {
        let pending = {
            let mut state = self.inner.state();
            if let Some(id) = &state.cache {
                return id.clone();
            }
            match &state.pending {
                Some(pending) => pending.clone(),
                None => {
                    let pending = spawn_resolution(Arc::clone(&self.inner), options);
                    state.pending = Some(pending.clone());
                    pending
                }
            }
        };
        pending.await
    }

    /// Adopt an externally assigned identifier.
    ///
    /// Writes it to the current storage key; a successful write also
    /// updates the in-memory cache so subsequent [`resolve`] calls return
    /// it. Returns `false` when the write failed, the only explicit
    /// failure signal this component exposes.
    ///
    /// [`resolve`]: DeviceIdResolver::resolve
    pub fn persist_device_id(&self, id: &str) -> bool {
        if !self.inner.storage.write(CURRENT_KEY, id) {
            return false;
        }
        self.inner.state().cache = Some(id.to_string());
        true
    }

    /// Read the persisted identifier, if any, without resolving, caching
    /// or migrating.
    pub fn persisted(&self) -> Option<String> {
        self.inner.storage.read(CURRENT_KEY)
    }
}

/// Start a resolution task and wrap it in the pending computation token
/// shared by every concurrent caller.
///
/// The task runs to completion and populates the cache even when all
/// callers stop awaiting.
fn spawn_resolution(inner: Arc<Inner>, options: ResolveOptions) -> PendingId {
    let task = tokio::spawn({
        let inner = Arc::clone(&inner);
        async move {
            let id = inner.load_or_compute(options).await;
            inner.settle(&id);
            id
        }
    });
    async move {
        match task.await {
            Ok(id) => id,
            Err(err) => {
                warn!(%err, "device id computation failed, using random fallback");
                let id = inner.fallback_identifier();
                inner.settle(&id);
                id
            }
        }
    }
    .boxed()
    .shared()
}

impl Inner {
    fn state(&self) -> MutexGuard<'_, ResolverState> {
        self.state.lock().unwrap_or_else(|p| p.into_inner())
    }

    async fn load_or_compute(&self, options: ResolveOptions) -> String {
        migrate_legacy(self.storage.as_ref());
        if let Some(stored) = self.storage.read(CURRENT_KEY) {
            debug!("device id adopted from storage");
            return stored;
        }

        let fingerprint = collect(self.signals.as_ref());
        let digest = match self.digest.digest_hex(fingerprint.as_bytes()) {
            Some(digest) => digest,
            None => {
                debug!("cryptographic digest unavailable, using mixing fallback");
                mix_digest(fingerprint.as_bytes())
            }
        };
        let prefix: String = digest.chars().take(DIGEST_PREFIX_LEN).collect();
        let suffix = suffix_hex(self.random.as_ref(), SUFFIX_BYTES);
        let id = format!("{ID_PREFIX}-{prefix}-{suffix}");

        if options.persist && !self.storage.write(CURRENT_KEY, &id) {
            warn!("failed to persist freshly computed device id");
        }
        id
    }

    /// Identifier built entirely from randomness, same shape as the
    /// fingerprint-derived form.
    fn fallback_identifier(&self) -> String {
        let head = suffix_hex(self.random.as_ref(), DIGEST_PREFIX_LEN / 2);
        let tail = suffix_hex(self.random.as_ref(), SUFFIX_BYTES);
        format!("{ID_PREFIX}-{head}-{tail}")
    }

    /// Record the settled identifier and discard the pending token.
    ///
    /// An identifier adopted through `persist_device_id` while the
    /// computation was in flight stays authoritative.
    fn settle(&self, id: &str) {
        let mut state = self.state();
        if state.cache.is_none() {
            state.cache = Some(id.to_string());
        }
        state.pending = None;
    }
}
