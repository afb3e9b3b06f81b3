/// Random suffix generation with a non-secure fallback
use rand::TryRngCore;
use rand::rngs::OsRng;
use tracing::debug;

/// Fills a buffer with random bytes.
///
/// Returns `false` when the secure source is unavailable; callers then
/// fall back to [`pseudo_fill`]. Never blocks, never panics.
pub trait RandomSource: Send + Sync {
    fn fill(&self, buf: &mut [u8]) -> bool;
}

/// Operating-system randomness, the preferred source.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn fill(&self, buf: &mut [u8]) -> bool {
        OsRng.try_fill_bytes(buf).is_ok()
    }
}

/// Non-secure fallback: xorshift seeded from the wall clock.
pub fn pseudo_fill(buf: &mut [u8]) {
    // xorshift sticks at zero, keep the seed nonzero
    let mut state = chrono::Utc::now().timestamp_nanos_opt().unwrap_or(0) as u64 | 1;
    for byte in buf.iter_mut() {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        *byte = (state >> 24) as u8;
    }
}

/// `n` random bytes rendered as `2n` lowercase hex chars.
///
/// Prefers the secure source and silently degrades to the pseudo-random
/// fallback when it reports unavailable.
pub fn suffix_hex(source: &dyn RandomSource, n: usize) -> String {
    let mut bytes = vec![0u8; n];
    if !source.fill(&mut bytes) {
        debug!("secure random source unavailable, using pseudo-random fallback");
        pseudo_fill(&mut bytes);
    }
    hex::encode(bytes)
}
