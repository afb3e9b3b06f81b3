/// Fingerprint digesting with a deterministic non-cryptographic fallback
use sha2::{Digest, Sha256};

/// Hex digest length shared by the primary and fallback paths, so callers
/// cannot tell from the output shape which path produced it.
pub const DIGEST_HEX_LEN: usize = 64;

/// Produces a fixed-length lowercase hex digest of the fingerprint.
///
/// `None` signals that the cryptographic primitive is unavailable in this
/// environment; the resolver then routes to [`mix_digest`]. Implementations
/// never panic.
pub trait DigestProvider: Send + Sync {
    fn digest_hex(&self, input: &[u8]) -> Option<String>;
}

/// SHA-256 digest, the primary path. Byte-for-byte reproducible for
/// identical input.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Digest;

impl DigestProvider for Sha256Digest {
    fn digest_hex(&self, input: &[u8]) -> Option<String> {
        let mut hasher = Sha256::new();
        hasher.update(input);
        Some(hex::encode(hasher.finalize()))
    }
}

const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

// One FNV-1a offset basis variant per output lane
const LANE_SEEDS: [u64; 4] = [
    0xcbf2_9ce4_8422_2325,
    0x9ae1_6a3b_2f90_404f,
    0x27d4_eb2f_1656_67c5,
    0x1656_67b1_9e37_79f9,
];

/// Non-cryptographic fallback digest.
///
/// An order-dependent FNV-1a style mix of the input bytes across four
/// 64-bit lanes, rendered as [`DIGEST_HEX_LEN`] lowercase hex chars.
/// Deterministic and infallible; carries no collision-resistance claim
/// and must only ever feed a non-security identifier.
pub fn mix_digest(input: &[u8]) -> String {
    let mut out = String::with_capacity(DIGEST_HEX_LEN);
    for (i, seed) in LANE_SEEDS.iter().enumerate() {
        let mut lane = *seed;
        for &byte in input {
            lane ^= u64::from(byte.rotate_left(i as u32));
            lane = lane.wrapping_mul(FNV_PRIME);
        }
        lane ^= input.len() as u64;
        lane = lane.wrapping_mul(FNV_PRIME);
        out.push_str(&format!("{lane:016x}"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_known_vector() {
        let digest = Sha256Digest.digest_hex(b"").unwrap();
        assert_eq!(
            digest,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_sha256_reproducible() {
        let input = b"agent/1.0 host|en-US|linux-x86_64|Europe/Berlin|1920|1080|24";
        let d1 = Sha256Digest.digest_hex(input).unwrap();
        let d2 = Sha256Digest.digest_hex(input).unwrap();
        assert_eq!(d1, d2);
        assert_eq!(d1.len(), DIGEST_HEX_LEN);
    }

    #[test]
    fn test_mix_digest_deterministic() {
        let input = b"agent/1.0 host|en-US|linux-x86_64|Europe/Berlin|1920|1080|24";
        assert_eq!(mix_digest(input), mix_digest(input));
    }

    #[test]
    fn test_mix_digest_matches_primary_shape() {
        for input in [&b""[..], b"a", b"some longer fingerprint input"] {
            let digest = mix_digest(input);
            assert_eq!(digest.len(), DIGEST_HEX_LEN);
            assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
            assert_eq!(digest, digest.to_lowercase());
        }
    }

    #[test]
    fn test_mix_digest_order_dependent() {
        assert_ne!(mix_digest(b"ab"), mix_digest(b"ba"));
        assert_ne!(mix_digest(b"a"), mix_digest(b"aa"));
    }
}
