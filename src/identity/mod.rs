/// Identity module - fingerprint collection, digesting and random suffixes
pub mod digest;
pub mod fingerprint;
pub mod random;

pub use digest::{DigestProvider, Sha256Digest, mix_digest};
pub use fingerprint::{ScreenGeometry, SignalProvider, SystemSignals, collect};
pub use random::{OsRandom, RandomSource, pseudo_fill, suffix_hex};
