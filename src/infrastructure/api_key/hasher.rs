//! Key hashing
//!
//! One-way digest used both to store and to look up keys. Deterministic and
//! unsalted: raw secrets carry at least 128 bits of CSPRNG entropy and are
//! never user-chosen passwords, so a plain digest is sufficient.

use sha2::{Digest, Sha256};

/// SHA-256 hasher for raw API keys
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyHasher;

impl KeyHasher {
    pub fn new() -> Self {
        Self
    }

    /// Compute the hex-encoded SHA-256 digest of a raw key
    pub fn digest(&self, raw: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(raw.as_bytes());
        hex::encode(hasher.finalize())
    }
}
