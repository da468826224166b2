//! API Key generation
//!
//! Generates cryptographically secure raw secrets and their stored
//! representation (digest + display prefix).

use rand::RngCore;

use super::hasher::KeyHasher;

/// Number of characters of the raw secret stored in clear for display
pub const KEY_PREFIX_LEN: usize = 10;

/// Result of generating a new raw secret
#[derive(Debug, Clone)]
pub struct GeneratedKey {
    /// The full raw secret (only shown once at creation)
    pub secret: String,
    /// The first characters of the secret, for identification in listings
    pub prefix: String,
    /// The digest of the secret, for storage and lookup
    pub hash: String,
}

/// Generator for secure API keys
#[derive(Debug, Clone)]
pub struct KeyGenerator {
    /// Human-recognizable prefix for all generated secrets
    prefix: String,
    /// Number of random bytes behind the prefix
    key_bytes: usize,
    hasher: KeyHasher,
}

impl KeyGenerator {
    /// Create a new generator with the given secret prefix
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            key_bytes: 32,
            hasher: KeyHasher::new(),
        }
    }

    /// Create the standard `sk_` generator
    pub fn standard() -> Self {
        Self::new("sk_")
    }

    /// Set the number of random bytes
    pub fn with_key_bytes(mut self, bytes: usize) -> Self {
        self.key_bytes = bytes;
        self
    }

    /// Generate a new raw secret: prefix + hex-encoded random bytes
    pub fn generate(&self) -> GeneratedKey {
        let mut random_bytes = vec![0u8; self.key_bytes];
        rand::thread_rng().fill_bytes(&mut random_bytes);

        let secret = format!("{}{}", self.prefix, hex::encode(&random_bytes));
        self.from_secret(&secret)
    }

    /// Build the stored representation of a known secret (used by tests that
    /// need a deterministic key)
    pub fn from_secret(&self, secret: &str) -> GeneratedKey {
        let prefix: String = secret.chars().take(KEY_PREFIX_LEN).collect();

        GeneratedKey {
            secret: secret.to_string(),
            prefix,
            hash: self.hasher.digest(secret),
        }
    }
}

impl Default for KeyGenerator {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_key() {
        let generator = KeyGenerator::standard();
        let generated = generator.generate();

        assert!(generated.secret.starts_with("sk_"));
        // "sk_" + 32 bytes hex-encoded
        assert_eq!(generated.secret.len(), 3 + 64);
        assert_eq!(generated.prefix.len(), KEY_PREFIX_LEN);
        assert!(generated.secret.starts_with(&generated.prefix));
    }

    #[test]
    fn test_key_uniqueness() {
        let generator = KeyGenerator::standard();
        let first = generator.generate();
        let second = generator.generate();

        assert_ne!(first.secret, second.secret);
        assert_ne!(first.hash, second.hash);
    }

    #[test]
    fn test_hash_matches_hasher() {
        let generator = KeyGenerator::standard();
        let generated = generator.generate();

        assert_eq!(KeyHasher::new().digest(&generated.secret), generated.hash);
    }

    #[test]
    fn test_from_secret_is_deterministic() {
        let generator = KeyGenerator::standard();

        let first = generator.from_secret("sk_deadbeef00");
        let second = generator.from_secret("sk_deadbeef00");

        assert_eq!(first.hash, second.hash);
        assert_eq!(first.prefix, "sk_deadbee");
    }

    #[test]
    fn test_custom_key_bytes() {
        let generator = KeyGenerator::standard().with_key_bytes(16);
        let generated = generator.generate();

        // Still at least 128 bits of entropy
        assert_eq!(generated.secret.len(), 3 + 32);
    }

    #[test]
    fn test_custom_prefix() {
        let generator = KeyGenerator::new("test_");
        let generated = generator.generate();

        assert!(generated.secret.starts_with("test_"));
    }
}
