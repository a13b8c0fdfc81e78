//! Hashing helpers for token bookkeeping.

use sha2::{Digest, Sha256};

/// Computes SHA-256 hash of the input and returns it as a hex string.
///
/// Refresh-token identifiers are stored in this form so a leaked sessions
/// table cannot be replayed.
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_hex_known_vector() {
        let hash = sha256_hex("test");
        assert_eq!(hash.len(), 64);
        assert_eq!(
            hash,
            "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08"
        );
    }

    #[test]
    fn test_sha256_hex_empty_string() {
        assert_eq!(
            sha256_hex(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_sha256_hex_distinguishes_jtis() {
        let a = sha256_hex("6f1c1f0e-0000-4000-8000-000000000001");
        let b = sha256_hex("6f1c1f0e-0000-4000-8000-000000000002");
        assert_ne!(a, b);
        assert_eq!(a, sha256_hex("6f1c1f0e-0000-4000-8000-000000000001"));
    }
}
