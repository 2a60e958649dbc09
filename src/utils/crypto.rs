//! Cryptographic utilities

use rand::Rng;
use sha2::{Digest, Sha256};

/// Generate a cryptographically secure random token
pub fn generate_secure_token(length: usize) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::rng();

    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// Hash a string using SHA-256
pub fn hash_string(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_secure_token() {
        let token1 = generate_secure_token(48);
        let token2 = generate_secure_token(48);

        assert_eq!(token1.len(), 48);
        assert!(token1.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(token1, token2);
    }

    #[test]
    fn test_hash_string() {
        let hash = hash_string("refresh");

        assert_eq!(hash.len(), 64);
        assert_eq!(hash, hash_string("refresh"));
        assert_ne!(hash, hash_string("other"));
    }
}
