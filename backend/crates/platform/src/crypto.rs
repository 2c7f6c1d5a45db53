//! Cryptographic Utilities

use base64::{Engine, engine::general_purpose};
use sha2::{Digest, Sha256};

/// Compute SHA-256 hash
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Short, log-safe fingerprint of an identifier.
///
/// First 9 bytes of SHA-256, URL-safe base64 (12 chars). Lets operators
/// correlate repeated attempts for the same login name or document without
/// writing the value itself to the logs.
pub fn fingerprint(value: &str) -> String {
    let digest = sha256(value.as_bytes());
    general_purpose::URL_SAFE_NO_PAD.encode(&digest[..9])
}

/// Constant-time comparison to prevent timing attacks
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_known_values() {
        let hash = sha256(b"");
        let expected =
            hex::decode("e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855")
                .unwrap();
        assert_eq!(hash.to_vec(), expected);

        let hash = sha256(b"hello");
        let expected =
            hex::decode("2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824")
                .unwrap();
        assert_eq!(hash.to_vec(), expected);
    }

    #[test]
    fn test_fingerprint_is_stable_and_opaque() {
        let a = fingerprint("11122233344");
        assert_eq!(a, fingerprint("11122233344"));
        assert_ne!(a, fingerprint("11122233345"));
        assert_eq!(a.len(), 12);
        assert!(!a.contains("111222"));
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"secret", b"secret"));
        assert!(!constant_time_eq(b"secret", b"secreT"));
        assert!(!constant_time_eq(b"secret", b"secret "));
        assert!(constant_time_eq(b"", b""));
    }
}
