//! Encrypted Secret Value Object
//!
//! The stored, reversibly-encrypted password. Opaque to this crate: only the
//! credential cipher can turn it back into clear text.

use std::fmt;

#[derive(Clone, PartialEq, Eq)]
pub struct EncryptedSecret(String);

impl EncryptedSecret {
    pub fn from_db(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// A secret made only of whitespace is treated as unset
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for EncryptedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EncryptedSecret").field(&"[SECRET]").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_detection() {
        assert!(EncryptedSecret::from_db("").is_empty());
        assert!(EncryptedSecret::from_db("   ").is_empty());
        assert!(!EncryptedSecret::from_db("x9Zq").is_empty());
    }

    #[test]
    fn test_debug_redaction() {
        let debug = format!("{:?}", EncryptedSecret::from_db("x9Zq"));
        assert!(!debug.contains("x9Zq"));
    }
}
