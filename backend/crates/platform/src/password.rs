//! Clear-text password handling and character-class checks
//!
//! Passwords in this system are verified by recovering the stored plaintext
//! through a reversible transform, so the comparison happens on clear text.
//! [`ClearTextPassword`] keeps that text out of logs and wipes it on drop.
//!
//! ## Security Features
//! - Zeroization of sensitive data
//! - Redacted `Debug`
//! - Constant-time, whitespace-trimmed comparison

use std::fmt;

use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::constant_time_eq;

/// Symbols accepted by the full-complexity composition rule
pub const COMPLEXITY_SYMBOLS: &str = "!@#$%^&*(),.?\":{}|<>";

/// Character-class violations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CharacterClassError {
    #[error("Password must contain digits only")]
    NotDigitsOnly,

    #[error("Password must contain only letters and digits")]
    NotAlphanumericOnly,

    #[error("Password must contain a letter, a digit and a symbol")]
    MissingComplexity,
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password with automatic memory zeroization
///
/// Does not implement `Clone`; pass by reference.
///
/// ## Examples
/// ```rust
/// use platform::password::ClearTextPassword;
///
/// let stored = ClearTextPassword::new("secret");
/// assert!(stored.matches_trimmed(" secret "));
/// ```
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Leading/trailing whitespace removed
    pub fn trimmed(&self) -> &str {
        self.0.trim()
    }

    /// Length in Unicode scalar values
    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }

    /// Compare against `candidate`, trimming both sides, in constant time
    pub fn matches_trimmed(&self, candidate: &str) -> bool {
        constant_time_eq(self.trimmed().as_bytes(), candidate.trim().as_bytes())
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Character-class checks
// ============================================================================

/// Non-empty, ASCII digits only
pub fn check_digits_only(password: &str) -> Result<(), CharacterClassError> {
    if !password.is_empty() && password.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(CharacterClassError::NotDigitsOnly)
    }
}

/// Non-empty, ASCII letters and digits only
pub fn check_alphanumeric_only(password: &str) -> Result<(), CharacterClassError> {
    if !password.is_empty() && password.chars().all(|c| c.is_ascii_alphanumeric()) {
        Ok(())
    } else {
        Err(CharacterClassError::NotAlphanumericOnly)
    }
}

/// At least one ASCII letter, one ASCII digit and one [`COMPLEXITY_SYMBOLS`] symbol
pub fn check_full_complexity(password: &str) -> Result<(), CharacterClassError> {
    let has_letter = password.chars().any(|c| c.is_ascii_alphabetic());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_symbol = password.chars().any(|c| COMPLEXITY_SYMBOLS.contains(c));

    if has_letter && has_digit && has_symbol {
        Ok(())
    } else {
        Err(CharacterClassError::MissingComplexity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trimmed_comparison_is_symmetric() {
        let stored = ClearTextPassword::new(" secret ");
        assert!(stored.matches_trimmed("secret"));
        assert!(stored.matches_trimmed("  secret\t"));
        assert!(!stored.matches_trimmed("Secret"));

        let stored = ClearTextPassword::new("secret");
        assert!(stored.matches_trimmed(" secret "));
    }

    #[test]
    fn test_char_count_counts_scalars() {
        assert_eq!(ClearTextPassword::new("senha").char_count(), 5);
        assert_eq!(ClearTextPassword::new("ação").char_count(), 4);
    }

    #[test]
    fn test_debug_redaction() {
        let password = ClearTextPassword::new("hunter2");
        let debug_output = format!("{:?}", password);
        assert!(debug_output.contains("REDACTED"));
        assert!(!debug_output.contains("hunter2"));
    }

    #[test]
    fn test_digits_only() {
        assert!(check_digits_only("123456").is_ok());
        assert_eq!(check_digits_only("12345a"), Err(CharacterClassError::NotDigitsOnly));
        assert_eq!(check_digits_only(""), Err(CharacterClassError::NotDigitsOnly));
        assert_eq!(check_digits_only("１２３"), Err(CharacterClassError::NotDigitsOnly));
    }

    #[test]
    fn test_alphanumeric_only() {
        assert!(check_alphanumeric_only("password123").is_ok());
        assert_eq!(
            check_alphanumeric_only("pass@word123"),
            Err(CharacterClassError::NotAlphanumericOnly)
        );
        assert_eq!(
            check_alphanumeric_only("pass word"),
            Err(CharacterClassError::NotAlphanumericOnly)
        );
    }

    #[test]
    fn test_full_complexity() {
        assert!(check_full_complexity("abc123!").is_ok());
        assert!(check_full_complexity("Z9{").is_ok());
        assert_eq!(
            check_full_complexity("abc123"),
            Err(CharacterClassError::MissingComplexity)
        );
        assert_eq!(
            check_full_complexity("abc!!!"),
            Err(CharacterClassError::MissingComplexity)
        );
        // '-' is not part of the accepted symbol set
        assert_eq!(
            check_full_complexity("abc-123"),
            Err(CharacterClassError::MissingComplexity)
        );
    }
}
