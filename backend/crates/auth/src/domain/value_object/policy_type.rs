//! Security Policy Value Objects
//!
//! - [`PolicyType`]: which per-tenant setting is being read
//! - [`CompositionRule`]: how the composition setting's integer is interpreted

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Per-tenant security setting kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[repr(i16)]
pub enum PolicyType {
    /// Minimum password length
    #[display("length")]
    Length = 1,
    /// Composition rule code, see [`CompositionRule`]
    #[display("composition")]
    Composition = 2,
    /// Password lifetime in days
    #[display("expiration")]
    Expiration = 3,
}

impl PolicyType {
    /// Numeric ID for database storage
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }
}

/// Allowed character classes for new passwords
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositionRule {
    /// Code 1
    DigitsOnly,
    /// Code 2
    AlphanumericOnly,
    /// Code 3: letter, digit and symbol required
    FullComplexity,
}

impl CompositionRule {
    /// Any code outside 1..=3 means "no constraint"
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Self::DigitsOnly),
            2 => Some(Self::AlphanumericOnly),
            3 => Some(Self::FullComplexity),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_ids() {
        assert_eq!(PolicyType::Length.id(), 1);
        assert_eq!(PolicyType::Composition.id(), 2);
        assert_eq!(PolicyType::Expiration.id(), 3);
    }

    #[test]
    fn test_composition_codes() {
        assert_eq!(CompositionRule::from_code(1), Some(CompositionRule::DigitsOnly));
        assert_eq!(CompositionRule::from_code(2), Some(CompositionRule::AlphanumericOnly));
        assert_eq!(CompositionRule::from_code(3), Some(CompositionRule::FullComplexity));
        assert_eq!(CompositionRule::from_code(0), None);
        assert_eq!(CompositionRule::from_code(4), None);
    }
}
