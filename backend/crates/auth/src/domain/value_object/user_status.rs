//! Identity Status Value Object
//!
//! Active/inactive flag as stored by the credential store (`'S'` / `'N'`).
//! Informational here: locking is what gates authentication, not status.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UserStatus {
    #[default]
    Active,
    Inactive,
}

impl UserStatus {
    /// Storage code
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Active => "S",
            Self::Inactive => "N",
        }
    }

    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "S" => Some(Self::Active),
            "N" => Some(Self::Inactive),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
