//! Occurrence Type Value Object
//!
//! Tag of an audit occurrence, persisted as a two-letter code.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown occurrence type code: {0:?}")]
pub struct UnknownOccurrenceType(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OccurrenceType {
    /// Successful login
    Login,
    /// Wrong password supplied
    PasswordError,
    /// User left the system
    Logout,
    /// Password changed
    PasswordChange,
    /// Account unlocked
    Unlock,
    /// Account locked
    Lock,
}

impl OccurrenceType {
    pub const ALL: [OccurrenceType; 6] = [
        Self::Login,
        Self::PasswordError,
        Self::Logout,
        Self::PasswordChange,
        Self::Unlock,
        Self::Lock,
    ];

    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Login => "LG",
            Self::PasswordError => "ES",
            Self::Logout => "SA",
            Self::PasswordChange => "TS",
            Self::Unlock => "DE",
            Self::Lock => "BL",
        }
    }
}

impl FromStr for OccurrenceType {
    type Err = UnknownOccurrenceType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.code() == code)
            .ok_or_else(|| UnknownOccurrenceType(s.to_string()))
    }
}

impl fmt::Display for OccurrenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
