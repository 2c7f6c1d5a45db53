//! User Name Value Object
//!
//! The login handle of an identity. For students it is usually the
//! registration (enrollment) code, which is why registrations can be turned
//! back into identities by user name.
//!
//! ## Invariants
//! - Trimmed, non-empty
//! - At most [`USER_NAME_MAX_LENGTH`] characters
//! - No control characters
//! - Canonical form is upper case; comparisons are case-insensitive

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length for user name (in characters)
pub const USER_NAME_MAX_LENGTH: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserName(String);

impl UserName {
    /// Validate and canonicalize user input
    pub fn new(raw: impl AsRef<str>) -> AppResult<Self> {
        let trimmed = raw.as_ref().trim();

        if trimmed.is_empty() {
            return Err(AppError::bad_request("User name cannot be empty"));
        }

        if trimmed.chars().count() > USER_NAME_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "User name must be at most {} characters",
                USER_NAME_MAX_LENGTH
            )));
        }

        if trimmed.chars().any(char::is_control) {
            return Err(AppError::bad_request("User name contains invalid characters"));
        }

        Ok(Self(trimmed.to_uppercase()))
    }

    /// Create from database value (stored canonical, may carry padding)
    pub fn from_db(value: impl AsRef<str>) -> Self {
        Self(value.as_ref().trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
