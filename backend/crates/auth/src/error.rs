//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use kernel::error::{app_error::AppError, conversions::sqlx_error_kind, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

const GENERIC_FAILURE: &str = "Internal server error";

/// Broad family an [`AuthError`] belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Tenant setup is incomplete
    Configuration,
    /// Security rejection of the supplied credential
    CredentialRejection,
    /// Account cannot authenticate until fixed out of band
    AccountState,
    /// A dependent system failed
    Infrastructure,
    /// User-correctable input error
    PolicyViolation,
}

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// No company group is flagged as main
    #[error("Tenant is not configured")]
    TenantNotConfigured,

    /// The main group has no main company
    #[error("Primary company is not configured")]
    PrimaryCompanyNotConfigured,

    /// Unknown identity or wrong password
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Wrong current password on a password change
    #[error("Current password is incorrect")]
    InvalidCurrentPassword,

    #[error("Account is locked")]
    AccountLocked,

    /// Stored secret missing, or it cannot be transformed
    #[error("Password is not set for this account")]
    EmptyPassword,

    /// Reversible transform failed or produced nothing
    #[error("Credential transform failed: {0}")]
    CredentialTransform(String),

    /// Login occurrence was not stored
    #[error("Audit record could not be written")]
    AuditWrite,

    /// Password change batch was not applied
    #[error("Password change could not be committed")]
    Commit,

    #[error("Password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    #[error("Password must contain digits only")]
    DigitsOnlyViolation,

    #[error("Password must not contain special characters")]
    SpecialCharacterNotAllowed,

    #[error("Password must contain a letter, a digit and a special character")]
    ComplexityViolation,

    #[error("New password must differ from the current password")]
    PasswordUnchanged,

    #[error("Password confirmation does not match")]
    PasswordConfirmationMismatch,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::TenantNotConfigured => "TENANT_NOT_CONFIGURED",
            AuthError::PrimaryCompanyNotConfigured => "PRIMARY_COMPANY_NOT_CONFIGURED",
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::InvalidCurrentPassword => "INVALID_CURRENT_PASSWORD",
            AuthError::AccountLocked => "ACCOUNT_LOCKED",
            AuthError::EmptyPassword => "EMPTY_PASSWORD",
            AuthError::CredentialTransform(_) => "CREDENTIAL_TRANSFORM_FAILED",
            AuthError::AuditWrite => "AUDIT_WRITE_FAILED",
            AuthError::Commit => "COMMIT_FAILED",
            AuthError::PasswordTooShort { .. } => "PASSWORD_TOO_SHORT",
            AuthError::DigitsOnlyViolation => "PASSWORD_DIGITS_ONLY",
            AuthError::SpecialCharacterNotAllowed => "PASSWORD_SPECIAL_CHARACTER_NOT_ALLOWED",
            AuthError::ComplexityViolation => "PASSWORD_COMPLEXITY",
            AuthError::PasswordUnchanged => "PASSWORD_UNCHANGED",
            AuthError::PasswordConfirmationMismatch => "PASSWORD_CONFIRMATION_MISMATCH",
            AuthError::Database(_) => "DATABASE_ERROR",
            AuthError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            AuthError::TenantNotConfigured | AuthError::PrimaryCompanyNotConfigured => {
                ErrorCategory::Configuration
            }
            AuthError::InvalidCredentials | AuthError::InvalidCurrentPassword => {
                ErrorCategory::CredentialRejection
            }
            AuthError::AccountLocked | AuthError::EmptyPassword => ErrorCategory::AccountState,
            AuthError::CredentialTransform(_)
            | AuthError::AuditWrite
            | AuthError::Commit
            | AuthError::Database(_)
            | AuthError::Internal(_) => ErrorCategory::Infrastructure,
            AuthError::PasswordTooShort { .. }
            | AuthError::DigitsOnlyViolation
            | AuthError::SpecialCharacterNotAllowed
            | AuthError::ComplexityViolation
            | AuthError::PasswordUnchanged
            | AuthError::PasswordConfirmationMismatch => ErrorCategory::PolicyViolation,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::TenantNotConfigured | AuthError::PrimaryCompanyNotConfigured => {
                ErrorKind::ServiceUnavailable
            }
            AuthError::InvalidCredentials | AuthError::InvalidCurrentPassword => {
                ErrorKind::Unauthorized
            }
            AuthError::AccountLocked => ErrorKind::Locked,
            AuthError::EmptyPassword => ErrorKind::Forbidden,
            AuthError::PasswordTooShort { .. }
            | AuthError::DigitsOnlyViolation
            | AuthError::SpecialCharacterNotAllowed
            | AuthError::ComplexityViolation
            | AuthError::PasswordUnchanged
            | AuthError::PasswordConfirmationMismatch => ErrorKind::UnprocessableEntity,
            AuthError::Database(e) => sqlx_error_kind(e).0,
            AuthError::CredentialTransform(_)
            | AuthError::AuditWrite
            | AuthError::Commit
            | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    ///
    /// Infrastructure failures only carry a generic message.
    pub fn to_app_error(&self) -> AppError {
        match self.category() {
            ErrorCategory::Infrastructure => AppError::new(self.kind(), GENERIC_FAILURE),
            ErrorCategory::AccountState => AppError::new(self.kind(), self.to_string())
                .with_action("Contact the access-control administrator"),
            ErrorCategory::Configuration => AppError::new(self.kind(), self.to_string())
                .with_action("Flag one company group and one company as main"),
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, code = self.code(), "Auth database error");
            }
            AuthError::Internal(msg) | AuthError::CredentialTransform(msg) => {
                tracing::error!(message = %msg, code = self.code(), "Auth internal error");
            }
            AuthError::AuditWrite | AuthError::Commit => {
                tracing::error!(code = self.code(), "Auth store write failed");
            }
            AuthError::TenantNotConfigured | AuthError::PrimaryCompanyNotConfigured => {
                tracing::error!(code = self.code(), "Tenant context unresolved");
            }
            AuthError::InvalidCredentials | AuthError::InvalidCurrentPassword => {
                tracing::warn!(code = self.code(), "Credential rejected");
            }
            AuthError::AccountLocked | AuthError::EmptyPassword => {
                tracing::warn!(code = self.code(), "Account cannot authenticate");
            }
            _ => {
                tracing::debug!(error = %self, code = self.code(), "Password policy violation");
            }
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        err.to_app_error()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infrastructure_errors_hide_detail() {
        let err = AuthError::CredentialTransform("u_snd_cripstr returned NULL".to_string());
        let app = err.to_app_error();
        assert_eq!(app.kind(), ErrorKind::InternalServerError);
        assert_eq!(app.message(), GENERIC_FAILURE);
        assert!(!app.message().contains("u_snd_cripstr"));
    }

    #[test]
    fn test_database_error_is_infrastructure() {
        let err = AuthError::from(sqlx::Error::PoolTimedOut);
        assert_eq!(err.category(), ErrorCategory::Infrastructure);
        assert_eq!(err.kind(), ErrorKind::ServiceUnavailable);
        assert_eq!(err.to_app_error().message(), GENERIC_FAILURE);
    }

    #[test]
    fn test_rejections_do_not_reveal_which_part_was_wrong() {
        let app = AuthError::InvalidCredentials.to_app_error();
        assert_eq!(app.kind(), ErrorKind::Unauthorized);
        assert_eq!(app.message(), "Invalid credentials");
    }

    #[test]
    fn test_categories() {
        assert_eq!(AuthError::TenantNotConfigured.category(), ErrorCategory::Configuration);
        assert_eq!(AuthError::AccountLocked.category(), ErrorCategory::AccountState);
        assert_eq!(AuthError::EmptyPassword.category(), ErrorCategory::AccountState);
        assert_eq!(AuthError::Commit.category(), ErrorCategory::Infrastructure);
        assert_eq!(
            AuthError::PasswordTooShort { min: 8 }.category(),
            ErrorCategory::PolicyViolation
        );
        assert_eq!(
            AuthError::InvalidCurrentPassword.category(),
            ErrorCategory::CredentialRejection
        );
    }

    #[test]
    fn test_policy_message_carries_minimum() {
        let app = AuthError::PasswordTooShort { min: 8 }.to_app_error();
        assert_eq!(app.kind(), ErrorKind::UnprocessableEntity);
        assert_eq!(app.message(), "Password must be at least 8 characters");
    }

    #[test]
    fn test_locked_maps_to_423() {
        let app = AuthError::AccountLocked.to_app_error();
        assert_eq!(app.status_code(), 423);
        assert!(app.action().is_some());
    }
}
