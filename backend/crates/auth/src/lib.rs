//! Auth (Credential Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Tenant resolution, password policy, audit, use cases
//! - `infra/` - PostgreSQL and in-memory stores
//!
//! ## Features
//! - Login by user name or by document number, with disambiguation when a
//!   document matches several registrations
//! - Forced password change for temporary or expired passwords
//! - Per-tenant length, composition and expiration policies
//! - Password change applied atomically to every identity of a person
//! - Append-only audit trail of logins and password changes
//!
//! ## Security Model
//! - Passwords are stored through a reversible transform keyed by the
//!   account creation time; verification compares trimmed clear text in
//!   constant time
//! - Infrastructure failures are reported apart from credential rejections
//!   and never expose internal detail through [`AppError`]

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;


// Re-exports for convenience
pub use application::config::AuthConfig;
pub use application::{
    AuthOutcome, AuthenticateInput, AuthenticateUseCase, ChangePasswordInput,
    ChangePasswordOutput, ChangePasswordUseCase,
};
pub use error::{AuthError, AuthResult, ErrorCategory};
pub use infra::{memory::MemoryAuthStore, postgres::PgAuthRepository};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
}
